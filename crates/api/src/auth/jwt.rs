// JWT token codec
// Decision: Use HS256 algorithm for simplicity (symmetric key)
// Decision: No token-type claim. Access and refresh tokens are told apart only by
//           their signing secret (refresh secret = access secret + suffix)
// Decision: Zero leeway on expiry; an expired token is rejected immediately

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use ondas_core::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::config::JwtConfig;

/// Token verification and signing failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token signature does not match")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// What a token asserts about its bearer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    pub subject_id: String,
    pub role: Option<Role>,
}

impl TokenPayload {
    pub fn new(subject_id: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            subject_id: subject_id.into(),
            role,
        }
    }
}

/// Decoded JWT claims.
///
/// Tokens minted over the years carry the subject under `sub`, `id` or
/// `userId`; all three are accepted, in that priority order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        default,
        rename = "userId",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
    /// Role as a raw string; unknown values resolve to no role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    /// First non-empty subject alias: `sub`, then `id`, then `userId`
    pub fn subject_id(&self) -> Option<&str> {
        [&self.sub, &self.id, &self.user_id]
            .into_iter()
            .filter_map(|alias| alias.as_deref())
            .map(str::trim)
            .find(|value| !value.is_empty())
    }

    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }

    /// Payload view, `None` when no subject alias is usable
    pub fn payload(&self) -> Option<TokenPayload> {
        self.subject_id()
            .map(|subject_id| TokenPayload::new(subject_id, self.role()))
    }
}

/// Token pair returned after sign-in, signup and refresh
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Sign a payload with `secret`, valid for `ttl` from now
pub fn sign(payload: &TokenPayload, secret: &str, ttl: std::time::Duration) -> Result<String, TokenError> {
    sign_at(payload, &EncodingKey::from_secret(secret.as_bytes()), ttl, Utc::now())
}

/// Verify `token` against `secret` and return its claims
pub fn verify(token: &str, secret: &str) -> Result<TokenClaims, TokenError> {
    verify_with(token, &DecodingKey::from_secret(secret.as_bytes()))
}

fn sign_at(
    payload: &TokenPayload,
    key: &EncodingKey,
    ttl: std::time::Duration,
    issued_at: DateTime<Utc>,
) -> Result<String, TokenError> {
    let ttl = Duration::from_std(ttl).map_err(|e| TokenError::Signing(e.to_string()))?;
    let claims = TokenClaims {
        sub: Some(payload.subject_id.clone()),
        id: None,
        user_id: None,
        role: payload.role.map(|r| r.as_str().to_string()),
        iat: issued_at.timestamp(),
        exp: (issued_at + ttl).timestamp(),
    };

    encode(&Header::new(Algorithm::HS256), &claims, key)
        .map_err(|e| TokenError::Signing(e.to_string()))
}

fn verify_with(token: &str, key: &DecodingKey) -> Result<TokenClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;

    let data = decode::<TokenClaims>(token, key, &validation)?;
    Ok(data.claims)
}

/// JWT service holding the access and refresh keys
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let refresh_secret = config.refresh_secret();
        Self {
            access_encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            config,
        }
    }

    /// Generate access token for a user
    pub fn issue_access_token(&self, subject_id: &str, role: Role) -> Result<String, TokenError> {
        sign_at(
            &TokenPayload::new(subject_id, Some(role)),
            &self.access_encoding,
            self.config.access_token_lifetime,
            Utc::now(),
        )
    }

    /// Generate refresh token for a user. The role is not embedded: refresh
    /// always re-reads it from storage.
    pub fn issue_refresh_token(&self, subject_id: &str) -> Result<String, TokenError> {
        sign_at(
            &TokenPayload::new(subject_id, None),
            &self.refresh_encoding,
            self.config.refresh_token_lifetime,
            Utc::now(),
        )
    }

    /// Generate both access and refresh tokens
    pub fn issue_token_pair(&self, subject_id: &str, role: Role) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(subject_id, role)?,
            refresh_token: self.issue_refresh_token(subject_id)?,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_lifetime_secs(),
        })
    }

    /// Validate and decode an access token
    pub fn verify_access_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        verify_with(token, &self.access_decoding)
    }

    /// Validate and decode a refresh token
    pub fn verify_refresh_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        verify_with(token, &self.refresh_decoding)
    }

    /// Get access token lifetime in seconds
    pub fn access_token_lifetime_secs(&self) -> i64 {
        self.config.access_token_lifetime.as_secs() as i64
    }

    /// Get refresh token lifetime in seconds
    pub fn refresh_token_lifetime_secs(&self) -> i64 {
        self.config.refresh_token_lifetime.as_secs() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    const SECRET: &str = "test-secret-key-for-testing";

    fn test_service() -> JwtService {
        JwtService::new(JwtConfig::new(SECRET))
    }

    fn encode_raw(claims: &serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_one_hour() -> i64 {
        Utc::now().timestamp() + 3600
    }

    #[test]
    fn test_sign_verify_round_trip() {
        for role in [Role::Listener, Role::Dj, Role::Admin] {
            let payload = TokenPayload::new("user-42", Some(role));
            let token = sign(&payload, SECRET, StdDuration::from_secs(60)).unwrap();
            let claims = verify(&token, SECRET).unwrap();

            assert_eq!(claims.payload(), Some(payload));
            assert_eq!(claims.exp - claims.iat, 60);
        }
    }

    #[test]
    fn test_expired_token_rejected() {
        let issued_at = Utc::now() - Duration::hours(2);
        let token = sign_at(
            &TokenPayload::new("user-1", Some(Role::Admin)),
            &EncodingKey::from_secret(SECRET.as_bytes()),
            StdDuration::from_secs(3600),
            issued_at,
        )
        .unwrap();

        assert_eq!(verify(&token, SECRET), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign(
            &TokenPayload::new("user-1", Some(Role::Listener)),
            "another-secret",
            StdDuration::from_secs(60),
        )
        .unwrap();

        assert_eq!(verify(&token, SECRET), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            verify("not-a-token", SECRET),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_refresh_token_not_accepted_as_access() {
        let service = test_service();
        let refresh = service.issue_refresh_token("user-1").unwrap();

        assert_eq!(
            service.verify_access_token(&refresh),
            Err(TokenError::InvalidSignature)
        );
        assert!(service.verify_refresh_token(&refresh).is_ok());
    }

    #[test]
    fn test_access_token_not_accepted_as_refresh() {
        let service = test_service();
        let access = service.issue_access_token("user-1", Role::Admin).unwrap();

        assert_eq!(
            service.verify_refresh_token(&access),
            Err(TokenError::InvalidSignature)
        );
        let claims = service.verify_access_token(&access).unwrap();
        assert_eq!(claims.subject_id(), Some("user-1"));
        assert_eq!(claims.role(), Some(Role::Admin));
    }

    #[test]
    fn test_refresh_token_carries_no_role() {
        let service = test_service();
        let refresh = service.issue_refresh_token("user-9").unwrap();
        let claims = service.verify_refresh_token(&refresh).unwrap();
        assert_eq!(claims.subject_id(), Some("user-9"));
        assert_eq!(claims.role(), None);
    }

    #[test]
    fn test_token_pair() {
        let pair = test_service().issue_token_pair("user-1", Role::Dj).unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 3600);
        assert_ne!(pair.access_token, pair.refresh_token);
    }

    #[test]
    fn test_subject_alias_priority() {
        let token = encode_raw(
            &serde_json::json!({"sub": "from-sub", "userId": "from-user-id", "exp": in_one_hour()}),
            SECRET,
        );
        let claims = verify(&token, SECRET).unwrap();
        assert_eq!(claims.subject_id(), Some("from-sub"));

        let token = encode_raw(
            &serde_json::json!({"id": "from-id", "userId": "from-user-id", "exp": in_one_hour()}),
            SECRET,
        );
        assert_eq!(verify(&token, SECRET).unwrap().subject_id(), Some("from-id"));

        let token = encode_raw(
            &serde_json::json!({"userId": "from-user-id", "exp": in_one_hour()}),
            SECRET,
        );
        assert_eq!(
            verify(&token, SECRET).unwrap().subject_id(),
            Some("from-user-id")
        );
    }

    #[test]
    fn test_empty_alias_is_skipped() {
        let claims = TokenClaims {
            sub: Some(String::new()),
            id: Some("fallback".to_string()),
            exp: in_one_hour(),
            ..Default::default()
        };
        assert_eq!(claims.subject_id(), Some("fallback"));

        let none = TokenClaims {
            exp: in_one_hour(),
            ..Default::default()
        };
        assert_eq!(none.subject_id(), None);
        assert_eq!(none.payload(), None);
    }

    #[test]
    fn test_unknown_role_resolves_to_none() {
        let token = encode_raw(
            &serde_json::json!({"sub": "u", "role": "SUPERUSER", "exp": in_one_hour()}),
            SECRET,
        );
        let claims = verify(&token, SECRET).unwrap();
        assert_eq!(claims.role(), None);
    }
}
