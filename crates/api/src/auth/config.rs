// Authentication configuration loaded from environment variables.
// Decision: Secret resolution is JWT_SECRET -> NEXTAUTH_SECRET -> startup error.
//           There is no literal fallback secret compiled into the binary.
// Decision: The refresh secret is derived (access secret + fixed suffix), never configured

use std::time::Duration;

/// Suffix appended to the access secret to derive the refresh-token secret
pub const REFRESH_SECRET_SUFFIX: &str = "_refresh";

/// Default access token lifetime (1 hour)
pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: u64 = 3600;

/// Default refresh token lifetime (30 days)
pub const DEFAULT_REFRESH_TOKEN_TTL_SECS: u64 = 2_592_000;

/// Default cookie session lifetime (30 days)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Configuration errors detected at startup
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no signing secret configured: set JWT_SECRET (or NEXTAUTH_SECRET)")]
    MissingSecret,

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing access tokens
    pub secret: String,
    /// Access token lifetime
    pub access_token_lifetime: Duration,
    /// Refresh token lifetime
    pub refresh_token_lifetime: Duration,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_lifetime: Duration::from_secs(DEFAULT_ACCESS_TOKEN_TTL_SECS),
            refresh_token_lifetime: Duration::from_secs(DEFAULT_REFRESH_TOKEN_TTL_SECS),
        }
    }

    /// Secret used for refresh tokens
    pub fn refresh_secret(&self) -> String {
        format!("{}{}", self.secret, REFRESH_SECRET_SUFFIX)
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Cookie session lifetime
    pub session_max_age: Duration,
    /// Whether auth cookies carry the `Secure` attribute
    pub secure_cookies: bool,
    /// Path prefix the routes are nested under (`API_PREFIX`), empty for none
    pub api_prefix: String,
}

impl AuthConfig {
    pub fn new(jwt: JwtConfig) -> Self {
        Self {
            jwt,
            session_max_age: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            secure_cookies: true,
            api_prefix: String::new(),
        }
    }

    /// Path the refresh cookie is scoped to: the auth routes under the prefix
    pub fn refresh_cookie_path(&self) -> String {
        format!("{}/api/auth", self.api_prefix.trim_end_matches('/'))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let secret = non_empty("JWT_SECRET")
            .or_else(|| non_empty("NEXTAUTH_SECRET"))
            .ok_or(ConfigError::MissingSecret)?;

        let access_token_lifetime = parse_secs(
            "JWT_ACCESS_TOKEN_TTL",
            non_empty("JWT_ACCESS_TOKEN_TTL"),
            DEFAULT_ACCESS_TOKEN_TTL_SECS,
        )?;
        let refresh_token_lifetime = parse_secs(
            "JWT_REFRESH_TOKEN_TTL",
            non_empty("JWT_REFRESH_TOKEN_TTL"),
            DEFAULT_REFRESH_TOKEN_TTL_SECS,
        )?;
        let session_max_age = parse_secs(
            "AUTH_SESSION_TTL",
            non_empty("AUTH_SESSION_TTL"),
            DEFAULT_SESSION_TTL_SECS,
        )?;

        let secure_cookies = non_empty("AUTH_COOKIE_SECURE")
            .map(|s| !(s.eq_ignore_ascii_case("false") || s == "0"))
            .unwrap_or(true);

        let api_prefix = non_empty("API_PREFIX")
            .map(|p| p.trim().trim_end_matches('/').to_string())
            .unwrap_or_default();

        Ok(Self {
            jwt: JwtConfig {
                secret,
                access_token_lifetime,
                refresh_token_lifetime,
            },
            session_max_age,
            secure_cookies,
            api_prefix,
        })
    }
}

fn parse_secs(
    name: &'static str,
    value: Option<String>,
    default: u64,
) -> Result<Duration, ConfigError> {
    match value {
        None => Ok(Duration::from_secs(default)),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(ConfigError::InvalidValue { name, value: raw }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_jwt_secret_wins() {
        let config = AuthConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "primary"),
            ("NEXTAUTH_SECRET", "secondary"),
        ]))
        .unwrap();
        assert_eq!(config.jwt.secret, "primary");
    }

    #[test]
    fn test_nextauth_secret_fallback() {
        let config = AuthConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "  "),
            ("NEXTAUTH_SECRET", "secondary"),
        ]))
        .unwrap();
        assert_eq!(config.jwt.secret, "secondary");
    }

    #[test]
    fn test_missing_secret_fails() {
        let err = AuthConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingSecret);
    }

    #[test]
    fn test_defaults() {
        let config = AuthConfig::from_lookup(lookup(&[("JWT_SECRET", "s")])).unwrap();
        assert_eq!(config.jwt.access_token_lifetime, Duration::from_secs(3600));
        assert_eq!(
            config.jwt.refresh_token_lifetime,
            Duration::from_secs(2_592_000)
        );
        assert!(config.secure_cookies);
        assert_eq!(config.refresh_cookie_path(), "/api/auth");
    }

    #[test]
    fn test_refresh_cookie_path_follows_prefix() {
        let config =
            AuthConfig::from_lookup(lookup(&[("JWT_SECRET", "s"), ("API_PREFIX", "/v1")])).unwrap();
        assert_eq!(config.api_prefix, "/v1");
        assert_eq!(config.refresh_cookie_path(), "/v1/api/auth");

        let config =
            AuthConfig::from_lookup(lookup(&[("JWT_SECRET", "s"), ("API_PREFIX", "/v1/")])).unwrap();
        assert_eq!(config.api_prefix, "/v1");
        assert_eq!(config.refresh_cookie_path(), "/v1/api/auth");
    }

    #[test]
    fn test_custom_lifetimes_and_insecure_cookies() {
        let config = AuthConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s"),
            ("JWT_ACCESS_TOKEN_TTL", "60"),
            ("JWT_REFRESH_TOKEN_TTL", "120"),
            ("AUTH_COOKIE_SECURE", "false"),
        ]))
        .unwrap();
        assert_eq!(config.jwt.access_token_lifetime, Duration::from_secs(60));
        assert_eq!(config.jwt.refresh_token_lifetime, Duration::from_secs(120));
        assert!(!config.secure_cookies);
    }

    #[test]
    fn test_invalid_lifetime() {
        let err = AuthConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s"),
            ("JWT_ACCESS_TOKEN_TTL", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "JWT_ACCESS_TOKEN_TTL",
                ..
            }
        ));
    }

    #[test]
    fn test_refresh_secret_is_derived() {
        let jwt = JwtConfig::new("abc");
        assert_eq!(jwt.refresh_secret(), "abc_refresh");
    }
}
