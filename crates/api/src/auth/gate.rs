// Auth gate: credential -> authorization decision
// Decision: The gate never returns an error; every failure becomes a FailureReason
// Decision: Nothing is cached, every request is verified from scratch
// Decision: Bearer tokens are trusted for their role claim; only the session
//           fallback and the refresh route touch storage

use axum::http::HeaderMap;
use ondas_core::Role;
use std::sync::Arc;

use super::credentials::{self, Credential};
use super::jwt::JwtService;
use crate::storage::StorageBackend;

/// Why a request was not authorized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// No usable bearer token (and no session, where sessions are allowed)
    MissingCredential,
    /// Bad signature, expired, malformed, or no subject
    InvalidToken,
    /// Authenticated, but the role does not satisfy the route
    InsufficientRole,
    /// The session store could not be consulted
    UpstreamUnavailable,
}

impl FailureReason {
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::MissingCredential => "MISSING_CREDENTIAL",
            FailureReason::InvalidToken => "INVALID_TOKEN",
            FailureReason::InsufficientRole => "INSUFFICIENT_ROLE",
            FailureReason::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
        }
    }
}

/// Where the caller's identity came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Bearer,
    Session,
}

/// Outcome of evaluating one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthDecision {
    pub authenticated: bool,
    pub role: Option<Role>,
    pub subject_id: Option<String>,
    pub failure_reason: Option<FailureReason>,
    pub method: Option<AuthMethod>,
}

impl AuthDecision {
    fn denied(reason: FailureReason) -> Self {
        Self {
            authenticated: false,
            role: None,
            subject_id: None,
            failure_reason: Some(reason),
            method: None,
        }
    }

    fn identified(subject_id: String, role: Option<Role>, method: AuthMethod) -> Self {
        Self {
            authenticated: true,
            role,
            subject_id: Some(subject_id),
            failure_reason: None,
            method: Some(method),
        }
    }

    /// Authenticated and not rejected for any reason
    pub fn is_authorized(&self) -> bool {
        self.authenticated && self.failure_reason.is_none()
    }
}

/// Single role rule for every route.
///
/// LISTENER only needs an authenticated caller. DJ and ADMIN need a role
/// claim that satisfies them; a missing role never does.
pub fn has_role(decision: &AuthDecision, required: Role) -> bool {
    if !decision.authenticated {
        return false;
    }
    match required {
        Role::Listener => true,
        _ => decision.role.is_some_and(|role| role.satisfies(required)),
    }
}

/// What a route demands from the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GatePolicy {
    pub required: Option<Role>,
    /// Fall back to the session cookie when no bearer token is present
    pub allow_session: bool,
}

impl GatePolicy {
    /// Any authenticated caller, bearer only
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn role(required: Role) -> Self {
        Self {
            required: Some(required),
            allow_session: false,
        }
    }

    /// Admin routes: ADMIN role, session cookie accepted
    pub fn admin() -> Self {
        Self {
            required: Some(Role::Admin),
            allow_session: true,
        }
    }
}

#[derive(Clone)]
pub struct AuthGate {
    jwt: Arc<JwtService>,
    storage: StorageBackend,
}

impl AuthGate {
    pub fn new(jwt: Arc<JwtService>, storage: StorageBackend) -> Self {
        Self { jwt, storage }
    }

    pub async fn authorize(&self, headers: &HeaderMap, policy: GatePolicy) -> AuthDecision {
        let decision = match credentials::extract(headers, policy.allow_session) {
            None => AuthDecision::denied(FailureReason::MissingCredential),
            Some(Credential::Bearer(token)) => self.verify_bearer(&token),
            Some(Credential::Session(session_id)) => self.resolve_session(&session_id).await,
        };

        match policy.required {
            Some(required) if decision.authenticated && !has_role(&decision, required) => {
                tracing::debug!(
                    subject_id = ?decision.subject_id,
                    role = ?decision.role,
                    required = %required,
                    "Insufficient role"
                );
                AuthDecision {
                    failure_reason: Some(FailureReason::InsufficientRole),
                    ..decision
                }
            }
            _ => decision,
        }
    }

    fn verify_bearer(&self, token: &str) -> AuthDecision {
        let claims = match self.jwt.verify_access_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Access token rejected");
                return AuthDecision::denied(FailureReason::InvalidToken);
            }
        };

        match claims.payload() {
            Some(payload) => {
                AuthDecision::identified(payload.subject_id, payload.role, AuthMethod::Bearer)
            }
            None => {
                tracing::debug!("Access token carries no subject");
                AuthDecision::denied(FailureReason::InvalidToken)
            }
        }
    }

    async fn resolve_session(&self, session_id: &str) -> AuthDecision {
        match self.storage.get_auth_session(session_id).await {
            Ok(Some(session)) => AuthDecision::identified(
                session.user_id.to_string(),
                session.role(),
                AuthMethod::Session,
            ),
            Ok(None) => AuthDecision::denied(FailureReason::MissingCredential),
            Err(e) => {
                tracing::error!(error = %e, "Session lookup failed");
                AuthDecision::denied(FailureReason::UpstreamUnavailable)
            }
        }
    }
}
