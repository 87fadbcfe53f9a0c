// Authentication extractors
// Decision: Handlers declare their requirement by extractor type (AuthUser, DjUser, AdminUser)
// Decision: Admin routes answer 401 UNAUTHORIZED for a non-admin caller; other
//           role failures answer 403

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use ondas_core::Role;
use std::sync::Arc;
use uuid::Uuid;

use super::{
    config::AuthConfig,
    gate::{AuthDecision, AuthGate, AuthMethod, FailureReason, GatePolicy},
    jwt::JwtService,
};
use crate::api::common::ApiError;
use crate::storage::StorageBackend;

/// Auth state shared across routes
#[derive(Clone)]
pub struct AuthState {
    pub config: AuthConfig,
    pub jwt_service: Arc<JwtService>,
    pub gate: AuthGate,
}

impl AuthState {
    pub fn new(config: AuthConfig, storage: StorageBackend) -> Self {
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        let gate = AuthGate::new(jwt_service.clone(), storage);
        Self {
            config,
            jwt_service,
            gate,
        }
    }
}

/// Authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    /// Role claim; a token without one is treated as LISTENER
    pub role: Role,
    pub method: AuthMethod,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Map a failed decision to the HTTP error the caller sees
fn rejection(decision: &AuthDecision, admin_route: bool) -> ApiError {
    match decision.failure_reason {
        Some(FailureReason::MissingCredential) | None => ApiError::new(
            StatusCode::UNAUTHORIZED,
            FailureReason::MissingCredential.code(),
            "Se requiere autenticación",
        ),
        Some(FailureReason::InvalidToken) => ApiError::new(
            StatusCode::UNAUTHORIZED,
            FailureReason::InvalidToken.code(),
            "Token inválido o expirado",
        ),
        Some(FailureReason::InsufficientRole) if admin_route => {
            ApiError::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "No autorizado")
        }
        Some(FailureReason::InsufficientRole) => ApiError::new(
            StatusCode::FORBIDDEN,
            FailureReason::InsufficientRole.code(),
            "Permisos insuficientes",
        ),
        Some(FailureReason::UpstreamUnavailable) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            FailureReason::UpstreamUnavailable.code(),
            "No se pudo verificar la sesión",
        ),
    }
}

/// Run the gate and turn an authorized decision into an AuthUser
async fn authorize(
    parts: &Parts,
    auth: &AuthState,
    policy: GatePolicy,
) -> Result<AuthUser, ApiError> {
    let admin_route = policy.required == Some(Role::Admin);
    let decision = auth.gate.authorize(&parts.headers, policy).await;
    if !decision.is_authorized() {
        return Err(rejection(&decision, admin_route));
    }

    let id = decision
        .subject_id
        .as_deref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| {
            tracing::debug!(subject_id = ?decision.subject_id, "Subject is not a user id");
            rejection(
                &AuthDecision {
                    failure_reason: Some(FailureReason::InvalidToken),
                    ..decision.clone()
                },
                admin_route,
            )
        })?;

    Ok(AuthUser {
        id,
        role: decision.role.unwrap_or_default(),
        method: decision.method.unwrap_or(AuthMethod::Bearer),
    })
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);
        authorize(parts, &auth, GatePolicy::authenticated()).await
    }
}

/// Caller holding DJ or ADMIN
#[derive(Debug, Clone)]
pub struct DjUser(pub AuthUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for DjUser
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);
        authorize(parts, &auth, GatePolicy::role(Role::Dj))
            .await
            .map(DjUser)
    }
}

/// Caller holding ADMIN; the session cookie is accepted as well as a bearer token
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);
        authorize(parts, &auth, GatePolicy::admin())
            .await
            .map(AdminUser)
    }
}

/// Caller if authenticated, `None` otherwise. Never rejects.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);
        Ok(OptionalAuthUser(
            authorize(parts, &auth, GatePolicy::authenticated()).await.ok(),
        ))
    }
}
