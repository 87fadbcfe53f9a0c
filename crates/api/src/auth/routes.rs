// Authentication routes
// Decision: Login and signup issue a token pair plus a server-side cookie session
// Decision: Refresh re-reads the user so the new access token carries the current role
// Decision: Refresh tokens are not stored; logout only drops the cookie session

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use ondas_core::{Role, User};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::credentials::{is_placeholder, REFRESH_COOKIE, SESSION_COOKIE};
use super::jwt::TokenPair;
use super::middleware::AuthUser;
use crate::api::common::{ApiError, ApiResponse};
use crate::api::validation::{validate_email, validate_name, validate_password};
use crate::storage::{
    hash_password, verify_against_dummy, verify_password, CreateAuthSessionRow, CreateUserRow,
    UserRow,
};
use crate::AppState;

/// Signup request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Refresh request. The token may come from the body or the refresh cookie.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Tokens plus the user they were issued for
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub user: User,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Create auth routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .with_state(state)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn generate_session_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}

/// POST /api/auth/signup - Create a LISTENER account
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthPayload),
        (status = 400, description = "Invalid email, password or name"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, ApiResponse<AuthPayload>), ApiError> {
    let email = normalize_email(&req.email);
    validate_email(&email)?;
    validate_password(&req.password)?;
    validate_name("name", &req.name)?;

    let existing = state
        .storage
        .get_user_by_email(&email)
        .await
        .map_err(|e| ApiError::storage("Failed to look up email during signup", e))?;
    if existing.is_some() {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            "EMAIL_TAKEN",
            "El email ya está registrado",
        ));
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        ApiError::internal()
    })?;

    let user = state
        .storage
        .create_user(CreateUserRow {
            email,
            name: req.name.trim().to_string(),
            role: Role::Listener,
            password_hash: Some(password_hash),
        })
        .await
        .map_err(|e| ApiError::storage("Failed to create user", e))?;

    tracing::info!(user_id = %user.id, "User signed up");
    let (jar, payload) = start_session(&state, jar, user).await?;
    Ok((
        StatusCode::CREATED,
        jar,
        ApiResponse::ok(payload).with_message("Cuenta creada"),
    ))
}

/// POST /api/auth/login - Email and password sign-in
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthPayload),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<AuthPayload>), ApiError> {
    let invalid = || {
        ApiError::new(
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            "Email o contraseña incorrectos",
        )
    };

    let user = state
        .storage
        .get_user_by_email(&normalize_email(&req.email))
        .await
        .map_err(|e| ApiError::storage("Failed to look up user during login", e))?;

    let Some((user, hash)) = user.and_then(|u| u.password_hash.clone().map(|h| (u, h))) else {
        verify_against_dummy(&req.password);
        return Err(invalid());
    };

    let valid = verify_password(&req.password, &hash).map_err(|e| {
        tracing::error!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
        invalid()
    })?;
    if !valid {
        return Err(invalid());
    }

    tracing::info!(user_id = %user.id, "User logged in");
    let (jar, payload) = start_session(&state, jar, user).await?;
    Ok((jar, ApiResponse::ok(payload)))
}

/// POST /api/auth/refresh - Exchange a refresh token for a new pair
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = AuthPayload),
        (status = 401, description = "Missing or invalid refresh token"),
        (status = 404, description = "User no longer exists")
    ),
    tag = "auth"
)]
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<RefreshRequest>>,
) -> Result<(CookieJar, ApiResponse<AuthPayload>), ApiError> {
    let token = body
        .and_then(|Json(req)| req.refresh_token)
        .filter(|t| !is_placeholder(t))
        .or_else(|| {
            jar.get(REFRESH_COOKIE)
                .map(|c| c.value().to_string())
                .filter(|t| !is_placeholder(t))
        })
        .ok_or_else(|| {
            ApiError::new(
                StatusCode::UNAUTHORIZED,
                "MISSING_CREDENTIAL",
                "Falta el token de actualización",
            )
        })?;

    let invalid = || {
        ApiError::new(
            StatusCode::UNAUTHORIZED,
            "INVALID_TOKEN",
            "Token de actualización inválido o expirado",
        )
    };

    let claims = state
        .auth
        .jwt_service
        .verify_refresh_token(token.trim())
        .map_err(|e| {
            tracing::debug!(error = %e, "Refresh token rejected");
            invalid()
        })?;
    let subject = claims.subject_id().ok_or_else(invalid)?;

    let not_found = || ApiError::new(StatusCode::NOT_FOUND, "USER_NOT_FOUND", "Usuario no encontrado");
    let user_id = Uuid::parse_str(subject).map_err(|_| not_found())?;
    let user = state
        .storage
        .get_user(user_id)
        .await
        .map_err(|e| ApiError::storage("Failed to load user during refresh", e))?
        .ok_or_else(not_found)?;

    let (tokens, jar) = issue_tokens(&state, jar, &user)?;
    Ok((
        jar,
        ApiResponse::ok(AuthPayload {
            user: User::from(user),
            tokens,
        }),
    ))
}

/// POST /api/auth/logout - Drop the cookie session and clear auth cookies
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Signed out")),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, ApiResponse<()>) {
    if let Some(session) = jar.get(SESSION_COOKIE) {
        if let Err(e) = state.storage.delete_auth_session(session.value()).await {
            tracing::warn!(error = %e, "Failed to delete session on logout");
        }
    }

    let jar = jar
        .remove(Cookie::build(SESSION_COOKIE).path("/"))
        .remove(Cookie::build(REFRESH_COOKIE).path(state.auth.config.refresh_cookie_path()));
    (jar, ApiResponse::done("Sesión cerrada"))
}

/// GET /api/auth/me - Current user, read from storage
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User no longer exists")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<ApiResponse<User>, ApiError> {
    let row = state
        .storage
        .get_user(user.id)
        .await
        .map_err(|e| ApiError::storage("Failed to load current user", e))?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "USER_NOT_FOUND", "Usuario no encontrado"))?;
    Ok(ApiResponse::ok(User::from(row)))
}

/// Mint tokens and set the refresh cookie
fn issue_tokens(
    state: &AppState,
    jar: CookieJar,
    user: &UserRow,
) -> Result<(TokenPair, CookieJar), ApiError> {
    let tokens = state
        .auth
        .jwt_service
        .issue_token_pair(&user.id.to_string(), user.role())
        .map_err(|e| {
            tracing::error!(error = %e, "Token generation failed");
            ApiError::internal()
        })?;

    let refresh_cookie = Cookie::build((REFRESH_COOKIE, tokens.refresh_token.clone()))
        .path(state.auth.config.refresh_cookie_path())
        .http_only(true)
        .secure(state.auth.config.secure_cookies)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(
            state.auth.jwt_service.refresh_token_lifetime_secs(),
        ))
        .build();

    Ok((tokens, jar.add(refresh_cookie)))
}

/// Tokens plus a stored cookie session carrying the user's current role
async fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: UserRow,
) -> Result<(CookieJar, AuthPayload), ApiError> {
    let (tokens, jar) = issue_tokens(state, jar, &user)?;

    let max_age = state.auth.config.session_max_age;
    let expires_at = Utc::now()
        + chrono::Duration::from_std(max_age).map_err(|_| ApiError::internal())?;
    let session = state
        .storage
        .create_auth_session(CreateAuthSessionRow {
            token: generate_session_token(),
            user_id: user.id,
            role: user.role(),
            expires_at,
        })
        .await
        .map_err(|e| ApiError::storage("Failed to create session", e))?;

    let session_cookie = Cookie::build((SESSION_COOKIE, session.token))
        .path("/")
        .http_only(true)
        .secure(state.auth.config.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age.as_secs() as i64))
        .build();

    Ok((
        jar.add(session_cookie),
        AuthPayload {
            user: User::from(user),
            tokens,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  DJ@Ondas.FM "), "dj@ondas.fm");
    }

    #[test]
    fn test_session_tokens_are_random_hex() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_refresh_request_accepts_empty_body() {
        let req: RefreshRequest = serde_json::from_str("{}").unwrap();
        assert!(req.refresh_token.is_none());
        let req: RefreshRequest = serde_json::from_str(r#"{"refreshToken":"abc"}"#).unwrap();
        assert_eq!(req.refresh_token.as_deref(), Some("abc"));
    }
}
