// DJ application route
// Decision: One PENDING request per user; existing DJs cannot apply again

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use ondas_core::DjRequest;
use serde::Deserialize;
use utoipa::ToSchema;

use super::common::{ApiError, ApiResponse};
use super::validation::{validate_name, validate_text};
use crate::auth::AuthUser;
use crate::storage::CreateDjRequestRow;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDjRequestRequest {
    pub artist_name: String,
    #[serde(default)]
    pub message: Option<String>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/dj-requests", post(create_dj_request))
        .with_state(state)
}

/// POST /api/dj-requests - Apply to become a DJ
#[utoipa::path(
    post,
    path = "/api/dj-requests",
    request_body = CreateDjRequestRequest,
    responses(
        (status = 201, description = "Request submitted", body = DjRequest),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Already a DJ or a request is pending")
    ),
    security(("bearer_auth" = [])),
    tag = "dj-requests"
)]
pub async fn create_dj_request(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateDjRequestRequest>,
) -> Result<(StatusCode, ApiResponse<DjRequest>), ApiError> {
    validate_name("artistName", &req.artist_name)?;
    validate_text("message", req.message.as_deref())?;

    let existing_dj = state
        .storage
        .get_dj_by_user(user.id)
        .await
        .map_err(|e| ApiError::storage("Failed to check DJ profile", e))?;
    if existing_dj.is_some() {
        return Err(ApiError::conflict("Ya tienes un perfil de DJ"));
    }

    let row = state
        .storage
        .create_dj_request(CreateDjRequestRow {
            user_id: user.id,
            artist_name: req.artist_name.trim().to_string(),
            message: req.message.filter(|m| !m.trim().is_empty()),
        })
        .await
        .map_err(|e| ApiError::storage("Failed to create DJ request", e))?
        .ok_or_else(|| ApiError::conflict("Ya tienes una solicitud pendiente"))?;

    tracing::info!(request_id = %row.id, user_id = %user.id, "DJ request submitted");
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(DjRequest::from(row)).with_message("Solicitud enviada"),
    ))
}
