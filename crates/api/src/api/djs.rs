// DJ profile routes
// Decision: Listing degrades to an empty page when storage is down
// Decision: A profile is edited by its owner or by an admin

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use ondas_core::{Dj, DjPatch, PageQuery};
use uuid::Uuid;

use super::common::{ApiError, ApiResponse};
use super::validation::{validate_genres, validate_optional_name, validate_optional_url, validate_text};
use crate::auth::AuthUser;
use crate::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/djs", get(list_djs))
        .route("/api/djs/:id", get(get_dj).patch(update_dj))
        .with_state(state)
}

/// GET /api/djs - Public DJ directory, newest first
#[utoipa::path(
    get,
    path = "/api/djs",
    params(
        ("cursor" = Option<Uuid>, Query, description = "Id of the last DJ of the previous page"),
        ("limit" = Option<u32>, Query, description = "Page size (default 20, max 100)")
    ),
    responses((status = 200, description = "Page of DJs", body = [Dj])),
    tag = "djs"
)]
pub async fn list_djs(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResponse<Vec<Dj>> {
    match state.storage.list_djs(query.request()).await {
        Ok(page) => ApiResponse::page(page.map(Dj::from)),
        Err(e) => {
            tracing::warn!(error = %e, "DJ listing served degraded");
            ApiResponse::degraded()
        }
    }
}

/// GET /api/djs/:id
#[utoipa::path(
    get,
    path = "/api/djs/{id}",
    params(("id" = Uuid, Path, description = "DJ id")),
    responses(
        (status = 200, description = "DJ profile", body = Dj),
        (status = 404, description = "DJ not found")
    ),
    tag = "djs"
)]
pub async fn get_dj(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Dj>, ApiError> {
    state
        .storage
        .get_dj(id)
        .await
        .map_err(|e| ApiError::storage("Failed to get DJ", e))?
        .map(|row| ApiResponse::ok(Dj::from(row)))
        .ok_or_else(|| ApiError::not_found("DJ no encontrado"))
}

/// PATCH /api/djs/:id - Update a DJ profile (owner or admin)
#[utoipa::path(
    patch,
    path = "/api/djs/{id}",
    params(("id" = Uuid, Path, description = "DJ id")),
    request_body = DjPatch,
    responses(
        (status = 200, description = "Updated profile", body = Dj),
        (status = 400, description = "Empty or invalid patch"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "DJ not found")
    ),
    security(("bearer_auth" = [])),
    tag = "djs"
)]
pub async fn update_dj(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<DjPatch>,
) -> Result<ApiResponse<Dj>, ApiError> {
    if patch.is_empty() {
        return Err(ApiError::validation("No hay cambios que aplicar"));
    }
    validate_optional_name("artistName", patch.artist_name.as_deref())?;
    validate_text("bio", patch.bio.as_deref())?;
    validate_optional_url("avatarUrl", patch.avatar_url.as_deref())?;
    validate_genres(patch.genres.as_deref())?;

    let dj = state
        .storage
        .get_dj(id)
        .await
        .map_err(|e| ApiError::storage("Failed to get DJ", e))?
        .ok_or_else(|| ApiError::not_found("DJ no encontrado"))?;

    if dj.user_id != user.id && !user.is_admin() {
        return Err(ApiError::forbidden("No puedes editar este perfil"));
    }

    let updated = state
        .storage
        .update_dj(id, patch)
        .await
        .map_err(|e| ApiError::storage("Failed to update DJ", e))?
        .ok_or_else(|| ApiError::not_found("DJ no encontrado"))?;

    tracing::info!(dj_id = %id, by = %user.id, "DJ profile updated");
    Ok(ApiResponse::ok(Dj::from(updated)).with_message("Perfil actualizado"))
}
