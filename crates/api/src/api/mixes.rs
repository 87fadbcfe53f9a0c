// Mix routes
// Decision: The public listing only shows APPROVED mixes and degrades when storage is down
// Decision: New mixes start PENDING; only the owning DJ or an admin may edit or delete
// Decision: Unapproved mixes are hidden (404) from everyone but the owner and admins

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use ondas_core::{Mix, MixPatch, PageRequest, ReviewStatus};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::{ApiError, ApiResponse};
use super::validation::{
    validate_duration, validate_name, validate_optional_name, validate_optional_url, validate_text,
    validate_url,
};
use crate::auth::{AuthUser, DjUser, OptionalAuthUser};
use crate::storage::{CreateMixRow, MixFilter, MixRow};
use crate::AppState;

/// Query parameters for the public mix listing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMixesQuery {
    #[serde(default)]
    pub cursor: Option<Uuid>,
    #[serde(default)]
    pub limit: Option<u32>,
    /// Only mixes of this DJ
    #[serde(default)]
    pub dj_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMixRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub audio_url: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<i32>,
    /// Admins may publish on behalf of a DJ; ignored for DJs
    #[serde(default)]
    pub dj_id: Option<Uuid>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/mixes", get(list_mixes).post(create_mix))
        .route(
            "/api/mixes/:id",
            get(get_mix).patch(update_mix).delete(delete_mix),
        )
        .with_state(state)
}

/// Whether `user` owns the DJ profile a mix belongs to
async fn owns_mix(state: &AppState, user: &AuthUser, mix: &MixRow) -> Result<bool, ApiError> {
    let dj = state
        .storage
        .get_dj(mix.dj_id)
        .await
        .map_err(|e| ApiError::storage("Failed to load mix owner", e))?;
    Ok(dj.is_some_and(|dj| dj.user_id == user.id))
}

async fn load_mix(state: &AppState, id: Uuid) -> Result<MixRow, ApiError> {
    state
        .storage
        .get_mix(id)
        .await
        .map_err(|e| ApiError::storage("Failed to get mix", e))?
        .ok_or_else(|| ApiError::not_found("Mix no encontrado"))
}

/// Load a mix the caller may modify
async fn load_owned_mix(state: &AppState, user: &AuthUser, id: Uuid) -> Result<MixRow, ApiError> {
    let mix = load_mix(state, id).await?;
    if !user.is_admin() && !owns_mix(state, user, &mix).await? {
        return Err(ApiError::forbidden("No puedes modificar este mix"));
    }
    Ok(mix)
}

/// GET /api/mixes - Approved mixes, newest first
#[utoipa::path(
    get,
    path = "/api/mixes",
    params(
        ("cursor" = Option<Uuid>, Query, description = "Id of the last mix of the previous page"),
        ("limit" = Option<u32>, Query, description = "Page size (default 20, max 100)"),
        ("djId" = Option<Uuid>, Query, description = "Only mixes of this DJ")
    ),
    responses((status = 200, description = "Page of mixes", body = [Mix])),
    tag = "mixes"
)]
pub async fn list_mixes(
    State(state): State<AppState>,
    Query(query): Query<ListMixesQuery>,
) -> ApiResponse<Vec<Mix>> {
    let filter = MixFilter {
        status: Some(ReviewStatus::Approved),
        dj_id: query.dj_id,
    };
    let request = PageRequest::new(query.cursor, query.limit);

    match state.storage.list_mixes(filter, request).await {
        Ok(page) => ApiResponse::page(page.map(Mix::from)),
        Err(e) => {
            tracing::warn!(error = %e, "Mix listing served degraded");
            ApiResponse::degraded()
        }
    }
}

/// GET /api/mixes/:id
#[utoipa::path(
    get,
    path = "/api/mixes/{id}",
    params(("id" = Uuid, Path, description = "Mix id")),
    responses(
        (status = 200, description = "Mix", body = Mix),
        (status = 404, description = "Mix not found")
    ),
    tag = "mixes"
)]
pub async fn get_mix(
    State(state): State<AppState>,
    OptionalAuthUser(user): OptionalAuthUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Mix>, ApiError> {
    let mix = load_mix(&state, id).await?;

    if mix.status() != ReviewStatus::Approved {
        let visible = match &user {
            Some(user) if user.is_admin() => true,
            Some(user) => owns_mix(&state, user, &mix).await?,
            None => false,
        };
        if !visible {
            return Err(ApiError::not_found("Mix no encontrado"));
        }
    }

    Ok(ApiResponse::ok(Mix::from(mix)))
}

/// POST /api/mixes - Publish a mix for review (DJ or admin)
#[utoipa::path(
    post,
    path = "/api/mixes",
    request_body = CreateMixRequest,
    responses(
        (status = 201, description = "Mix created, pending review", body = Mix),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Caller has no DJ profile")
    ),
    security(("bearer_auth" = [])),
    tag = "mixes"
)]
pub async fn create_mix(
    State(state): State<AppState>,
    DjUser(user): DjUser,
    Json(req): Json<CreateMixRequest>,
) -> Result<(StatusCode, ApiResponse<Mix>), ApiError> {
    validate_name("title", &req.title)?;
    validate_text("description", req.description.as_deref())?;
    validate_url("audioUrl", &req.audio_url)?;
    validate_optional_url("coverUrl", req.cover_url.as_deref())?;
    validate_optional_name("genre", req.genre.as_deref())?;
    validate_duration(req.duration_seconds)?;

    let dj = match req.dj_id.filter(|_| user.is_admin()) {
        Some(dj_id) => state
            .storage
            .get_dj(dj_id)
            .await
            .map_err(|e| ApiError::storage("Failed to get DJ", e))?
            .ok_or_else(|| ApiError::not_found("DJ no encontrado"))?,
        None => state
            .storage
            .get_dj_by_user(user.id)
            .await
            .map_err(|e| ApiError::storage("Failed to get DJ profile", e))?
            .ok_or_else(|| ApiError::forbidden("Necesitas un perfil de DJ para publicar mixes"))?,
    };

    let row = state
        .storage
        .create_mix(CreateMixRow {
            dj_id: dj.id,
            title: req.title.trim().to_string(),
            description: req.description,
            audio_url: req.audio_url.trim().to_string(),
            cover_url: req.cover_url,
            genre: req.genre,
            duration_seconds: req.duration_seconds,
        })
        .await
        .map_err(|e| ApiError::storage("Failed to create mix", e))?;

    tracing::info!(mix_id = %row.id, dj_id = %dj.id, "Mix submitted for review");
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(Mix::from(row)).with_message("Mix enviado para revisión"),
    ))
}

/// PATCH /api/mixes/:id - Edit mix metadata (owner or admin)
#[utoipa::path(
    patch,
    path = "/api/mixes/{id}",
    params(("id" = Uuid, Path, description = "Mix id")),
    request_body = MixPatch,
    responses(
        (status = 200, description = "Updated mix", body = Mix),
        (status = 400, description = "Empty or invalid patch"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Mix not found")
    ),
    security(("bearer_auth" = [])),
    tag = "mixes"
)]
pub async fn update_mix(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<MixPatch>,
) -> Result<ApiResponse<Mix>, ApiError> {
    if patch.is_empty() {
        return Err(ApiError::validation("No hay cambios que aplicar"));
    }
    validate_optional_name("title", patch.title.as_deref())?;
    validate_text("description", patch.description.as_deref())?;
    validate_optional_url("audioUrl", patch.audio_url.as_deref())?;
    validate_optional_url("coverUrl", patch.cover_url.as_deref())?;
    validate_optional_name("genre", patch.genre.as_deref())?;
    validate_duration(patch.duration_seconds)?;

    load_owned_mix(&state, &user, id).await?;

    let updated = state
        .storage
        .update_mix(id, patch)
        .await
        .map_err(|e| ApiError::storage("Failed to update mix", e))?
        .ok_or_else(|| ApiError::not_found("Mix no encontrado"))?;

    Ok(ApiResponse::ok(Mix::from(updated)).with_message("Mix actualizado"))
}

/// DELETE /api/mixes/:id (owner or admin)
#[utoipa::path(
    delete,
    path = "/api/mixes/{id}",
    params(("id" = Uuid, Path, description = "Mix id")),
    responses(
        (status = 200, description = "Mix deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Mix not found")
    ),
    security(("bearer_auth" = [])),
    tag = "mixes"
)]
pub async fn delete_mix(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, ApiError> {
    load_owned_mix(&state, &user, id).await?;

    let deleted = state
        .storage
        .delete_mix(id)
        .await
        .map_err(|e| ApiError::storage("Failed to delete mix", e))?;
    if !deleted {
        return Err(ApiError::not_found("Mix no encontrado"));
    }

    tracing::info!(mix_id = %id, by = %user.id, "Mix deleted");
    Ok(ApiResponse::done("Mix eliminado"))
}
