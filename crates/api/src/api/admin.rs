// Admin routes
// Decision: Every handler takes AdminUser; non-admin callers are rejected
//           before any storage access
// Decision: A moderation decision on an already-decided item is a 400, not a conflict
// Decision: POST /admin/mixes/:id/approve is a legacy route that does not persist
//           anything; PATCH /admin/mixes/:id is the one that records the decision

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use ondas_core::{
    promo::normalize_code, DjRequest, KaraokePatch, KaraokeTrack, Mix, PageRequest, PromoCode,
    RadioStation, ReviewAction, ReviewStatus, Role, StationPatch, User,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::{ApiError, ApiResponse};
use super::validation::{
    validate_duration, validate_name, validate_optional_name, validate_optional_url, validate_text,
    validate_url,
};
use crate::auth::AdminUser;
use crate::storage::{
    CreateKaraokeRow, CreatePromoCodeRow, CreateStationRow, MixFilter, PromoActivation,
    ReviewOutcome,
};
use crate::AppState;

// ============================================
// Request / query types
// ============================================

/// `?status=PENDING|APPROVED|REJECTED`
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub status: Option<ReviewStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminMixesQuery {
    #[serde(default)]
    pub status: Option<ReviewStatus>,
    #[serde(default)]
    pub cursor: Option<Uuid>,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: Option<String>,
}

/// Approve or reject a pending item
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewRequest {
    pub action: ReviewAction,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStationRequest {
    pub name: String,
    pub stream_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateKaraokeRequest {
    pub title: String,
    pub artist: String,
    pub audio_url: String,
    #[serde(default)]
    pub lyrics_url: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePromoCodeRequest {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ActivatePromoRequest {
    pub code: String,
}

/// Response of the legacy approve route
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LegacyApproval {
    pub id: Uuid,
    pub status: ReviewStatus,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/admin/djs/:id", delete(delete_dj))
        .route("/api/admin/dj-requests", get(list_dj_requests))
        .route("/api/admin/dj-requests/:id", patch(review_dj_request))
        .route("/api/admin/mixes", get(list_mixes))
        .route("/api/admin/mixes/:id", patch(review_mix))
        .route("/api/admin/mixes/:id/approve", post(approve_mix_legacy))
        .route("/api/admin/stations", get(list_stations).post(create_station))
        .route(
            "/api/admin/stations/:id",
            patch(update_station).delete(delete_station),
        )
        .route("/api/admin/karaoke", post(create_karaoke))
        .route(
            "/api/admin/karaoke/:id",
            patch(update_karaoke).delete(delete_karaoke),
        )
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/:id", delete(delete_user))
        .route("/api/admin/users/:id/role", patch(update_user_role))
        .route("/api/admin/promo-codes", post(create_promo_code))
        .route("/api/admin/promo/activate", post(activate_promo_code))
        .with_state(state)
}

// ============================================
// DJs and DJ requests
// ============================================

/// DELETE /api/admin/djs/:id - Remove a DJ profile and its mixes
#[utoipa::path(
    delete,
    path = "/api/admin/djs/{id}",
    params(("id" = Uuid, Path, description = "DJ id")),
    responses(
        (status = 200, description = "DJ deleted"),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "DJ not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn delete_dj(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, ApiError> {
    let deleted = state
        .storage
        .delete_dj(id)
        .await
        .map_err(|e| ApiError::storage("Failed to delete DJ", e))?;
    if !deleted {
        return Err(ApiError::not_found("DJ no encontrado"));
    }
    tracing::info!(dj_id = %id, admin_id = %admin.id, "DJ deleted");
    Ok(ApiResponse::done("DJ eliminado"))
}

/// GET /api/admin/dj-requests
#[utoipa::path(
    get,
    path = "/api/admin/dj-requests",
    params(("status" = Option<ReviewStatus>, Query, description = "Filter by status")),
    responses(
        (status = 200, description = "DJ requests", body = [DjRequest]),
        (status = 401, description = "Not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_dj_requests(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<StatusQuery>,
) -> Result<ApiResponse<Vec<DjRequest>>, ApiError> {
    let rows = state
        .storage
        .list_dj_requests(query.status)
        .await
        .map_err(|e| ApiError::storage("Failed to list DJ requests", e))?;
    Ok(ApiResponse::ok(rows.into_iter().map(DjRequest::from).collect()))
}

/// PATCH /api/admin/dj-requests/:id - Approve or reject a DJ request
///
/// Approval promotes the applicant to DJ and creates their profile in the
/// same storage operation.
#[utoipa::path(
    patch,
    path = "/api/admin/dj-requests/{id}",
    params(("id" = Uuid, Path, description = "DJ request id")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Decision recorded", body = DjRequest),
        (status = 400, description = "Request already processed"),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "Request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn review_dj_request(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ReviewRequest>,
) -> Result<ApiResponse<DjRequest>, ApiError> {
    let outcome = state
        .storage
        .review_dj_request(id, req.action, admin.id)
        .await
        .map_err(|e| ApiError::storage("Failed to review DJ request", e))?;

    match outcome {
        ReviewOutcome::NotFound => Err(ApiError::not_found("Solicitud no encontrada")),
        ReviewOutcome::AlreadyProcessed(row) => {
            tracing::debug!(request_id = %id, status = %row.status(), "DJ request already processed");
            Err(ApiError::already_processed())
        }
        ReviewOutcome::Processed(row) => {
            tracing::info!(
                request_id = %id,
                user_id = %row.user_id,
                status = %row.status(),
                admin_id = %admin.id,
                "DJ request reviewed"
            );
            let message = match req.action {
                ReviewAction::Approve => "Solicitud aprobada",
                ReviewAction::Reject => "Solicitud rechazada",
            };
            Ok(ApiResponse::ok(DjRequest::from(row)).with_message(message))
        }
    }
}

// ============================================
// Mixes
// ============================================

/// GET /api/admin/mixes - All mixes, optionally by status
#[utoipa::path(
    get,
    path = "/api/admin/mixes",
    params(
        ("status" = Option<ReviewStatus>, Query, description = "Filter by status"),
        ("cursor" = Option<Uuid>, Query, description = "Id of the last mix of the previous page"),
        ("limit" = Option<u32>, Query, description = "Page size (default 20, max 100)")
    ),
    responses(
        (status = 200, description = "Page of mixes", body = [Mix]),
        (status = 401, description = "Not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_mixes(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<AdminMixesQuery>,
) -> Result<ApiResponse<Vec<Mix>>, ApiError> {
    let filter = MixFilter {
        status: query.status,
        dj_id: None,
    };
    let page = state
        .storage
        .list_mixes(filter, PageRequest::new(query.cursor, query.limit))
        .await
        .map_err(|e| ApiError::storage("Failed to list mixes", e))?;
    Ok(ApiResponse::page(page.map(Mix::from)))
}

/// PATCH /api/admin/mixes/:id - Approve or reject a pending mix
#[utoipa::path(
    patch,
    path = "/api/admin/mixes/{id}",
    params(("id" = Uuid, Path, description = "Mix id")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Decision recorded", body = Mix),
        (status = 400, description = "Mix already processed"),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "Mix not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn review_mix(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ReviewRequest>,
) -> Result<ApiResponse<Mix>, ApiError> {
    let outcome = state
        .storage
        .review_mix(id, req.action)
        .await
        .map_err(|e| ApiError::storage("Failed to review mix", e))?;

    match outcome {
        ReviewOutcome::NotFound => Err(ApiError::not_found("Mix no encontrado")),
        ReviewOutcome::AlreadyProcessed(_) => Err(ApiError::already_processed()),
        ReviewOutcome::Processed(row) => {
            tracing::info!(mix_id = %id, status = %row.status(), admin_id = %admin.id, "Mix reviewed");
            Ok(ApiResponse::ok(Mix::from(row)))
        }
    }
}

/// POST /api/admin/mixes/:id/approve - Legacy approval
///
/// Logs the request and answers as if the mix had been approved. Nothing is
/// written; clients must use PATCH /api/admin/mixes/:id to record a decision.
#[utoipa::path(
    post,
    path = "/api/admin/mixes/{id}/approve",
    params(("id" = Uuid, Path, description = "Mix id")),
    responses(
        (status = 200, description = "Synthetic approval (not persisted)", body = LegacyApproval),
        (status = 401, description = "Not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn approve_mix_legacy(
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResponse<LegacyApproval> {
    tracing::warn!(
        mix_id = %id,
        admin_id = %admin.id,
        "Legacy mix approve route called; status not persisted"
    );
    ApiResponse::ok(LegacyApproval {
        id,
        status: ReviewStatus::Approved,
    })
    .with_message("Mix aprobado")
}

// ============================================
// Radio stations
// ============================================

/// GET /api/admin/stations - All stations including inactive ones
#[utoipa::path(
    get,
    path = "/api/admin/stations",
    responses(
        (status = 200, description = "All stations", body = [RadioStation]),
        (status = 401, description = "Not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_stations(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<ApiResponse<Vec<RadioStation>>, ApiError> {
    let rows = state
        .storage
        .list_stations(false)
        .await
        .map_err(|e| ApiError::storage("Failed to list stations", e))?;
    Ok(ApiResponse::ok(rows.into_iter().map(RadioStation::from).collect()))
}

/// POST /api/admin/stations
#[utoipa::path(
    post,
    path = "/api/admin/stations",
    request_body = CreateStationRequest,
    responses(
        (status = 201, description = "Station created", body = RadioStation),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn create_station(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(req): Json<CreateStationRequest>,
) -> Result<(StatusCode, ApiResponse<RadioStation>), ApiError> {
    validate_name("name", &req.name)?;
    validate_url("streamUrl", &req.stream_url)?;
    validate_text("description", req.description.as_deref())?;
    validate_optional_url("logoUrl", req.logo_url.as_deref())?;
    validate_optional_name("genre", req.genre.as_deref())?;

    let row = state
        .storage
        .create_station(CreateStationRow {
            name: req.name.trim().to_string(),
            stream_url: req.stream_url.trim().to_string(),
            description: req.description,
            logo_url: req.logo_url,
            genre: req.genre,
            is_active: req.is_active,
        })
        .await
        .map_err(|e| ApiError::storage("Failed to create station", e))?;

    tracing::info!(station_id = %row.id, admin_id = %admin.id, "Station created");
    Ok((StatusCode::CREATED, ApiResponse::ok(RadioStation::from(row))))
}

/// PATCH /api/admin/stations/:id
#[utoipa::path(
    patch,
    path = "/api/admin/stations/{id}",
    params(("id" = Uuid, Path, description = "Station id")),
    request_body = StationPatch,
    responses(
        (status = 200, description = "Updated station", body = RadioStation),
        (status = 400, description = "Empty or invalid patch"),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "Station not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn update_station(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<StationPatch>,
) -> Result<ApiResponse<RadioStation>, ApiError> {
    if patch.is_empty() {
        return Err(ApiError::validation("No hay cambios que aplicar"));
    }
    validate_optional_name("name", patch.name.as_deref())?;
    validate_optional_url("streamUrl", patch.stream_url.as_deref())?;
    validate_text("description", patch.description.as_deref())?;
    validate_optional_url("logoUrl", patch.logo_url.as_deref())?;
    validate_optional_name("genre", patch.genre.as_deref())?;

    state
        .storage
        .update_station(id, patch)
        .await
        .map_err(|e| ApiError::storage("Failed to update station", e))?
        .map(|row| ApiResponse::ok(RadioStation::from(row)))
        .ok_or_else(|| ApiError::not_found("Emisora no encontrada"))
}

/// DELETE /api/admin/stations/:id
#[utoipa::path(
    delete,
    path = "/api/admin/stations/{id}",
    params(("id" = Uuid, Path, description = "Station id")),
    responses(
        (status = 200, description = "Station deleted"),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "Station not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn delete_station(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, ApiError> {
    let deleted = state
        .storage
        .delete_station(id)
        .await
        .map_err(|e| ApiError::storage("Failed to delete station", e))?;
    if !deleted {
        return Err(ApiError::not_found("Emisora no encontrada"));
    }
    tracing::info!(station_id = %id, admin_id = %admin.id, "Station deleted");
    Ok(ApiResponse::done("Emisora eliminada"))
}

// ============================================
// Karaoke tracks
// ============================================

/// POST /api/admin/karaoke
#[utoipa::path(
    post,
    path = "/api/admin/karaoke",
    request_body = CreateKaraokeRequest,
    responses(
        (status = 201, description = "Track created", body = KaraokeTrack),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn create_karaoke(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(req): Json<CreateKaraokeRequest>,
) -> Result<(StatusCode, ApiResponse<KaraokeTrack>), ApiError> {
    validate_name("title", &req.title)?;
    validate_name("artist", &req.artist)?;
    validate_url("audioUrl", &req.audio_url)?;
    validate_optional_url("lyricsUrl", req.lyrics_url.as_deref())?;
    validate_optional_url("coverUrl", req.cover_url.as_deref())?;
    validate_duration(req.duration_seconds)?;

    let row = state
        .storage
        .create_karaoke(CreateKaraokeRow {
            title: req.title.trim().to_string(),
            artist: req.artist.trim().to_string(),
            audio_url: req.audio_url.trim().to_string(),
            lyrics_url: req.lyrics_url,
            cover_url: req.cover_url,
            duration_seconds: req.duration_seconds,
        })
        .await
        .map_err(|e| ApiError::storage("Failed to create karaoke track", e))?;

    tracing::info!(track_id = %row.id, admin_id = %admin.id, "Karaoke track created");
    Ok((StatusCode::CREATED, ApiResponse::ok(KaraokeTrack::from(row))))
}

/// PATCH /api/admin/karaoke/:id
#[utoipa::path(
    patch,
    path = "/api/admin/karaoke/{id}",
    params(("id" = Uuid, Path, description = "Track id")),
    request_body = KaraokePatch,
    responses(
        (status = 200, description = "Updated track", body = KaraokeTrack),
        (status = 400, description = "Empty or invalid patch"),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "Track not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn update_karaoke(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<KaraokePatch>,
) -> Result<ApiResponse<KaraokeTrack>, ApiError> {
    if patch.is_empty() {
        return Err(ApiError::validation("No hay cambios que aplicar"));
    }
    validate_optional_name("title", patch.title.as_deref())?;
    validate_optional_name("artist", patch.artist.as_deref())?;
    validate_optional_url("audioUrl", patch.audio_url.as_deref())?;
    validate_optional_url("lyricsUrl", patch.lyrics_url.as_deref())?;
    validate_optional_url("coverUrl", patch.cover_url.as_deref())?;
    validate_duration(patch.duration_seconds)?;

    state
        .storage
        .update_karaoke(id, patch)
        .await
        .map_err(|e| ApiError::storage("Failed to update karaoke track", e))?
        .map(|row| ApiResponse::ok(KaraokeTrack::from(row)))
        .ok_or_else(|| ApiError::not_found("Canción no encontrada"))
}

/// DELETE /api/admin/karaoke/:id
#[utoipa::path(
    delete,
    path = "/api/admin/karaoke/{id}",
    params(("id" = Uuid, Path, description = "Track id")),
    responses(
        (status = 200, description = "Track deleted"),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "Track not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn delete_karaoke(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, ApiError> {
    let deleted = state
        .storage
        .delete_karaoke(id)
        .await
        .map_err(|e| ApiError::storage("Failed to delete karaoke track", e))?;
    if !deleted {
        return Err(ApiError::not_found("Canción no encontrada"));
    }
    Ok(ApiResponse::done("Canción eliminada"))
}

// ============================================
// Users
// ============================================

/// GET /api/admin/users - Users, optionally filtered by name or email
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(("search" = Option<String>, Query, description = "Search by name or email")),
    responses(
        (status = 200, description = "Users", body = [User]),
        (status = 401, description = "Not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<SearchQuery>,
) -> Result<ApiResponse<Vec<User>>, ApiError> {
    let rows = state
        .storage
        .list_users(query.search.as_deref())
        .await
        .map_err(|e| ApiError::storage("Failed to list users", e))?;
    Ok(ApiResponse::ok(rows.into_iter().map(User::from).collect()))
}

/// PATCH /api/admin/users/:id/role
///
/// Takes effect for bearer tokens at the next refresh. The user's cookie
/// sessions are revoked.
#[utoipa::path(
    patch,
    path = "/api/admin/users/{id}/role",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = User),
        (status = 400, description = "Admins cannot change their own role"),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn update_user_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<ApiResponse<User>, ApiError> {
    if id == admin.id {
        return Err(ApiError::validation("No puedes cambiar tu propio rol"));
    }

    let row = state
        .storage
        .update_user_role(id, req.role)
        .await
        .map_err(|e| ApiError::storage("Failed to update user role", e))?
        .ok_or_else(|| ApiError::not_found("Usuario no encontrado"))?;

    tracing::info!(user_id = %id, role = %req.role, admin_id = %admin.id, "User role changed");
    Ok(ApiResponse::ok(User::from(row)).with_message("Rol actualizado"))
}

/// DELETE /api/admin/users/:id
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Admins cannot delete themselves"),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, ApiError> {
    if id == admin.id {
        return Err(ApiError::validation("No puedes eliminar tu propia cuenta"));
    }

    let deleted = state
        .storage
        .delete_user(id)
        .await
        .map_err(|e| ApiError::storage("Failed to delete user", e))?;
    if !deleted {
        return Err(ApiError::not_found("Usuario no encontrado"));
    }

    tracing::info!(user_id = %id, admin_id = %admin.id, "User deleted");
    Ok(ApiResponse::done("Usuario eliminado"))
}

// ============================================
// Promo codes
// ============================================

/// POST /api/admin/promo-codes - Create an inactive promo code
#[utoipa::path(
    post,
    path = "/api/admin/promo-codes",
    request_body = CreatePromoCodeRequest,
    responses(
        (status = 201, description = "Promo code created", body = PromoCode),
        (status = 401, description = "Not an admin"),
        (status = 409, description = "Code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn create_promo_code(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(req): Json<CreatePromoCodeRequest>,
) -> Result<(StatusCode, ApiResponse<PromoCode>), ApiError> {
    let code = normalize_code(&req.code);
    validate_name("code", &code)?;
    validate_text("description", req.description.as_deref())?;

    let row = state
        .storage
        .create_promo_code(CreatePromoCodeRow {
            code,
            description: req.description,
        })
        .await
        .map_err(|e| ApiError::storage("Failed to create promo code", e))?
        .ok_or_else(|| ApiError::conflict("El código ya existe"))?;

    Ok((StatusCode::CREATED, ApiResponse::ok(PromoCode::from(row))))
}

/// POST /api/admin/promo/activate
#[utoipa::path(
    post,
    path = "/api/admin/promo/activate",
    request_body = ActivatePromoRequest,
    responses(
        (status = 200, description = "Code activated", body = PromoCode),
        (status = 400, description = "Code already active"),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "Unknown code")
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn activate_promo_code(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(req): Json<ActivatePromoRequest>,
) -> Result<ApiResponse<PromoCode>, ApiError> {
    let code = normalize_code(&req.code);
    if code.is_empty() {
        return Err(ApiError::validation("El campo code es obligatorio"));
    }

    let outcome = state
        .storage
        .activate_promo_code(&code, admin.id)
        .await
        .map_err(|e| ApiError::storage("Failed to activate promo code", e))?;

    match outcome {
        PromoActivation::NotFound => Err(ApiError::not_found("Código no encontrado")),
        PromoActivation::AlreadyActive(_) => Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "ALREADY_ACTIVE",
            "El código ya está activo",
        )),
        PromoActivation::Activated(row) => {
            tracing::info!(code = %row.code, admin_id = %admin.id, "Promo code activated");
            Ok(ApiResponse::ok(PromoCode::from(row)).with_message("Código activado"))
        }
    }
}
