// Radio station routes
// Decision: Public reads only show active stations
// Decision: GET /api/radio keeps its bare-array response for older clients

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use ondas_core::RadioStation;
use uuid::Uuid;

use super::common::{ApiError, ApiResponse, ErrorResponse};
use crate::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/stations", get(list_stations))
        .route("/api/stations/:id", get(get_station))
        .route("/api/radio", get(list_radio_legacy))
        .with_state(state)
}

/// GET /api/stations - Active stations by name
#[utoipa::path(
    get,
    path = "/api/stations",
    responses((status = 200, description = "Active stations", body = [RadioStation])),
    tag = "stations"
)]
pub async fn list_stations(State(state): State<AppState>) -> ApiResponse<Vec<RadioStation>> {
    match state.storage.list_stations(true).await {
        Ok(rows) => ApiResponse::ok(rows.into_iter().map(RadioStation::from).collect()),
        Err(e) => {
            tracing::warn!(error = %e, "Station listing served degraded");
            ApiResponse::degraded()
        }
    }
}

/// GET /api/stations/:id
#[utoipa::path(
    get,
    path = "/api/stations/{id}",
    params(("id" = Uuid, Path, description = "Station id")),
    responses(
        (status = 200, description = "Station", body = RadioStation),
        (status = 404, description = "Station not found or inactive")
    ),
    tag = "stations"
)]
pub async fn get_station(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<RadioStation>, ApiError> {
    state
        .storage
        .get_station(id)
        .await
        .map_err(|e| ApiError::storage("Failed to get station", e))?
        .filter(|row| row.is_active)
        .map(|row| ApiResponse::ok(RadioStation::from(row)))
        .ok_or_else(|| ApiError::not_found("Emisora no encontrada"))
}

/// GET /api/radio - Legacy listing: bare JSON array, no envelope
#[utoipa::path(
    get,
    path = "/api/radio",
    responses(
        (status = 200, description = "Active stations (bare array)", body = [RadioStation]),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "stations"
)]
pub async fn list_radio_legacy(State(state): State<AppState>) -> Response {
    match state.storage.list_stations(true).await {
        Ok(rows) => {
            Json(rows.into_iter().map(RadioStation::from).collect::<Vec<_>>()).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list stations for legacy route");
            ErrorResponse::new("Error al obtener las emisoras")
                .into_response(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response()
        }
    }
}
