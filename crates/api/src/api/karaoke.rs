// Karaoke routes
// Decision: GET /api/karaoke/:id keeps its bare-object response (and bare {error}) for older clients

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use ondas_core::{KaraokeTrack, PageRequest};
use serde::Deserialize;
use uuid::Uuid;

use super::common::{ApiResponse, ErrorResponse};
use crate::AppState;

/// Query parameters for the karaoke catalog
#[derive(Debug, Default, Deserialize)]
pub struct ListKaraokeQuery {
    #[serde(default)]
    pub cursor: Option<Uuid>,
    #[serde(default)]
    pub limit: Option<u32>,
    /// Case-insensitive match on title or artist
    #[serde(default)]
    pub q: Option<String>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/karaoke", get(list_karaoke))
        .route("/api/karaoke/:id", get(get_karaoke_legacy))
        .with_state(state)
}

/// GET /api/karaoke - Karaoke catalog, newest first
#[utoipa::path(
    get,
    path = "/api/karaoke",
    params(
        ("cursor" = Option<Uuid>, Query, description = "Id of the last track of the previous page"),
        ("limit" = Option<u32>, Query, description = "Page size (default 20, max 100)"),
        ("q" = Option<String>, Query, description = "Search title or artist")
    ),
    responses((status = 200, description = "Page of tracks", body = [KaraokeTrack])),
    tag = "karaoke"
)]
pub async fn list_karaoke(
    State(state): State<AppState>,
    Query(query): Query<ListKaraokeQuery>,
) -> ApiResponse<Vec<KaraokeTrack>> {
    let request = PageRequest::new(query.cursor, query.limit);
    match state.storage.list_karaoke(query.q.as_deref(), request).await {
        Ok(page) => ApiResponse::page(page.map(KaraokeTrack::from)),
        Err(e) => {
            tracing::warn!(error = %e, "Karaoke listing served degraded");
            ApiResponse::degraded()
        }
    }
}

/// GET /api/karaoke/:id - Legacy: bare track object, or bare `{error}`
#[utoipa::path(
    get,
    path = "/api/karaoke/{id}",
    params(("id" = String, Path, description = "Track id")),
    responses(
        (status = 200, description = "Track (bare object)", body = KaraokeTrack),
        (status = 404, description = "Track not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "karaoke"
)]
pub async fn get_karaoke_legacy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let not_found = || {
        ErrorResponse::new("Canción no encontrada")
            .into_response(StatusCode::NOT_FOUND)
            .into_response()
    };

    // Malformed ids are reported like missing ones on this route
    let Ok(id) = Uuid::parse_str(&id) else {
        return not_found();
    };

    match state.storage.get_karaoke(id).await {
        Ok(Some(row)) => Json(KaraokeTrack::from(row)).into_response(),
        Ok(None) => not_found(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to get karaoke track");
            ErrorResponse::new("Error al obtener la canción")
                .into_response(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response()
        }
    }
}
