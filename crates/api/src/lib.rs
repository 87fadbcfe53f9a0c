// Ondas API library
// Decision: Shared by the server binary and the HTTP integration tests
// Decision: One AppState for every route; auth extractors reach AuthState via FromRef

pub mod api;
pub mod auth;
pub mod openapi;
pub mod storage;
pub mod telemetry;
pub mod uploads;

use axum::{
    extract::{FromRef, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{AuthConfig, AuthState};
use crate::storage::StorageBackend;
use crate::uploads::UploadConfig;

/// App state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub storage: StorageBackend,
    pub auth: AuthState,
    pub uploads: Arc<UploadConfig>,
}

impl AppState {
    pub fn new(storage: StorageBackend, auth_config: AuthConfig, uploads: UploadConfig) -> Self {
        Self {
            auth: AuthState::new(auth_config, storage.clone()),
            storage,
            uploads: Arc::new(uploads),
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    storage: &'static str,
}

/// GET /health - Liveness plus a storage probe
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let storage = match state.storage.ping().await {
        Ok(()) if state.storage.is_dev_mode() => "memory",
        Ok(()) => "postgres",
        Err(e) => {
            tracing::warn!(error = %e, "Health check: storage unreachable");
            "unavailable"
        }
    };
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage,
    })
}

/// All API routes plus `/health`, without prefix or middleware layers
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health).with_state(state.clone()))
        .merge(auth::routes(state.clone()))
        .merge(api::djs::routes(state.clone()))
        .merge(api::dj_requests::routes(state.clone()))
        .merge(api::mixes::routes(state.clone()))
        .merge(api::stations::routes(state.clone()))
        .merge(api::karaoke::routes(state.clone()))
        .merge(api::admin::routes(state.clone()))
        .merge(api::uploads::routes(state))
}

/// Build router with optional API prefix
pub fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}
