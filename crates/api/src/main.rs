// Ondas API server
// Decision: Missing signing secret is a startup error, not a fallback
// Decision: No DATABASE_URL means in-memory dev mode

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use ondas_api::auth::AuthConfig;
use ondas_api::openapi::ApiDoc;
use ondas_api::storage::StorageBackend;
use ondas_api::telemetry::{init_tracing, TelemetryConfig};
use ondas_api::uploads::UploadConfig;
use ondas_api::{build_app, build_router_with_prefix, AppState};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9000";

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    init_tracing(TelemetryConfig::from_env());
    tracing::info!("ondas-api starting...");

    let auth_config = AuthConfig::from_env().context("Invalid authentication configuration")?;
    tracing::info!(
        access_ttl_secs = auth_config.jwt.access_token_lifetime.as_secs(),
        refresh_ttl_secs = auth_config.jwt.refresh_token_lifetime.as_secs(),
        secure_cookies = auth_config.secure_cookies,
        "Authentication configured"
    );

    let upload_config = UploadConfig::from_env().context("Invalid upload configuration")?;
    tracing::info!(
        cloudinary = upload_config.cloudinary.is_some(),
        s3 = upload_config.s3.is_some(),
        "Upload providers configured"
    );

    let storage = match std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()) {
        Some(url) => {
            let storage = StorageBackend::postgres(&url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");
            storage
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage (dev mode)");
            StorageBackend::in_memory()
        }
    };

    // Example: API_PREFIX="/v1" results in routes like /v1/api/mixes
    let api_prefix = auth_config.api_prefix.clone();
    let state = AppState::new(storage, auth_config, upload_config);

    if !api_prefix.is_empty() {
        tracing::info!(prefix = %api_prefix, "API prefix configured");
    }

    // Example: CORS_ALLOWED_ORIGINS="https://ondas.fm,https://admin.ondas.fm"
    let cors_origins: Vec<HeaderValue> = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect()
        })
        .unwrap_or_default();

    if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
    }

    let app = build_router_with_prefix(build_app(state), &api_prefix)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Credentials are allowed so the session and refresh cookies travel cross-origin
    let app = if !cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                    header::CACHE_CONTROL,
                ])
                .allow_credentials(true),
        )
    } else {
        app
    };

    let app = app.layer(TraceLayer::new_for_http());

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
