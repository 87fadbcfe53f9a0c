// Upload signing routes
// Decision: A provider without credentials answers 503 UPLOADS_NOT_CONFIGURED

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::{ApiError, ApiResponse};
use super::validation::{validate_content_type, validate_name, validate_optional_name};
use crate::auth::DjUser;
use crate::uploads::{s3::sanitize_file_name, CloudinarySignature, PresignedUpload};
use crate::AppState;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloudinarySignRequest {
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub public_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct S3PresignRequest {
    pub file_name: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/uploads/cloudinary/sign", post(sign_cloudinary))
        .route("/api/uploads/s3/presign", post(presign_s3))
        .with_state(state)
}

fn not_configured(provider: &str) -> ApiError {
    ApiError::new(
        StatusCode::SERVICE_UNAVAILABLE,
        "UPLOADS_NOT_CONFIGURED",
        format!("Las subidas a {provider} no están configuradas"),
    )
}

/// POST /api/uploads/cloudinary/sign - Signed parameters for a direct upload
#[utoipa::path(
    post,
    path = "/api/uploads/cloudinary/sign",
    request_body = CloudinarySignRequest,
    responses(
        (status = 200, description = "Upload signature", body = CloudinarySignature),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not a DJ"),
        (status = 503, description = "Cloudinary not configured")
    ),
    security(("bearer_auth" = [])),
    tag = "uploads"
)]
pub async fn sign_cloudinary(
    State(state): State<AppState>,
    DjUser(user): DjUser,
    body: Option<Json<CloudinarySignRequest>>,
) -> Result<ApiResponse<CloudinarySignature>, ApiError> {
    let cloudinary = state
        .uploads
        .cloudinary
        .as_ref()
        .ok_or_else(|| not_configured("Cloudinary"))?;

    let Json(req) = body.unwrap_or_default();
    validate_optional_name("folder", req.folder.as_deref())?;
    validate_optional_name("publicId", req.public_id.as_deref())?;

    let signed = cloudinary.sign_upload(req.folder, req.public_id, Utc::now().timestamp());
    tracing::debug!(user_id = %user.id, "Cloudinary upload signed");
    Ok(ApiResponse::ok(signed))
}

/// POST /api/uploads/s3/presign - Presigned PUT URL for a direct upload
///
/// A `contentType` is signed into the URL; the PUT must carry the same header.
#[utoipa::path(
    post,
    path = "/api/uploads/s3/presign",
    request_body = S3PresignRequest,
    responses(
        (status = 200, description = "Presigned upload", body = PresignedUpload),
        (status = 400, description = "Invalid file name"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not a DJ"),
        (status = 503, description = "S3 not configured")
    ),
    security(("bearer_auth" = [])),
    tag = "uploads"
)]
pub async fn presign_s3(
    State(state): State<AppState>,
    DjUser(user): DjUser,
    Json(req): Json<S3PresignRequest>,
) -> Result<ApiResponse<PresignedUpload>, ApiError> {
    let s3 = state
        .uploads
        .s3
        .as_ref()
        .ok_or_else(|| not_configured("S3"))?;

    validate_name("fileName", &req.file_name)?;
    validate_content_type(req.content_type.as_deref())?;

    let key = format!(
        "uploads/{}/{}-{}",
        user.id,
        Uuid::now_v7(),
        sanitize_file_name(&req.file_name)
    );

    let presigned = s3
        .presign("PUT", &key, req.content_type.as_deref(), Utc::now())
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to presign S3 upload");
            ApiError::internal()
        })?;

    tracing::debug!(user_id = %user.id, key = %presigned.key, "S3 upload presigned");
    Ok(ApiResponse::ok(presigned))
}
