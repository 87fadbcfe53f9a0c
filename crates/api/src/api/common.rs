// Response envelope and API errors
//
// Every route answers `{success, data?, error?: {code, message}, message?,
// warning?, nextCursor?}`. Two legacy routes answer bare JSON instead and use
// `ErrorResponse` for their failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ondas_core::Page;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Warning attached to list reads served while storage is unreachable
pub const DB_UNAVAILABLE: &str = "DB_UNAVAILABLE";

/// Machine-readable error carried in the envelope
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Standard response envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<Uuid>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            warning: None,
            next_cursor: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// Success without a payload
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            message: Some(message.into()),
            warning: None,
            next_cursor: None,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// One page of a cursor-paginated list
    pub fn page(page: Page<T>) -> Self {
        Self {
            next_cursor: page.next_cursor,
            ..Self::ok(page.items)
        }
    }

    /// Empty success served when storage is unreachable
    pub fn degraded() -> Self {
        Self {
            warning: Some(DB_UNAVAILABLE.to_string()),
            ..Self::ok(Vec::new())
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Bare error body used by the legacy routes
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    pub fn into_response(self, status: StatusCode) -> (StatusCode, Json<Self>) {
        (status, Json(self))
    }
}

/// Error returned by handlers and extractors, rendered as the failure envelope
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "CONFLICT", message)
    }

    /// A moderation decision on an item that was already decided
    pub fn already_processed() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "ALREADY_PROCESSED",
            "Solicitud ya procesada",
        )
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", message)
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Error interno del servidor",
        )
    }

    /// Log a storage failure and hide its details from the client
    pub fn storage(context: &str, err: anyhow::Error) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::internal()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: self.code.to_string(),
                message: self.message.clone(),
            }),
            message: Some(self.message),
            warning: None,
            next_cursor: None,
        };
        (self.status, Json(body)).into_response()
    }
}
