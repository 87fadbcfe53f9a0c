// HTTP API routes
//
// Each submodule handles one resource and exposes `routes(AppState)`.

pub mod admin;
pub mod common;
pub mod dj_requests;
pub mod djs;
pub mod karaoke;
pub mod mixes;
pub mod stations;
pub mod uploads;
pub mod validation;

// Re-export common types
pub use common::{ApiError, ApiResponse, ErrorResponse};
