//! HTTP handlers

pub mod gifts;
pub mod user_gifts;
pub mod users;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gift_core::{GiftError, InvalidId};
use serde_json::json;

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

/// Error response body: `{"error": ..., "code": ...}`
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "code": self.code
        }));
        (self.status, body).into_response()
    }
}

impl From<GiftError> for ApiError {
    fn from(e: GiftError) -> Self {
        let status = match &e {
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            GiftError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", e);
        }
        ApiError {
            status,
            code: e.code(),
            message: e.to_string(),
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Parse a path id; malformed ids are reported like unknown ones
fn parse_id<T>(raw: &str) -> ApiResult<T>
where
    T: std::str::FromStr<Err = InvalidId>,
{
    raw.parse::<T>().map_err(|e| GiftError::from(e).into())
}
