use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use shared::AppError;

/// Wraps [`AppError`] so the HTTP layer can implement [`IntoResponse`] for it
/// without violating the orphan rule.
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let error_code = self.0.error_code();
        let message = self.0.to_string();

        if status.is_server_error() {
            tracing::error!("internal error: {:?}", self.0);
        }

        let body = json!({ "error": { "code": error_code, "message": message } });
        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<shared::DomainError> for ApiError {
    fn from(err: shared::DomainError) -> Self {
        Self(AppError::Domain(err))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
