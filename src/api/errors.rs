use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Anyhow wrapper so handlers can use `?` on data-access failures.
/// Only unrecoverable errors reach this; completion-backend failures are
/// degraded into normal replies long before the handler returns.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Request failed");
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}
