use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flightstats_core::{CoreError, LoadFailure, RepositoryError};
use serde_json::json;

pub const LOAD_FAILURE_MESSAGE: &str = "Error fetching flight data";

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFoundError(String),
    Anyhow(anyhow::Error),
}

impl AppError {
    fn classify(err: &anyhow::Error) -> (StatusCode, String) {
        let load = err.downcast_ref::<LoadFailure>().or_else(|| match err.downcast_ref::<CoreError>() {
            Some(CoreError::Load(load)) => Some(load),
            _ => None,
        });
        if let Some(load) = load {
            tracing::error!("Board load failed: {}", load);
            return (StatusCode::BAD_GATEWAY, LOAD_FAILURE_MESSAGE.to_string());
        }

        if let Some(storage) = err.downcast_ref::<RepositoryError>() {
            tracing::error!("Report storage failed: {}", storage);
        } else {
            tracing::error!("Internal Server Error: {}", err);
        }
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Anyhow(err) => Self::classify(&err),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}
