// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{message::ErrorResponse, services::relay::RelayError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{source}")]
    Relay {
        session_id: String,
        #[source]
        source: RelayError,
    },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Relay {
                source: RelayError::ConfigurationMissing { .. },
                ..
            } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Relay { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::BadRequest(msg) => ErrorResponse {
                error: msg,
                session_id: None,
            },
            AppError::Relay { session_id, source } => ErrorResponse {
                error: source.to_string(),
                session_id: Some(session_id),
            },
        };
        (status, Json(body)).into_response()
    }
}
