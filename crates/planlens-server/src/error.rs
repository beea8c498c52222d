//! Error handling for the HTTP API

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use planlens_analyzer::PlanError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidPlan(#[from] PlanError),
}

impl ApiError {
    /// HTTP status returned for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidPlan(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// JSON body sent with every error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::warn!(status = status.as_u16(), error = %self, "Rejected plan payload");
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
