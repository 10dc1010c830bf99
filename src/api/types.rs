//! API query, response, and error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::GridError;

/// Query parameters for `/feeder`.
#[derive(Debug, Deserialize)]
pub struct FeederQuery {
    /// County to study; the first county when omitted.
    pub county: Option<String>,
    /// Adoption override (percent).
    pub adoption_pct: Option<u32>,
}

/// Query parameters for `/targets`.
#[derive(Debug, Deserialize)]
pub struct TargetsQuery {
    pub county: Option<String>,
    /// Row cap; the configured limit when omitted.
    pub limit: Option<usize>,
}

/// Optional range query parameters for `/profile`.
#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    /// Start timestamp (inclusive).
    pub from: Option<NaiveDateTime>,
    /// End timestamp (inclusive).
    pub to: Option<NaiveDateTime>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Handler failures mapped to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GridError> for ApiError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::UnknownCounty(_) => ApiError::NotFound(err.to_string()),
            GridError::InvalidAdoption(_) => ApiError::BadRequest(err.to_string()),
            GridError::MissingColumn { .. } => ApiError::Unprocessable(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::Internal(_) => {
                tracing::error!(error = %self, "API error occurred");
                "an internal error occurred".to_string()
            }
            _ => {
                tracing::debug!(error = %self, "client error");
                self.to_string()
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
