//! Mapping use-case results onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lexireview_core::{Outcome, RepositoryError, ReviewError};
use serde::Serialize;
use tracing::error;

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failure of an API call.
#[derive(Debug)]
pub enum ApiError {
    Review(ReviewError),
    Storage(RepositoryError),
    BadRequest(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Review(ReviewError::WordNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Review(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        ApiError::Storage(e)
    }
}

impl From<ReviewError> for ApiError {
    fn from(e: ReviewError) -> Self {
        ApiError::Review(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Review(e) => e.to_string(),
            ApiError::BadRequest(message) => message,
            ApiError::Storage(e) => {
                error!(error = %e, "Storage failure while serving request");
                "Internal storage error".to_string()
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Turn a use-case result into a JSON response.
pub fn respond<T: Serialize>(result: Result<Outcome<T>, RepositoryError>) -> Response {
    match result {
        Ok(Outcome::Success(value)) => Json(value).into_response(),
        Ok(Outcome::Failure(e)) => ApiError::Review(e).into_response(),
        Err(e) => ApiError::Storage(e).into_response(),
    }
}
