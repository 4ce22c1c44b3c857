//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request payload failed validation
    #[error("Validation failed")]
    Validation(ValidationErrors),

    /// No valid credential presented
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Login credential mismatch. Deliberately indistinguishable between
    /// unknown email and wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Resource missing or owned by another user
    #[error("Not found")]
    NotFound,

    /// Malformed request body
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error. Details are logged at the call site, never
    /// returned to the caller.
    #[error("Internal server error")]
    InternalServerError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "message": "The given data was invalid",
                    "errors": errors,
                }),
            ),
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                json!({"message": "Unauthenticated"}),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({"message": "Invalid credentials"}),
            ),
            ApiError::NotFound => (StatusCode::NOT_FOUND, json!({"message": "Not found"})),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({"message": message})),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"message": "Internal server error"}),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_422() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "Title is required");
        let response = ApiError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn auth_errors_map_to_401() {
        assert_eq!(
            ApiError::Unauthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            ApiError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn internal_errors_map_to_generic_500() {
        assert_eq!(
            ApiError::InternalServerError.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
