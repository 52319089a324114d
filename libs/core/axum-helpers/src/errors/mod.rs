pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// Returned for every error response:
/// - `code`: integer error code for logging/monitoring (e.g., 1008)
/// - `error`: machine-readable error identifier (e.g., "CONFLICT")
/// - `message`: human-readable error message
/// - `details`: optional additional details (e.g., validation errors)
///
/// ```json
/// {
///   "code": 1004,
///   "error": "NOT_FOUND",
///   "message": "Item not found"
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details (e.g., validation field errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryExtractorRejection(#[from] QueryRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    /// A uniqueness violation, reported to clients as a 400 input error
    #[error("Duplicate resource: {0}")]
    DuplicateResource(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Names of the fields that failed validation, sorted for stable output.
///
/// Struct-level failures are reported by `validator` under `__all__` and
/// are left out.
pub fn invalid_fields(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| field.to_string())
        .filter(|field| field != "__all__")
        .collect();
    fields.sort();
    fields
}

fn validation_message(errors: &ValidationErrors) -> String {
    let fields = invalid_fields(errors);
    if fields.is_empty() {
        let schema_messages: Vec<String> = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .filter_map(|err| err.message.as_ref().map(|m| m.to_string()))
            .collect();
        if schema_messages.is_empty() {
            ErrorCode::ValidationError.default_message().to_string()
        } else {
            schema_messages.join("; ")
        }
    } else {
        format!("Invalid fields: {}", fields.join(", "))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details, code) = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::InvalidJson.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    e.body_text(),
                    None,
                    ErrorCode::InvalidJson,
                )
            }
            AppError::QueryExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::InvalidQuery.code(),
                    "Query extraction error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    e.body_text(),
                    None,
                    ErrorCode::InvalidQuery,
                )
            }
            AppError::ValidationError(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    validation_message(&e),
                    Some(serde_json::to_value(&e).unwrap_or(serde_json::Value::Null)),
                    ErrorCode::ValidationError,
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    msg,
                    None,
                    ErrorCode::ValidationError,
                )
            }
            AppError::DuplicateResource(msg) => {
                tracing::info!(error_code = ErrorCode::Conflict.code(), "Duplicate: {}", msg);
                (StatusCode::BAD_REQUEST, msg, None, ErrorCode::Conflict)
            }
            AppError::NotFound(msg) => {
                tracing::info!(
                    error_code = ErrorCode::NotFound.code(),
                    "Not found: {}",
                    msg
                );
                (StatusCode::NOT_FOUND, msg, None, ErrorCode::NotFound)
            }
            AppError::Storage(msg) => {
                tracing::error!(
                    error_code = ErrorCode::StorageError.code(),
                    "Storage error: {}",
                    msg
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StorageError.default_message().to_string(),
                    None,
                    ErrorCode::StorageError,
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Helper function to create error responses.
///
/// # Example
///
/// ```rust,ignore
/// use axum_helpers::errors::{error_response, ErrorCode};
/// use axum::http::StatusCode;
///
/// let response = error_response(
///     StatusCode::NOT_FOUND,
///     "Route Not Found".to_string(),
///     ErrorCode::NotFound,
/// );
/// ```
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details: None,
    });

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::{Validate, ValidationError};

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 3))]
        name: String,
        #[validate(range(min = 0.0))]
        price: f64,
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_invalid_fields_are_sorted() {
        let errors = Payload {
            name: "ab".to_string(),
            price: -1.0,
        }
        .validate()
        .unwrap_err();

        assert_eq!(invalid_fields(&errors), vec!["name", "price"]);
    }

    #[test]
    fn test_schema_error_message_is_used_when_no_field_failed() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "__all__",
            ValidationError::new("empty").with_message("at least one field is required".into()),
        );
        assert_eq!(validation_message(&errors), "at least one field is required");
    }

    #[tokio::test]
    async fn test_validation_error_lists_fields() {
        let errors = Payload {
            name: "ab".to_string(),
            price: 1.0,
        }
        .validate()
        .unwrap_err();

        let response = AppError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Invalid fields: name");
        assert!(body["details"]["name"].is_array());
    }

    #[tokio::test]
    async fn test_duplicate_resource_is_bad_request() {
        let response =
            AppError::DuplicateResource("Item name must be unique.".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["code"], 1008);
        assert_eq!(body["error"], "CONFLICT");
        assert_eq!(body["message"], "Item name must be unique.");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_bad_request_keeps_message() {
        let response =
            AppError::BadRequest("unknown field `color`".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["code"], 1001);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "unknown field `color`");
    }

    #[tokio::test]
    async fn test_storage_error_hides_internal_message() {
        let response = AppError::Storage("/srv/data/items.json: EOF".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "STORAGE_ERROR");
        assert_eq!(body["message"], "Storage error occurred");
    }
}
