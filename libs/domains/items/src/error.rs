use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Item {0} not found")]
    NotFound(u64),

    #[error("Item name '{0}' is already taken")]
    DuplicateName(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    /// Request body that does not decode into the expected shape
    #[error("Invalid body: {0}")]
    InvalidBody(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type ItemResult<T> = Result<T, ItemError>;

impl From<std::io::Error> for ItemError {
    fn from(err: std::io::Error) -> Self {
        ItemError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ItemError {
    fn from(err: serde_json::Error) -> Self {
        ItemError::Storage(format!("malformed collection document: {}", err))
    }
}

/// Convert ItemError to AppError for standardized error responses
impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::NotFound(_) => AppError::NotFound("Item not found".to_string()),
            ItemError::DuplicateName(_) => {
                AppError::DuplicateResource("Item name must be unique.".to_string())
            }
            ItemError::Validation(errors) => AppError::ValidationError(errors),
            ItemError::InvalidBody(msg) => AppError::BadRequest(msg),
            ItemError::Storage(msg) => AppError::Storage(msg),
        }
    }
}

impl IntoResponse for ItemError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
