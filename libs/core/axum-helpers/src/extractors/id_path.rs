//! Integer id path parameter extractor.

use crate::errors::{AppError, ErrorCode};
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Extractor for positive integer path ids.
///
/// A segment that is not a positive integer cannot name an existing
/// record, so it is answered the same way as an unknown id: 404.
///
/// # Example
/// ```ignore
/// use axum::routing::get;
/// use axum_helpers::extractors::IdPath;
///
/// async fn get_item(IdPath(id): IdPath) -> String {
///     format!("Item ID: {}", id)
/// }
///
/// let app = axum::Router::new().route("/items/{id}", get(get_item));
/// ```
pub struct IdPath(pub u64);

impl IdPath {
    fn parse(raw: &str) -> Option<u64> {
        raw.parse::<u64>().ok().filter(|id| *id > 0)
    }
}

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        match Self::parse(&raw) {
            Some(id) => Ok(IdPath(id)),
            None => {
                tracing::debug!(raw_id = %raw, "Rejecting non-numeric id");
                Err(AppError::NotFound(
                    ErrorCode::NotFound.default_message().to_string(),
                ))
            }
        }
    }
}
