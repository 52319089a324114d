//! Custom extractors for Axum handlers.
//!
//! Reusable extractors that validate input up front and report failures
//! through the shared [`AppError`](crate::errors::AppError) envelope.

pub mod id_path;
pub mod validated_json;
pub mod validated_query;

pub use id_path::IdPath;
pub use validated_json::ValidatedJson;
pub use validated_query::ValidatedQuery;
