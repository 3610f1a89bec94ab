//! Custom extractors for Axum handlers.
//!
//! Every rejection is an [`AppError`](crate::AppError), so malformed input
//! produces the same JSON envelope as domain errors.

pub mod id_path;
pub mod query;
pub mod validated_json;

pub use id_path::IdPath;
pub use query::QueryParams;
pub use validated_json::ValidatedJson;
