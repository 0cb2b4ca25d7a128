//! `/afe` routes
pub mod index;
pub mod list;
pub mod search;
pub mod search_text;

pub use index::index;
pub use list::list;
pub use search::search;
pub use search_text::search_text;

use axum::extract::rejection::QueryRejection;

use crate::error::ApiError;

pub const INVALID_QUERY: &str = "Invalid query string";

/// Keep query string failures in the JSON error shape
fn query_error(rejection: QueryRejection) -> ApiError {
    tracing::debug!("Rejected query string: {}", rejection);
    ApiError::bad_request(INVALID_QUERY)
}
