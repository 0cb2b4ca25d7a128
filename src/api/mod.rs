pub mod format;

pub use format::{AfeListResponse, AfeSearchResponse, AfeSummary, Pagination};
