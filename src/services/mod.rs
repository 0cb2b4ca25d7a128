pub mod afe_service;

pub use afe_service::{AfeService, PageLimits};
