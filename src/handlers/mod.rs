pub mod afe;
pub mod health;

pub use health::health;
