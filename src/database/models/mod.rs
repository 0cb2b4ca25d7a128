pub mod afe;

pub use afe::{ListFilter, Page, PropertyRow, SummaryRow, TextSearch};
