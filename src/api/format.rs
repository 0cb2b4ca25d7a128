use serde::Serialize;

use crate::database::models::{Page, SummaryRow};
use crate::eav::parse_decimal;

/// Table-view fields of one AFE, as returned by list and search-text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AfeSummary {
    pub afe_number: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub afe_type: Option<String>,
    pub area: Option<String>,
    pub name: Option<String>,
    pub surface_location: Option<String>,
    pub gross_budget: Option<f64>,
    pub net_budget: Option<f64>,
    pub working_interest_pct: Option<f64>,
}

impl From<SummaryRow> for AfeSummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            gross_budget: parse_decimal(row.gross_budget.as_deref()),
            net_budget: parse_decimal(row.net_budget.as_deref()),
            working_interest_pct: parse_decimal(row.working_interest_pct.as_deref()),
            afe_number: row.afe_number,
            status: row.status,
            afe_type: row.afe_type,
            area: row.area,
            name: row.name,
            surface_location: row.surface_location,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
    pub count: usize,
    pub has_more: bool,
}

impl Pagination {
    /// A full page means there may be more rows after it
    pub fn new(page: Page, count: usize) -> Self {
        Self {
            limit: page.limit,
            offset: page.offset,
            count,
            has_more: count == page.limit as usize,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AfeListResponse {
    pub afes: Vec<AfeSummary>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AfeSearchResponse {
    pub afes: Vec<AfeSummary>,
    pub search_query: String,
    pub pagination: Pagination,
}

/// Format a page of summary rows; rows beyond the page limit are dropped
pub fn summaries(rows: Vec<SummaryRow>, page: Page) -> (Vec<AfeSummary>, Pagination) {
    let afes: Vec<AfeSummary> = rows
        .into_iter()
        .take(page.limit as usize)
        .map(AfeSummary::from)
        .collect();
    let pagination = Pagination::new(page, afes.len());
    (afes, pagination)
}
