use async_trait::async_trait;
use std::time::Instant;
use tiberius::{Row, ToSql};
use tracing::{debug, info, warn};

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{ListFilter, PropertyRow, SummaryRow, TextSearch};
use super::query_builder::{self, SqlQuery};

/// Read access to AFE records in the content database
#[async_trait]
pub trait AfeStore: Send + Sync {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<SummaryRow>, DatabaseError>;

    async fn search_text(&self, search: &TextSearch) -> Result<Vec<SummaryRow>, DatabaseError>;

    /// All property rows of the AFEs whose number is in `afe_numbers`
    async fn property_rows(&self, afe_numbers: &[String]) -> Result<Vec<PropertyRow>, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// `AfeStore` backed by the pooled SQL Server connection
pub struct SqlServerRepository {
    manager: DatabaseManager,
    log_queries: bool,
    slow_query_threshold_ms: u64,
}

impl SqlServerRepository {
    pub fn new(manager: DatabaseManager, log_queries: bool, slow_query_threshold_ms: u64) -> Self {
        Self { manager, log_queries, slow_query_threshold_ms }
    }

    async fn fetch(&self, label: &str, query: &SqlQuery) -> Result<Vec<Row>, DatabaseError> {
        if self.log_queries {
            debug!("{} query ({} params):\n{}", label, query.params.len(), query.sql);
        }

        let params: Vec<&dyn ToSql> = query.params.iter().map(|p| p as &dyn ToSql).collect();
        let started = Instant::now();

        let mut conn = self.manager.acquire().await?;
        let rows = conn
            .query(query.sql.as_str(), &params)
            .await?
            .into_first_result()
            .await?;

        let elapsed = started.elapsed().as_millis();
        if elapsed >= u128::from(self.slow_query_threshold_ms) {
            warn!("Slow {} query: {} ms", label, elapsed);
        }
        Ok(rows)
    }
}

#[async_trait]
impl AfeStore for SqlServerRepository {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<SummaryRow>, DatabaseError> {
        let rows = self.fetch("AFE list", &query_builder::list_query(filter)).await?;
        info!("AFE list query returned {} records", rows.len());
        rows.iter().map(summary_from_row).collect()
    }

    async fn search_text(&self, search: &TextSearch) -> Result<Vec<SummaryRow>, DatabaseError> {
        let rows = self.fetch("AFE text search", &query_builder::search_text_query(search)).await?;
        info!("AFE text search for {:?} returned {} records", search.text, rows.len());
        rows.iter().map(summary_from_row).collect()
    }

    async fn property_rows(&self, afe_numbers: &[String]) -> Result<Vec<PropertyRow>, DatabaseError> {
        let rows = self.fetch("AFE detail", &query_builder::property_rows_query(afe_numbers)).await?;
        info!("AFE detail query for {} numbers returned {} property rows", afe_numbers.len(), rows.len());
        rows.iter().map(property_from_row).collect()
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.manager.health_check().await
    }
}

fn text(row: &Row, column: &str) -> Result<Option<String>, DatabaseError> {
    Ok(row.try_get::<&str, _>(column)?.map(str::to_string))
}

fn required_text(row: &Row, column: &str) -> Result<String, DatabaseError> {
    text(row, column)?.ok_or_else(|| DatabaseError::QueryError(format!("column {} was NULL", column)))
}

fn summary_from_row(row: &Row) -> Result<SummaryRow, DatabaseError> {
    Ok(SummaryRow {
        content_guid: required_text(row, "content_guid")?,
        afe_number: text(row, "afe_number")?,
        status: text(row, "status")?,
        afe_type: text(row, "type")?,
        area: text(row, "area")?,
        name: text(row, "name")?,
        surface_location: text(row, "surface_location")?,
        gross_budget: text(row, "gross_budget")?,
        net_budget: text(row, "net_budget")?,
        working_interest_pct: text(row, "working_interest_pct")?,
        approval_status: text(row, "approval_status")?,
        date_created: text(row, "date_created")?,
        company: text(row, "company")?,
        created_by: text(row, "created_by")?,
    })
}

fn property_from_row(row: &Row) -> Result<PropertyRow, DatabaseError> {
    Ok(PropertyRow {
        content_guid: required_text(row, "content_guid")?,
        afe_number: text(row, "afe_number")?,
        property_guid: text(row, "property_guid")?,
        value: text(row, "field_value")?,
    })
}
