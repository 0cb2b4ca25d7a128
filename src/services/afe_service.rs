use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

use crate::api::format::{self, AfeListResponse, AfeSearchResponse};
use crate::database::models::{ListFilter, Page, TextSearch};
use crate::database::query_builder::MAX_AFE_NUMBERS;
use crate::database::repository::AfeStore;
use crate::eav::{flatten_properties, AfeDetail};
use crate::error::ApiError;

pub const MISSING_QUERY: &str = "Search query parameter \"q\" is required";
pub const MISSING_AFE_NUMBERS: &str = "afeNumbers array required";

/// Query string of `GET /afe/list`; values stay raw so bad numbers fall back to defaults
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub status: Option<String>,
}

/// Query string of `GET /afe/search-text`
#[derive(Debug, Default, Deserialize)]
pub struct SearchTextParams {
    pub q: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl PageLimits {
    /// Resolve raw `limit` / `offset` strings into a page.
    ///
    /// Missing, unparsable or zero limits use the default and large limits are
    /// clamped; negative numbers are rejected.
    pub fn resolve(&self, limit: Option<&str>, offset: Option<&str>) -> Result<Page, ApiError> {
        let limit = match parse_int(limit) {
            None | Some(0) => self.default_limit,
            Some(n) if n < 0 => return Err(ApiError::bad_request("limit must not be negative")),
            Some(n) => u32::try_from(n).unwrap_or(u32::MAX).min(self.max_limit),
        };
        let offset = match parse_int(offset) {
            None => 0,
            Some(n) if n < 0 => return Err(ApiError::bad_request("offset must not be negative")),
            Some(n) => u32::try_from(n).unwrap_or(u32::MAX),
        };
        Ok(Page { limit, offset })
    }
}

/// Read the leading integer of a query value: `"10abc"` is 10, `"abc"` is nothing.
///
/// Values too large for `i64` saturate instead of being dropped.
fn parse_int(raw: Option<&str>) -> Option<i64> {
    let text = raw?.trim();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }

    let value = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// AFE queries on top of an `AfeStore`
#[derive(Clone)]
pub struct AfeService {
    store: Arc<dyn AfeStore>,
    limits: PageLimits,
}

impl AfeService {
    pub fn new(store: Arc<dyn AfeStore>, limits: PageLimits) -> Self {
        Self { store, limits }
    }

    pub fn store(&self) -> &Arc<dyn AfeStore> {
        &self.store
    }

    pub async fn list(&self, params: &ListParams) -> Result<AfeListResponse, ApiError> {
        let page = self.limits.resolve(params.limit.as_deref(), params.offset.as_deref())?;
        let status = params
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string);

        let rows = self.store.list(&ListFilter { status, page }).await?;
        let (afes, pagination) = format::summaries(rows, page);
        Ok(AfeListResponse { afes, pagination })
    }

    pub async fn search_text(&self, params: &SearchTextParams) -> Result<AfeSearchResponse, ApiError> {
        let text = match params.q.as_deref() {
            Some(q) if !q.trim().is_empty() => q.to_string(),
            _ => return Err(ApiError::bad_request(MISSING_QUERY)),
        };
        let page = self.limits.resolve(params.limit.as_deref(), params.offset.as_deref())?;

        let rows = self.store.search_text(&TextSearch { text: text.clone(), page }).await?;
        let (afes, pagination) = format::summaries(rows, page);
        Ok(AfeSearchResponse { afes, search_query: text, pagination })
    }

    /// Full detail for each requested AFE number found in the store
    pub async fn details(&self, afe_numbers: &[String]) -> Result<Vec<AfeDetail>, ApiError> {
        let rows = self.store.property_rows(afe_numbers).await?;
        Ok(flatten_properties(rows))
    }
}

/// Pull the `afeNumbers` array out of a `POST /afe/search` body.
///
/// Duplicates are dropped while keeping first-seen order.
pub fn afe_numbers_from_body(body: &Value) -> Result<Vec<String>, ApiError> {
    let items = body
        .get("afeNumbers")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| ApiError::bad_request(MISSING_AFE_NUMBERS))?;

    let mut seen = HashSet::with_capacity(items.len());
    let mut numbers: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let number = item.as_str().ok_or_else(|| ApiError::bad_request(MISSING_AFE_NUMBERS))?;
        if seen.insert(number) {
            numbers.push(number.to_string());
        }
    }

    if numbers.len() > MAX_AFE_NUMBERS {
        return Err(ApiError::bad_request(format!(
            "afeNumbers accepts at most {} entries",
            MAX_AFE_NUMBERS
        )));
    }
    Ok(numbers)
}
