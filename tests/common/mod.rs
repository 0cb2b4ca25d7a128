#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use afe_bridge_api::app::{self, AppState};
use afe_bridge_api::auth::ApiKey;
use afe_bridge_api::config::AppConfig;
use afe_bridge_api::database::models::{ListFilter, Page, PropertyRow, SummaryRow, TextSearch};
use afe_bridge_api::database::{AfeStore, DatabaseError};
use afe_bridge_api::eav::property_map::summary;

pub const API_KEY: &str = "test-api-key";

pub const COST_CENTER: &str = "52E32478-CD61-4E71-ABEA-870BADB108D7";
pub const UNMAPPED: &str = "00000000-0000-0000-0000-000000000001";

/// One AFE held by the in-memory store
#[derive(Debug, Clone)]
pub struct FixtureAfe {
    pub summary: SummaryRow,
    pub properties: Vec<(&'static str, Option<&'static str>)>,
}

fn fixture(
    number: &str,
    status: &str,
    area: &str,
    created: &str,
    creator: &str,
    gross: Option<&str>,
) -> SummaryRow {
    SummaryRow {
        content_guid: format!("guid-{}", number),
        afe_number: Some(number.to_string()),
        status: Some(status.to_string()),
        afe_type: Some("Drilling".to_string()),
        area: Some(area.to_string()),
        name: Some(format!("{} well", area)),
        surface_location: Some("01-02-003-04W5".to_string()),
        gross_budget: gross.map(str::to_string),
        net_budget: Some("not a number".to_string()),
        working_interest_pct: Some("37.5".to_string()),
        approval_status: Some(status.to_string()),
        date_created: Some(created.to_string()),
        company: Some("Acme Energy".to_string()),
        created_by: Some(creator.to_string()),
    }
}

pub fn fixtures() -> Vec<FixtureAfe> {
    vec![
        FixtureAfe {
            summary: fixture("AFE-1001", "Approved", "Red Deer", "2024-01-10", "Jane Smith", Some("1250000")),
            properties: vec![
                (summary::GROSS_BUDGET, Some("1250000")),
                (summary::AREA, Some("Red Deer")),
                (COST_CENTER, Some("CC-1")),
                (COST_CENTER, None),
                (UNMAPPED, Some("ignored")),
            ],
        },
        FixtureAfe {
            summary: fixture("AFE-1002", "Draft", "Peace River", "2024-03-05", "Raj Patel", None),
            properties: vec![
                (summary::GROSS_BUDGET, Some("")),
                (summary::WORKING_INTEREST_PCT, Some("12.5")),
                (COST_CENTER, Some("CC-2")),
                (COST_CENTER, Some("CC-2B")),
            ],
        },
        FixtureAfe {
            summary: fixture("AFE-1003", "Approved", "Red Deer", "2024-02-20", "Lee 100%", Some("500000.50")),
            properties: vec![(summary::STATUS, Some("Approved"))],
        },
    ]
}

/// `AfeStore` over fixture data that counts every call
pub struct MemoryStore {
    afes: Vec<FixtureAfe>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new(afes: Vec<FixtureAfe>) -> Self {
        Self { afes, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    /// Newest first, then by number descending
    fn sorted(&self) -> Vec<SummaryRow> {
        let mut rows: Vec<SummaryRow> = self.afes.iter().map(|a| a.summary.clone()).collect();
        rows.sort_by(|a, b| {
            b.date_created
                .cmp(&a.date_created)
                .then_with(|| b.afe_number.cmp(&a.afe_number))
        });
        rows
    }
}

fn paged(rows: Vec<SummaryRow>, page: Page) -> Vec<SummaryRow> {
    rows.into_iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect()
}

fn contains(field: &Option<String>, needle: &str) -> bool {
    field
        .as_deref()
        .map(|v| v.to_lowercase().contains(needle))
        .unwrap_or(false)
}

#[async_trait]
impl AfeStore for MemoryStore {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<SummaryRow>, DatabaseError> {
        self.record_call();
        let rows = self
            .sorted()
            .into_iter()
            .filter(|r| filter.status.is_none() || r.status == filter.status)
            .collect();
        Ok(paged(rows, filter.page))
    }

    async fn search_text(&self, search: &TextSearch) -> Result<Vec<SummaryRow>, DatabaseError> {
        self.record_call();
        let needle = search.text.to_lowercase();
        let rows = self
            .sorted()
            .into_iter()
            .filter(|r| {
                contains(&r.afe_number, &needle)
                    || contains(&r.name, &needle)
                    || contains(&r.area, &needle)
                    || contains(&r.created_by, &needle)
            })
            .collect();
        Ok(paged(rows, search.page))
    }

    async fn property_rows(&self, afe_numbers: &[String]) -> Result<Vec<PropertyRow>, DatabaseError> {
        self.record_call();
        let mut afes: Vec<&FixtureAfe> = self
            .afes
            .iter()
            .filter(|a| {
                a.summary
                    .afe_number
                    .as_ref()
                    .map(|n| afe_numbers.contains(n))
                    .unwrap_or(false)
            })
            .collect();
        afes.sort_by(|a, b| a.summary.afe_number.cmp(&b.summary.afe_number));

        Ok(afes
            .into_iter()
            .flat_map(|afe| {
                afe.properties.iter().map(move |(guid, value)| PropertyRow {
                    content_guid: afe.summary.content_guid.clone(),
                    afe_number: afe.summary.afe_number.clone(),
                    property_guid: Some(guid.to_string()),
                    value: value.map(str::to_string),
                })
            })
            .collect())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.record_call();
        Ok(())
    }
}

/// Store whose every call fails like a lost database
pub struct FailingStore;

#[async_trait]
impl AfeStore for FailingStore {
    async fn list(&self, _filter: &ListFilter) -> Result<Vec<SummaryRow>, DatabaseError> {
        Err(DatabaseError::PoolTimeout)
    }

    async fn search_text(&self, _search: &TextSearch) -> Result<Vec<SummaryRow>, DatabaseError> {
        Err(DatabaseError::PoolTimeout)
    }

    async fn property_rows(&self, _afe_numbers: &[String]) -> Result<Vec<PropertyRow>, DatabaseError> {
        Err(DatabaseError::QueryError("Invalid object name 'tblContent'".to_string()))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Err(DatabaseError::PoolTimeout)
    }
}

pub struct TestServer {
    pub base_url: String,
    client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request builder carrying the correct bearer key
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(API_KEY)
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(API_KEY)
    }

    /// Plain client with no credentials attached
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

/// Serve the real router over `store` on a free local port
pub async fn spawn_with(store: Arc<dyn AfeStore>) -> Result<TestServer> {
    spawn_configured(store, &[]).await
}

/// Like `spawn_with`, with extra environment entries layered over the test defaults
pub async fn spawn_configured(store: Arc<dyn AfeStore>, vars: &[(&str, &str)]) -> Result<TestServer> {
    let config = AppConfig::from_lookup(|key| {
        if let Some((_, value)) = vars.iter().find(|(k, _)| *k == key) {
            return Some(value.to_string());
        }
        match key {
            "AFE_DEFAULT_LIMIT" => Some("2".to_string()),
            "AFE_MAX_LIMIT" => Some("10".to_string()),
            _ => None,
        }
    })?;
    let api_key = ApiKey::new(API_KEY).context("test key must not be empty")?;
    let state = AppState::new(store, api_key, &config.api);
    let router = app::router(state, &config.api, &config.security);

    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    Ok(TestServer { base_url: format!("http://127.0.0.1:{}", port), client })
}

pub async fn spawn() -> Result<(TestServer, Arc<MemoryStore>)> {
    let store = Arc::new(MemoryStore::new(fixtures()));
    let server = spawn_with(store.clone()).await?;
    Ok((server, store))
}
