use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::auth::ApiKey;
use crate::config::{ApiConfig, SecurityConfig};
use crate::database::AfeStore;
use crate::error::ApiError;
use crate::handlers;
use crate::middleware::require_api_key;
use crate::services::{AfeService, PageLimits};

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub afes: AfeService,
    pub api_key: ApiKey,
}

impl AppState {
    pub fn new(store: Arc<dyn AfeStore>, api_key: ApiKey, api: &ApiConfig) -> Self {
        let limits = PageLimits {
            default_limit: api.default_limit,
            max_limit: api.max_limit,
        };
        Self {
            afes: AfeService::new(store, limits),
            api_key,
        }
    }
}

pub fn router(state: AppState, api: &ApiConfig, security: &SecurityConfig) -> Router {
    Router::new()
        .merge(afe_routes())
        .route("/health", get(handlers::health))
        .fallback(not_found)
        // Auth wraps the fallback too, so unknown paths still need the key
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(security))
                .layer(DefaultBodyLimit::max(api.max_request_size_bytes)),
        )
        .with_state(state)
}

fn afe_routes() -> Router<AppState> {
    use handlers::afe;

    Router::new()
        .route("/afe", get(afe::index))
        .route("/afe/", get(afe::index))
        .route("/afe/list", get(afe::list))
        .route("/afe/search-text", get(afe::search_text))
        .route("/afe/search", post(afe::search))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::permissive().allow_origin(AllowOrigin::list(allowed_origins(&security.cors_origins)))
}

/// Configured origins as header values; entries that are not valid header text are dropped
fn allowed_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect()
}

async fn not_found() -> ApiError {
    ApiError::not_found()
}
