use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};

use crate::api::AfeSearchResponse;
use crate::app::AppState;
use crate::error::ApiError;
use crate::services::afe_service::SearchTextParams;

use super::query_error;

/// GET /afe/search-text - Substring match on number, name, area and creator
pub async fn search_text(
    State(state): State<AppState>,
    params: Result<Query<SearchTextParams>, QueryRejection>,
) -> Result<Json<AfeSearchResponse>, ApiError> {
    let Query(params) = params.map_err(query_error)?;
    let response = state.afes.search_text(&params).await?;
    Ok(Json(response))
}
