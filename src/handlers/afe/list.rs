use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};

use crate::api::AfeListResponse;
use crate::app::AppState;
use crate::error::ApiError;
use crate::services::afe_service::ListParams;

use super::query_error;

/// GET /afe/list - Page through AFEs, newest first, optionally by status
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<AfeListResponse>, ApiError> {
    let Query(params) = params.map_err(query_error)?;
    let response = state.afes.list(&params).await?;
    Ok(Json(response))
}
