use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde_json::Value;
use tracing::debug;

use crate::app::AppState;
use crate::eav::AfeDetail;
use crate::error::ApiError;
use crate::services::afe_service::{afe_numbers_from_body, MISSING_AFE_NUMBERS};

/// POST /afe/search - Full flattened records for a list of AFE numbers
///
/// Body: `{"afeNumbers": ["...", ...]}`. Numbers with no match are left out
/// of the response rather than reported.
pub async fn search(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<AfeDetail>>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        debug!("Unreadable AFE search body: {}", rejection);
        ApiError::bad_request(MISSING_AFE_NUMBERS)
    })?;

    let afe_numbers = afe_numbers_from_body(&body)?;
    let details = state.afes.details(&afe_numbers).await?;
    Ok(Json(details))
}
