use axum::response::Json;
use serde_json::{json, Value};

/// GET /afe - Liveness check for the AFE router
pub async fn index() -> Json<Value> {
    Json(json!({ "message": "AFE route is working!" }))
}
