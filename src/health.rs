use axum::Json;
use serde_json::{Value, json};

/// Report that the server is alive.
pub async fn get_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
