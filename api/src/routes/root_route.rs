use axum::Json;
use serde_json::{Value, json};

/// Handler: GET /
pub async fn root_info() -> Json<Value> {
    Json(json!({
        "message": "Tender Information Extraction API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "ready": "/ready",
            "ask": "/ask (POST)",
        }
    }))
}
