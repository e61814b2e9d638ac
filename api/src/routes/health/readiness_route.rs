use std::sync::Arc;

use ai_llm_service::HealthStatus;
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct StoreStatus {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub store: StoreStatus,
    pub llm: HealthStatus,
}

/// Handler: GET /ready
///
/// Pings the tender store and probes the answer model concurrently.
/// 200 when both respond, 503 otherwise.
pub async fn readiness(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let (store, llm) = tokio::join!(state.store.ping(), state.generator.health());

    let store = match store {
        Ok(()) => StoreStatus {
            ok: true,
            message: None,
        },
        Err(e) => StoreStatus {
            ok: false,
            message: Some(e.to_string()),
        },
    };
    let ready = store.ok && llm.ok;
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ReadinessResponse { ready, store, llm }))
}
