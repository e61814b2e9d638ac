use std::{env, error::Error, sync::Arc};

mod core;
mod error_handler;
mod middleware_layer;
mod routes;

pub use crate::core::app_state::AppState;
pub use crate::core::http::response_envelope::{AnswerBody, ErrorBody};
pub use crate::error_handler::{AppError, GENERATION_FAILED};

use axum::{
    Router, middleware,
    routing::{MethodRouter, get, post},
};
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::{
    error_handler::panic_response,
    middleware_layer::request_id::request_id,
    routes::{
        ask::ask_question_route::{ask_preflight, ask_question},
        health::{health_route::health_check, readiness_route::readiness},
        method_not_allowed, not_found,
        root_route::root_info,
    },
};

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8000";

/// Builds the router with every route and middleware layer.
pub fn build_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let ask = || -> MethodRouter<Arc<AppState>> {
        post(ask_question)
            .options(ask_preflight)
            .fallback(method_not_allowed)
    };
    let health = || -> MethodRouter<Arc<AppState>> { get(health_check).fallback(method_not_allowed) };

    Router::new()
        .route("/", get(root_info).fallback(method_not_allowed))
        .route("/health", health())
        .route("/api/health", health())
        .route("/ready", get(readiness).fallback(method_not_allowed))
        .route("/ask", ask())
        .route("/api/ask", ask())
        .fallback(not_found)
        .with_state(state)
        // Applied bottom to top: CORS is outermost so every response carries it.
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn start() -> Result<(), Box<dyn Error>> {
    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_API_ADDRESS.to_string());

    let state = Arc::new(AppState::from_env()?);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "tender Q&A API listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        // keep serving; without a signal handler there is nothing to wait for
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
