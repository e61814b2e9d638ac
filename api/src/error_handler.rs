use std::any::Any;

use ai_llm_service::AiLlmError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::core::http::response_envelope::{AnswerBody, ErrorBody};

/// Shown to the caller whenever answer generation fails.
pub const GENERATION_FAILED: &str =
    "I encountered an error while processing your request. Please try again later.";

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("invalid answer model configuration")]
    LlmConfig(#[source] AiLlmError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not found")]
    NotFound,

    // --- Upstream ---
    #[error("answer generation failed")]
    Generation(#[source] AiLlmError),

    #[error("handler panicked: {0}")]
    Panic(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::NotFound => StatusCode::NOT_FOUND,

            // 5xx
            AppError::LlmConfig(_)
            | AppError::Bind(_)
            | AppError::Server(_)
            | AppError::Generation(_)
            | AppError::Panic(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            AppError::BadRequest(_) | AppError::MethodNotAllowed | AppError::NotFound => {
                ErrorBody::new(self.to_string()).into_response_with_status(status)
            }
            AppError::Generation(ref source) => {
                error!(error = %source, "answer generation failed");
                AnswerBody::new(GENERATION_FAILED).into_response_with_status(status)
            }
            AppError::Panic(ref msg) => {
                error!(panic = %msg, "request handler panicked");
                AnswerBody::new(GENERATION_FAILED).into_response_with_status(status)
            }
            // startup-only; never expose internals
            AppError::LlmConfig(_) | AppError::Bind(_) | AppError::Server(_) => {
                error!(error = %self, "internal error");
                ErrorBody::new("Internal server error").into_response_with_status(status)
            }
        }
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// `CatchPanicLayer` hook: a panicking handler still gets the standard apology.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    AppError::Panic(msg).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::BadRequest("x").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MethodNotAllowed.into_response().status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::Generation(AiLlmError::Timeout(Duration::from_secs(1)))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn panic_payload_becomes_500() {
        let res = panic_response(Box::new("boom"));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
