//! POST /ask: answers a question about one stored tender.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use contextor::{ContextorError, build_prompt, document_text};
use tender_store::TenderLookup;
use tracing::{info, instrument, warn};

use crate::{
    core::{app_state::AppState, http::response_envelope::AnswerBody},
    error_handler::{AppError, AppResult},
    routes::ask::ask_request::AskRequest,
};

pub const MISSING_FIELDS: &str = "tender_id and question are required";
pub const STORE_UNAVAILABLE: &str =
    "The tender database is temporarily unavailable. Please try again later.";
pub const NO_FILE_TEXTS: &str =
    "No file texts found for this tender. The document may be empty or not properly processed.";
pub const DOCUMENT_TOO_LARGE: &str = "The documents for this tender are too large to analyse in a single request. Please ask a more specific question or contact support.";

pub fn tender_not_found(tender_id: &str) -> String {
    format!("No tender found with ID: {tender_id}. Please check the tender ID and try again.")
}

/// Handler: POST /ask
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/ask \
///   -H 'content-type: application/json' \
///   -d '{"tender_id":"T1","question":"What is the bid submission deadline?"}'
/// ```
#[instrument(skip_all)]
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<AnswerBody>> {
    let Some((tender_id, question)) = AskRequest::from_body(&body).into_parts() else {
        warn!(body_len = body.len(), "ask request without tender_id or question");
        return Err(AppError::BadRequest(MISSING_FIELDS));
    };
    info!(%tender_id, question_len = question.len(), "ask received");

    let record = match state.store.fetch(&tender_id).await {
        TenderLookup::Found(record) => record,
        TenderLookup::NotFound => return Ok(Json(AnswerBody::new(tender_not_found(&tender_id)))),
        TenderLookup::Unavailable(reason) => {
            warn!(%tender_id, %reason, "tender store unavailable");
            return Ok(Json(AnswerBody::new(STORE_UNAVAILABLE)));
        }
    };

    let document = document_text(&state.contextor, &record.file_texts);
    if document.is_empty() {
        info!(%tender_id, "tender has no file texts");
        return Ok(Json(AnswerBody::new(NO_FILE_TEXTS)));
    }

    let prompt = match build_prompt(&state.contextor, &tender_id, &document, &question) {
        Ok(p) => p,
        Err(ContextorError::PromptTooLarge { len, limit }) => {
            warn!(%tender_id, len, limit, "prompt over budget; not calling the model");
            return Ok(Json(AnswerBody::new(DOCUMENT_TOO_LARGE)));
        }
    };

    let answer = state
        .generator
        .generate(&prompt)
        .await
        .map_err(AppError::Generation)?;

    info!(%tender_id, answer_len = answer.len(), "answer generated");
    Ok(Json(AnswerBody::new(answer)))
}

/// Handler: OPTIONS /ask
///
/// Browsers' CORS preflights are answered by the CORS layer before reaching
/// here; this covers bare `OPTIONS` requests.
pub async fn ask_preflight() -> Response {
    (
        StatusCode::OK,
        [
            (
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static("GET, POST, OPTIONS"),
            ),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("*"),
            ),
        ],
    )
        .into_response()
}
