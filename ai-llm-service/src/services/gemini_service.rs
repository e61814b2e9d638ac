//! Gemini service for answer generation.
//!
//! Minimal, non-streaming client around the Generative Language REST API:
//! - `POST {endpoint}/v1beta/models/{model}:generateContent`
//!
//! The API key travels in the `x-goog-api-key` header. Constructor validation
//! covers the provider and endpoint only; a missing key or model is reported
//! when [`GeminiService::generate`] is called, so the service can start with
//! an incomplete environment.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    config::{LlmModelConfig, LlmProvider},
    error_handler::{
        AiLlmError, HttpError, Provider, ProviderError, ProviderErrorKind, is_http_endpoint,
        make_snippet,
    },
};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Thin client for the Gemini API.
#[derive(Debug)]
pub struct GeminiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_generate: String,
}

impl GeminiService {
    /// Creates a new [`GeminiService`] from the given config.
    ///
    /// # Errors
    /// - `InvalidProvider` if `cfg.provider` is not Gemini
    /// - `InvalidEndpoint` if `cfg.endpoint` is not an http(s) URL
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Gemini {
            return Err(
                ProviderError::new(Provider::Gemini, ProviderErrorKind::InvalidProvider).into(),
            );
        }
        if !is_http_endpoint(&cfg.endpoint) {
            return Err(ProviderError::new(
                Provider::Gemini,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let client = reqwest::Client::builder().timeout(cfg.timeout()).build()?;
        let url_generate = generate_url(&cfg.base_url(), &cfg.model);

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout().as_secs(),
            "GeminiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_generate,
        })
    }

    /// Sends `prompt` as a single user turn and returns the first candidate's text.
    ///
    /// # Errors
    /// - `MissingApiKey` / `MissingModel` when the config is incomplete
    /// - [`AiLlmError::HttpTransport`] or [`AiLlmError::Timeout`] on transport failure
    /// - `HttpStatus` for non-2xx responses
    /// - `Decode` if the envelope cannot be parsed
    /// - `EmptyCandidates` / `EmptyText` if no usable answer is present
    #[instrument(skip_all, fields(model = %self.cfg.model, prompt_len = prompt.len()))]
    pub async fn generate(&self, prompt: &str) -> Result<String, AiLlmError> {
        let api_key = self.cfg.api_key.as_deref().ok_or_else(|| {
            ProviderError::new(Provider::Gemini, ProviderErrorKind::MissingApiKey)
        })?;
        if self.cfg.model.trim().is_empty() {
            return Err(ProviderError::new(Provider::Gemini, ProviderErrorKind::MissingModel).into());
        }

        let started = Instant::now();
        let body = GenerateContentRequest::from_cfg(&self.cfg, prompt);

        debug!("POST {}", self.url_generate);
        let resp = self
            .client
            .post(&self.url_generate)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_generate.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "Gemini generateContent returned non-success status"
            );

            return Err(ProviderError::new(
                Provider::Gemini,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let out: GenerateContentResponse = resp.json().await.map_err(|e| {
            error!(error = %e, "failed to decode generateContent response");
            ProviderError::new(
                Provider::Gemini,
                ProviderErrorKind::Decode(format!(
                    "serde error: {e}; expected `candidates[0].content.parts[].text`"
                )),
            )
        })?;

        let answer = first_candidate_text(out)
            .map_err(|kind| ProviderError::new(Provider::Gemini, kind))?;

        info!(
            latency_ms = started.elapsed().as_millis(),
            answer_len = answer.len(),
            "Gemini generation completed"
        );

        Ok(answer)
    }
}

/// `{base}/v1beta/models/{model}:generateContent`; a `models/` prefix on the
/// configured name is tolerated.
fn generate_url(base: &str, model: &str) -> String {
    let model = model.trim().trim_start_matches("models/");
    format!("{base}/v1beta/models/{model}:generateContent")
}

/// Joins the text parts of the first candidate.
fn first_candidate_text(resp: GenerateContentResponse) -> Result<String, ProviderErrorKind> {
    let first = resp
        .candidates
        .into_iter()
        .next()
        .ok_or(ProviderErrorKind::EmptyCandidates)?;

    if let Some(reason) = first.finish_reason.as_deref() {
        debug!(finish_reason = reason, "first candidate finish reason");
    }

    let text: String = first
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ProviderErrorKind::EmptyText);
    }
    Ok(text)
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_cfg(cfg: &LlmModelConfig, prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: cfg.temperature,
                max_output_tokens: cfg.max_tokens,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    fn cfg(endpoint: &str, key: Option<&str>) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Gemini,
            model: "test-model".into(),
            endpoint: endpoint.into(),
            api_key: key.map(str::to_string),
            max_tokens: Some(2048),
            temperature: Some(0.7),
            timeout_secs: Some(5),
        }
    }

    fn parse(v: Value) -> GenerateContentResponse {
        serde_json::from_value(v).unwrap()
    }

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn url_tolerates_models_prefix() {
        assert_eq!(
            generate_url("https://g.example", "models/gemini-pro"),
            "https://g.example/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn request_carries_fixed_sampling_policy() {
        let c = cfg("https://g.example", Some("k"));
        let body = serde_json::to_value(GenerateContentRequest::from_cfg(&c, "hi")).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
        let t = body["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((t - 0.7).abs() < 1e-6);
    }

    #[test]
    fn extracts_first_candidate_parts() {
        let resp = parse(json!({
            "candidates": [
                {"content": {"parts": [{"text": "June "}, {"text": "1"}]}, "finishReason": "STOP"},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }));
        assert_eq!(first_candidate_text(resp).unwrap(), "June 1");
    }

    #[test]
    fn no_candidates_is_an_error() {
        let resp = parse(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        assert!(matches!(
            first_candidate_text(resp),
            Err(ProviderErrorKind::EmptyCandidates)
        ));
    }

    #[test]
    fn candidate_without_text_is_an_error() {
        let resp = parse(json!({"candidates": [{"finishReason": "SAFETY"}]}));
        assert!(matches!(
            first_candidate_text(resp),
            Err(ProviderErrorKind::EmptyText)
        ));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        assert!(GeminiService::new(cfg("localhost:1", Some("k"))).is_err());
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let svc = GeminiService::new(cfg("http://127.0.0.1:1", None)).unwrap();
        let err = svc.generate("q").await.unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::MissingApiKey,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn generates_against_mock_server() {
        let app = Router::new().route(
            "/v1beta/models/{action}",
            post(|Json(body): Json<Value>| async move {
                let prompt = body["contents"][0]["parts"][0]["text"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string();
                Json(json!({
                    "candidates": [{"content": {"role": "model", "parts": [{"text": format!("echo: {prompt}")}]}}]
                }))
            }),
        );
        let base = spawn(app).await;

        let svc = GeminiService::new(cfg(&base, Some("k"))).unwrap();
        let answer = svc.generate("deadline?").await.unwrap();
        assert_eq!(answer, "echo: deadline?");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let app = Router::new().route(
            "/v1beta/models/{action}",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "quota exceeded") }),
        );
        let base = spawn(app).await;

        let svc = GeminiService::new(cfg(&base, Some("k"))).unwrap();
        let err = svc.generate("q").await.unwrap_err();
        match err {
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::HttpStatus(http),
                ..
            }) => {
                assert_eq!(http.status, reqwest::StatusCode::TOO_MANY_REQUESTS);
                assert_eq!(http.snippet, "quota exceeded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparsable_envelope_is_an_error() {
        let app = Router::new().route("/v1beta/models/{action}", post(|| async { "not json" }));
        let base = spawn(app).await;

        let svc = GeminiService::new(cfg(&base, Some("k"))).unwrap();
        let err = svc.generate("q").await.unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::Decode(_),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let svc = GeminiService::new(cfg("http://127.0.0.1:1", Some("k"))).unwrap();
        assert!(svc.generate("q").await.is_err());
    }
}
