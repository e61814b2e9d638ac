//! Health probes for the answer model backends (Gemini, OpenAI-compatible).
//!
//! - Gemini: `GET {endpoint}/v1beta/models/{model}` with `x-goog-api-key`
//! - OpenAI: `GET {endpoint}/v1/models` with Bearer auth (best-effort model existence check)
//!
//! [`HealthService::check`] is resilient and never fails; errors are mapped to `ok=false`.
//! Provider-specific probes (`try_*`) return a strict `Result`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{AiLlmError, HealthError, HttpError, is_http_endpoint, make_snippet};

/// A serializable health snapshot for the configured answer model.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Backend/provider (e.g. "Gemini", "OpenAI").
    pub provider: String,
    pub endpoint: String,
    pub model: Option<String>,
    pub ok: bool,
    /// HTTP latency of the probe in milliseconds.
    pub latency_ms: u128,
    pub message: String,
}

impl HealthStatus {
    #[inline]
    fn ok(cfg: &LlmModelConfig, latency_ms: u128, message: impl Into<String>) -> Self {
        Self::build(cfg, true, latency_ms, message)
    }

    #[inline]
    fn fail(cfg: &LlmModelConfig, latency_ms: u128, message: impl Into<String>) -> Self {
        Self::build(cfg, false, latency_ms, message)
    }

    fn build(cfg: &LlmModelConfig, ok: bool, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: format!("{:?}", cfg.provider),
            endpoint: cfg.endpoint.clone(),
            model: (!cfg.model.is_empty()).then(|| cfg.model.clone()),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Health checker that reuses a single HTTP client.
#[derive(Debug)]
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds).
    ///
    /// # Errors
    /// Returns [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        info!(
            default_timeout_secs = timeout.as_secs(),
            "HealthService initialized"
        );

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Checks health for a single config, routing to the provider-specific probe.
    ///
    /// Never returns an error. Any failure becomes `HealthStatus { ok: false, .. }`.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        if !is_http_endpoint(&cfg.endpoint) {
            warn!(
                provider = ?cfg.provider,
                endpoint = %cfg.endpoint,
                "invalid endpoint (empty or missing http/https)"
            );
            return HealthStatus::fail(cfg, 0, "endpoint is empty or missing http/https");
        }

        let start = Instant::now();
        let result = match cfg.provider {
            LlmProvider::Gemini => self.try_probe_gemini(cfg).await,
            LlmProvider::OpenAI => self.try_probe_openai(cfg).await,
        };

        match result {
            Ok(status) => {
                info!(
                    provider = %status.provider,
                    model = %status.model.as_deref().unwrap_or("n/a"),
                    ok = status.ok,
                    latency_ms = status.latency_ms,
                    "health probe completed"
                );
                status
            }
            Err(err) => {
                let status = HealthStatus::fail(cfg, start.elapsed().as_millis(), err.to_string());
                warn!(
                    provider = %status.provider,
                    endpoint = %status.endpoint,
                    latency_ms = status.latency_ms,
                    message = %status.message,
                    "health probe failed"
                );
                status
            }
        }
    }

    fn timeout_for(&self, cfg: &LlmModelConfig) -> Duration {
        // Probes should answer quickly; never wait longer than the service default.
        cfg.timeout_secs
            .map(Duration::from_secs)
            .map_or(self.default_timeout, |t| t.min(self.default_timeout))
    }

    /// Strict Gemini probe.
    ///
    /// `GET {endpoint}/v1beta/models/{model}`; a 2xx means the key is accepted
    /// and the model exists.
    async fn try_probe_gemini(&self, cfg: &LlmModelConfig) -> Result<HealthStatus, AiLlmError> {
        let api_key = cfg
            .api_key
            .as_deref()
            .ok_or_else(|| HealthError::Probe("missing Gemini API key".into()))?;
        let model = cfg.model.trim().trim_start_matches("models/");
        if model.is_empty() {
            return Err(HealthError::Probe("missing Gemini model name".into()).into());
        }

        let url = format!("{}/v1beta/models/{model}", cfg.base_url());
        let start = Instant::now();
        debug!(provider = "Gemini", model = %model, "GET {}", url);

        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout_for(cfg))
            .header("x-goog-api-key", api_key)
            .send()
            .await?;

        let latency = start.elapsed().as_millis();

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                provider = "Gemini",
                %url,
                %status,
                %snippet,
                latency_ms = latency,
                "health GET model returned non-success status"
            );

            return Err(HealthError::HttpStatus(HttpError {
                status,
                url,
                snippet,
            })
            .into());
        }

        Ok(HealthStatus::ok(
            cfg,
            latency,
            "Gemini is healthy; model is available",
        ))
    }

    /// Strict OpenAI probe.
    ///
    /// `GET {endpoint}/v1/models` with Bearer auth, then a best-effort check
    /// that `cfg.model` is in the returned list.
    async fn try_probe_openai(&self, cfg: &LlmModelConfig) -> Result<HealthStatus, AiLlmError> {
        let url = format!("{}/v1/models", cfg.base_url());

        let api_key = cfg
            .api_key
            .as_deref()
            .ok_or_else(|| HealthError::Probe("missing OpenAI API key".into()))?;
        let auth_header = header::HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| HealthError::Probe(format!("invalid API key header: {e}")))?;

        let start = Instant::now();
        debug!(provider = "OpenAI", model = %cfg.model, "GET {}", url);

        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout_for(cfg))
            .header(header::AUTHORIZATION, auth_header)
            .send()
            .await?;

        let latency = start.elapsed().as_millis();

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                provider = "OpenAI",
                %url,
                %status,
                %snippet,
                latency_ms = latency,
                "health GET /v1/models returned non-success status"
            );

            return Err(HealthError::HttpStatus(HttpError {
                status,
                url,
                snippet,
            })
            .into());
        }

        // Expected minimal JSON: { "data": [ { "id": "<model>" }, ... ] }
        #[derive(serde::Deserialize)]
        struct ModelItem {
            id: String,
        }
        #[derive(serde::Deserialize)]
        struct Models {
            data: Vec<ModelItem>,
        }

        match resp.json::<Models>().await {
            Ok(models) if models.data.iter().any(|m| m.id == cfg.model) => Ok(HealthStatus::ok(
                cfg,
                latency,
                "OpenAI is healthy; model is available",
            )),
            Ok(_) => Ok(HealthStatus::fail(
                cfg,
                latency,
                "OpenAI is up, but model not found in /v1/models",
            )),
            Err(e) => {
                warn!(
                    provider = "OpenAI",
                    error = %e,
                    latency_ms = latency,
                    "failed to decode /v1/models; treating server as reachable"
                );
                Ok(HealthStatus::ok(
                    cfg,
                    latency,
                    format!("OpenAI is reachable; failed to decode /v1/models: {e}"),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::get};
    use serde_json::json;

    fn gemini_cfg(endpoint: String, key: Option<&str>) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Gemini,
            model: "gemini-test".into(),
            endpoint,
            api_key: key.map(str::to_string),
            max_tokens: None,
            temperature: None,
            timeout_secs: Some(5),
        }
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn invalid_endpoint_is_reported_without_network() {
        let svc = HealthService::new(Some(1)).unwrap();
        let status = svc.check(&gemini_cfg("ftp://nope".into(), Some("k"))).await;
        assert!(!status.ok);
        assert_eq!(status.latency_ms, 0);
    }

    #[tokio::test]
    async fn missing_key_fails_probe() {
        let svc = HealthService::new(Some(1)).unwrap();
        let status = svc.check(&gemini_cfg("http://127.0.0.1:9".into(), None)).await;
        assert!(!status.ok);
        assert!(status.message.contains("missing Gemini API key"));
    }

    #[tokio::test]
    async fn gemini_probe_reads_model_resource() {
        let app = Router::new().route(
            "/v1beta/models/gemini-test",
            get(|| async { Json(json!({"name": "models/gemini-test"})) }),
        );
        let base = serve(app).await;

        let svc = HealthService::new(Some(5)).unwrap();
        let status = svc.check(&gemini_cfg(base, Some("k"))).await;
        assert!(status.ok, "{}", status.message);
    }

    #[tokio::test]
    async fn gemini_probe_maps_rejection() {
        let app = Router::new().route(
            "/v1beta/models/gemini-test",
            get(|| async { (StatusCode::FORBIDDEN, "API key not valid") }),
        );
        let base = serve(app).await;

        let svc = HealthService::new(Some(5)).unwrap();
        let status = svc.check(&gemini_cfg(base, Some("bad"))).await;
        assert!(!status.ok);
        assert!(status.message.contains("403"));
    }
}
