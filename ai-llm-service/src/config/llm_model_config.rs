use crate::config::llm_provider::LlmProvider;

/// Sampling temperature applied to every answer.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Output token ceiling applied to every answer.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Upstream request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the answer-generation model.
///
/// Sampling parameters are deployment policy: they come from the environment
/// once at startup and are never changed per request.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Gemini,
///     model: "gemini-1.5-flash".to_string(),
///     endpoint: "https://generativelanguage.googleapis.com".to_string(),
///     api_key: Some("key".to_string()),
///     max_tokens: Some(2048),
///     temperature: Some(0.7),
///     timeout_secs: Some(60),
/// };
/// assert_eq!(cfg.provider, LlmProvider::Gemini);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The hosted backend.
    pub provider: LlmProvider,

    /// Model identifier (e.g. `"gemini-1.5-flash"`).
    pub model: String,

    /// Base URL of the API, without the versioned path.
    pub endpoint: String,

    /// API key. Absence is only detected when a call is made.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Effective timeout, falling back to [`DEFAULT_TIMEOUT_SECS`].
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Endpoint with trailing slashes removed.
    pub(crate) fn base_url(&self) -> String {
        self.endpoint.trim().trim_end_matches('/').to_string()
    }
}
