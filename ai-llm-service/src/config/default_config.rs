//! Answer-model config loaded from environment variables.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`         = `gemini` (default) or `openai`
//! - `LLM_TEMPERATURE`  = sampling temperature (default `0.7`, range `0.0..=2.0`)
//! - `LLM_MAX_TOKENS`   = output token ceiling (default `2048`)
//! - `LLM_TIMEOUT_SECS` = request timeout (default `120`)
//!
//! Gemini:
//! - `GEMINI_MODEL`, `GEMINI_API_KEY`
//! - `GEMINI_ENDPOINT` (default `https://generativelanguage.googleapis.com`)
//!
//! OpenAI-compatible:
//! - `OPENAI_MODEL`, `OPENAI_API_KEY`
//! - `OPENAI_ENDPOINT` (default `https://api.openai.com`)
//!
//! Model name and API key are not required here. A missing value is reported
//! by [`missing_settings`] and surfaces as a generation failure on first use.

use crate::{
    config::{
        llm_model_config::{
            DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS, LlmModelConfig,
        },
        llm_provider::LlmProvider,
    },
    error_handler::{
        AiLlmError, env_opt_f32, env_opt_u32, env_opt_u64, opt_env, validate_range_f32,
    },
};

pub const GEMINI_DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const OPENAI_DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// Builds the answer-model config from the environment.
///
/// # Errors
/// - [`ConfigError::UnsupportedProvider`](crate::error_handler::ConfigError::UnsupportedProvider) for an unknown `LLM_KIND`
/// - [`ConfigError::InvalidNumber`](crate::error_handler::ConfigError::InvalidNumber) for unparsable numeric knobs
/// - [`ConfigError::OutOfRange`](crate::error_handler::ConfigError::OutOfRange) for a temperature outside `0.0..=2.0`
pub fn config_from_env() -> Result<LlmModelConfig, AiLlmError> {
    let provider = LlmProvider::parse(&opt_env("LLM_KIND").unwrap_or_default())?;

    let temperature = env_opt_f32("LLM_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("temperature", temperature, 0.0, 2.0)?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS);
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);

    let (model, api_key, endpoint) = match provider {
        LlmProvider::Gemini => (
            opt_env("GEMINI_MODEL"),
            opt_env("GEMINI_API_KEY"),
            opt_env("GEMINI_ENDPOINT").unwrap_or_else(|| GEMINI_DEFAULT_ENDPOINT.to_string()),
        ),
        LlmProvider::OpenAI => (
            opt_env("OPENAI_MODEL"),
            opt_env("OPENAI_API_KEY"),
            opt_env("OPENAI_ENDPOINT").unwrap_or_else(|| OPENAI_DEFAULT_ENDPOINT.to_string()),
        ),
    };

    Ok(LlmModelConfig {
        provider,
        model: model.unwrap_or_default(),
        endpoint,
        api_key,
        max_tokens: Some(max_tokens),
        temperature: Some(temperature),
        timeout_secs: Some(timeout_secs),
    })
}

/// Names of the settings that are absent from `cfg`, for startup warnings.
pub fn missing_settings(cfg: &LlmModelConfig) -> Vec<&'static str> {
    let (model_var, key_var) = match cfg.provider {
        LlmProvider::Gemini => ("GEMINI_MODEL", "GEMINI_API_KEY"),
        LlmProvider::OpenAI => ("OPENAI_MODEL", "OPENAI_API_KEY"),
    };
    let mut out = Vec::new();
    if cfg.model.trim().is_empty() {
        out.push(model_var);
    }
    if cfg.api_key.is_none() {
        out.push(key_var);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(model: &str, key: Option<&str>) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Gemini,
            model: model.into(),
            endpoint: GEMINI_DEFAULT_ENDPOINT.into(),
            api_key: key.map(str::to_string),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            temperature: Some(DEFAULT_TEMPERATURE),
            timeout_secs: None,
        }
    }

    #[test]
    fn reports_missing_model_and_key() {
        assert_eq!(
            missing_settings(&cfg("", None)),
            vec!["GEMINI_MODEL", "GEMINI_API_KEY"]
        );
        assert!(missing_settings(&cfg("gemini-1.5-flash", Some("k"))).is_empty());
    }
}
