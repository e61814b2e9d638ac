//! Shared answer generator.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - The provider HTTP client is built lazily on first use and cached.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::config::config_from_env;
//! use ai_llm_service::generator::{LlmService, TextGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let svc = Arc::new(LlmService::new(config_from_env()?, Some(10))?);
//!     let answer = svc.generate("When is the bid due?").await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    config::{LlmModelConfig, LlmProvider},
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::{gemini_service::GeminiService, open_ai_service::OpenAiService},
};

/// Anything that turns a finished prompt into answer text.
///
/// The HTTP layer depends on this trait rather than on a concrete provider,
/// so tests can swap in a canned implementation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiLlmError>;

    /// Best-effort readiness snapshot of the backing model.
    async fn health(&self) -> HealthStatus;
}

/// Generator backed by the configured provider.
pub struct LlmService {
    cfg: LlmModelConfig,
    gemini: RwLock<Option<Arc<GeminiService>>>,
    openai: RwLock<Option<Arc<OpenAiService>>>,
    health: HealthService,
}

impl LlmService {
    /// Creates a new generator. No network call is made here.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the health-check HTTP client cannot be built.
    pub fn new(cfg: LlmModelConfig, health_timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        Ok(Self {
            cfg,
            gemini: RwLock::new(None),
            openai: RwLock::new(None),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    async fn get_or_init_gemini(&self) -> Result<Arc<GeminiService>, AiLlmError> {
        if let Some(cli) = self.gemini.read().await.as_ref() {
            return Ok(cli.clone());
        }
        let mut w = self.gemini.write().await;
        if let Some(cli) = w.as_ref() {
            return Ok(cli.clone());
        }
        debug!("building Gemini client");
        let cli = Arc::new(GeminiService::new(self.cfg.clone())?);
        *w = Some(cli.clone());
        Ok(cli)
    }

    async fn get_or_init_openai(&self) -> Result<Arc<OpenAiService>, AiLlmError> {
        if let Some(cli) = self.openai.read().await.as_ref() {
            return Ok(cli.clone());
        }
        let mut w = self.openai.write().await;
        if let Some(cli) = w.as_ref() {
            return Ok(cli.clone());
        }
        debug!("building OpenAI client");
        let cli = Arc::new(OpenAiService::new(self.cfg.clone())?);
        *w = Some(cli.clone());
        Ok(cli)
    }
}

#[async_trait]
impl TextGenerator for LlmService {
    async fn generate(&self, prompt: &str) -> Result<String, AiLlmError> {
        match self.cfg.provider {
            LlmProvider::Gemini => self.get_or_init_gemini().await?.generate(prompt).await,
            LlmProvider::OpenAI => self.get_or_init_openai().await?.generate(prompt).await,
        }
    }

    async fn health(&self) -> HealthStatus {
        self.health.check(&self.cfg).await
    }
}
