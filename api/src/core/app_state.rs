use std::sync::Arc;

use ai_llm_service::{LlmService, TextGenerator, config_from_env, missing_settings};
use contextor::ContextorConfig;
use tender_store::{MongoTenderStore, StoreConfig, TenderStore};
use tracing::{info, warn};

use crate::error_handler::AppError;

/// Health probes should not hang the readiness endpoint.
const HEALTH_TIMEOUT_SECS: u64 = 10;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where processed tenders are looked up.
    pub store: Arc<dyn TenderStore>,
    /// Turns the composed prompt into an answer.
    pub generator: Arc<dyn TextGenerator>,
    /// Document selection and prompt budget.
    pub contextor: ContextorConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TenderStore>,
        generator: Arc<dyn TextGenerator>,
        contextor: ContextorConfig,
    ) -> Self {
        Self {
            store,
            generator,
            contextor,
        }
    }

    /// Load shared state from environment variables.
    ///
    /// Missing connection settings or credentials are only logged; they
    /// surface later as an unavailable store or a failed generation.
    ///
    /// # Errors
    /// [`AppError::LlmConfig`] when a model setting is present but malformed
    /// (unknown `LLM_KIND`, unparsable number, temperature out of range).
    pub fn from_env() -> Result<Self, AppError> {
        let store_cfg = StoreConfig::from_env();
        for var in store_cfg.missing_vars() {
            warn!(var, "store setting is not set; lookups will report the database as unavailable");
        }

        let llm_cfg = config_from_env().map_err(AppError::LlmConfig)?;
        for var in missing_settings(&llm_cfg) {
            warn!(var, "answer model setting is not set; generation will fail");
        }

        let contextor = ContextorConfig::from_env();
        info!(
            provider = ?llm_cfg.provider,
            model = %llm_cfg.model,
            strategy = ?contextor.strategy,
            max_prompt_chars = contextor.max_prompt_chars,
            "application state configured"
        );

        let generator =
            LlmService::new(llm_cfg, Some(HEALTH_TIMEOUT_SECS)).map_err(AppError::LlmConfig)?;

        Ok(Self::new(
            Arc::new(MongoTenderStore::new(store_cfg)),
            Arc::new(generator),
            contextor,
        ))
    }
}
