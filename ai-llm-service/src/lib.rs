pub mod config;
pub mod error_handler;
pub mod generator;
pub mod health_service;
pub mod services;
pub mod telemetry;

pub use config::{LlmModelConfig, LlmProvider, config_from_env, missing_settings};
pub use error_handler::AiLlmError;
pub use generator::{LlmService, TextGenerator};
pub use health_service::HealthStatus;
