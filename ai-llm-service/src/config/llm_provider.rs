use crate::error_handler::{ConfigError, Provider};

/// Represents the hosted backend used for answer generation.
///
/// `Gemini` is the default. `OpenAI` covers any endpoint that speaks the
/// OpenAI chat-completions protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LlmProvider {
    /// Google Generative Language API (`models/{model}:generateContent`).
    #[default]
    Gemini,
    /// OpenAI-compatible `/v1/chat/completions`.
    OpenAI,
}

impl LlmProvider {
    /// Parses the `LLM_KIND` value (case-insensitive).
    pub fn parse(kind: &str) -> Result<Self, ConfigError> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "" | "gemini" | "google" => Ok(LlmProvider::Gemini),
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl From<LlmProvider> for Provider {
    fn from(p: LlmProvider) -> Self {
        match p {
            LlmProvider::Gemini => Provider::Gemini,
            LlmProvider::OpenAI => Provider::OpenAI,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds() {
        assert_eq!(LlmProvider::parse("Gemini").unwrap(), LlmProvider::Gemini);
        assert_eq!(LlmProvider::parse("").unwrap(), LlmProvider::Gemini);
        assert_eq!(LlmProvider::parse(" openai ").unwrap(), LlmProvider::OpenAI);
        assert!(LlmProvider::parse("ollama").is_err());
    }
}
