//! Runtime configuration loaded from environment variables.

use tracing::warn;

pub const DEFAULT_MAX_PROMPT_CHARS: usize = 2_000_000;

/// How per-file texts are turned into the document block of the prompt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextStrategy {
    /// Every file, joined in stored order.
    #[default]
    Full,
    /// Criteria-relevant passages first, falling back to the largest files.
    Focused,
}

impl TextStrategy {
    /// Unknown values fall back to [`TextStrategy::Full`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "focused" | "focus" | "chunked" => TextStrategy::Focused,
            "" | "full" => TextStrategy::Full,
            other => {
                warn!(value = %other, "unknown TEXT_STRATEGY; using `full`");
                TextStrategy::Full
            }
        }
    }
}

/// Config bag for prompt assembly. All fields have defaults via `from_env`.
#[derive(Clone, Debug)]
pub struct ContextorConfig {
    pub strategy: TextStrategy,
    /// Upper bound on the composed prompt, in characters.
    pub max_prompt_chars: usize,
}

impl Default for ContextorConfig {
    fn default() -> Self {
        Self {
            strategy: TextStrategy::Full,
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
        }
    }
}

impl ContextorConfig {
    /// Reads `TEXT_STRATEGY` and `MAX_PROMPT_CHARS`.
    pub fn from_env() -> Self {
        Self {
            strategy: TextStrategy::parse(&std::env::var("TEXT_STRATEGY").unwrap_or_default()),
            max_prompt_chars: parse("MAX_PROMPT_CHARS", DEFAULT_MAX_PROMPT_CHARS),
        }
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(dflt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parsing() {
        assert_eq!(TextStrategy::parse("Focused"), TextStrategy::Focused);
        assert_eq!(TextStrategy::parse(""), TextStrategy::Full);
        assert_eq!(TextStrategy::parse("banana"), TextStrategy::Full);
    }
}
