//! Typed error for the contextor crate.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextorError {
    /// Composed prompt exceeds `MAX_PROMPT_CHARS`; nothing is sent upstream.
    #[error("prompt too large: {len} chars exceeds limit of {limit}")]
    PromptTooLarge { len: usize, limit: usize },
}
