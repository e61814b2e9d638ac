//! Prompt size guard.

use tracing::warn;

use crate::error::ContextorError;

/// Rejects prompts longer than `limit` characters.
pub fn ensure_within_budget(prompt: &str, limit: usize) -> Result<(), ContextorError> {
    // Cheap byte check first; chars <= bytes.
    if prompt.len() <= limit {
        return Ok(());
    }
    let len = prompt.chars().count();
    if len <= limit {
        return Ok(());
    }
    warn!(len, limit, "prompt exceeds budget");
    Err(ContextorError::PromptTooLarge { len, limit })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_characters_not_bytes() {
        // 4 chars, 8 bytes
        assert!(ensure_within_budget("ёёёё", 4).is_ok());
        assert_eq!(
            ensure_within_budget("abcde", 4),
            Err(ContextorError::PromptTooLarge { len: 5, limit: 4 })
        );
    }
}
