//! Prompt assembly for tender questions.
//!
//! Public API: [`document_text`] turns stored file texts into one document
//! block and [`build_prompt`] wraps it with the analyst instructions and the
//! question, enforcing the prompt budget.

pub mod budget;
pub mod cfg;
pub mod combine;
mod error;
pub mod focus;
pub mod prompt;

pub use cfg::{ContextorConfig, TextStrategy};
pub use error::ContextorError;

use tender_store::FileTexts;
use tracing::debug;

/// Document block for `texts` under the configured strategy.
///
/// An empty result means the tender has no usable text.
///
/// # Example
/// ```
/// # use contextor::{ContextorConfig, document_text};
/// # use tender_store::FileTexts;
/// let texts = FileTexts::PerFile(vec![("a".into(), "X".into()), ("b".into(), "Y".into())]);
/// assert_eq!(document_text(&ContextorConfig::default(), &texts), "X\n\n---\n\nY");
/// ```
pub fn document_text(cfg: &ContextorConfig, texts: &FileTexts) -> String {
    match cfg.strategy {
        TextStrategy::Full => combine::combine_file_texts(texts),
        TextStrategy::Focused => focus::focused_text(texts),
    }
}

/// Composes the final prompt and checks it against `cfg.max_prompt_chars`.
///
/// # Errors
/// [`ContextorError::PromptTooLarge`] when the prompt is over budget.
pub fn build_prompt(
    cfg: &ContextorConfig,
    tender_id: &str,
    document: &str,
    question: &str,
) -> Result<String, ContextorError> {
    let prompt = prompt::compose(tender_id, document, question);
    budget::ensure_within_budget(&prompt, cfg.max_prompt_chars)?;
    debug!(tender_id, prompt_len = prompt.len(), "prompt composed");
    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_budget_prompt_is_rejected() {
        let cfg = ContextorConfig {
            strategy: TextStrategy::Full,
            max_prompt_chars: 64,
        };
        let doc = "x".repeat(100);
        assert!(matches!(
            build_prompt(&cfg, "T1", &doc, "q"),
            Err(ContextorError::PromptTooLarge { limit: 64, .. })
        ));
    }

    #[test]
    fn prompt_carries_id_document_and_question() {
        let p = build_prompt(
            &ContextorConfig::default(),
            "T1",
            "Deadline: June 1",
            "What is the deadline?",
        )
        .unwrap();
        assert!(p.contains("tender document with ID T1:\n\nDeadline: June 1\n\nQuestion: What is the deadline?"));
    }
}
