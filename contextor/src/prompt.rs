//! Prompt builder: fixed analyst instructions + the tender document + the question.

/// Instructions sent ahead of every document.
pub const SYSTEM_PROMPT: &str = "You are an expert tender document analyzer. Your role is to carefully analyze tender documents and provide accurate answers to questions about them.

Answer only from the tender document provided. If the document does not contain the information asked for, say so clearly instead of guessing.

Remember: Accuracy is crucial and answers should be short and summarised, as these documents contain important business information.";

/// Builds the single prompt string sent to the model.
///
/// The document text is included verbatim; size limits are enforced
/// separately by [`crate::budget`].
///
/// # Example
/// ```
/// # use contextor::prompt::compose;
/// let p = compose("T1", "Deadline: June 1", "What is the deadline?");
/// assert!(p.ends_with("Question: What is the deadline?"));
/// ```
pub fn compose(tender_id: &str, document_text: &str, question: &str) -> String {
    format!(
        "{SYSTEM_PROMPT}\n\nHere is the tender document with ID {tender_id}:\n\n{document_text}\n\nQuestion: {question}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_stable() {
        let p = compose("T1", "Deadline: June 1", "What is the deadline?");
        let expected = format!(
            "{SYSTEM_PROMPT}\n\nHere is the tender document with ID T1:\n\nDeadline: June 1\n\nQuestion: What is the deadline?"
        );
        assert_eq!(p, expected);
    }

    #[test]
    fn document_is_never_truncated() {
        let doc = "x".repeat(100_000);
        let p = compose("T9", &doc, "q");
        assert!(p.contains(&doc));
    }
}
