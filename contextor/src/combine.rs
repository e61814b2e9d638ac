//! Joins stored file texts into one document block.

use tender_store::FileTexts;

/// Placed between consecutive files.
pub const FILE_SEPARATOR: &str = "\n\n---\n\n";

/// Every file in stored order; a single string as-is; nothing for missing text.
pub fn combine_file_texts(texts: &FileTexts) -> String {
    match texts {
        FileTexts::Single(s) => s.clone(),
        FileTexts::PerFile(files) => files
            .iter()
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join(FILE_SEPARATOR),
        FileTexts::Missing => String::new(),
    }
}
