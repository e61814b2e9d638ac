//! Core data models used by the library.

use mongodb::bson::{Bson, Document};

/// Extracted document text of a tender, as stored by the processing pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileTexts {
    /// The whole tender as one string.
    Single(String),
    /// One entry per source file, in stored key order.
    PerFile(Vec<(String, String)>),
    /// Field absent or of an unsupported shape.
    Missing,
}

impl FileTexts {
    /// Maps the raw `file_texts` value.
    ///
    /// Non-string values inside a mapping are skipped.
    pub fn from_bson(value: Option<&Bson>) -> Self {
        match value {
            Some(Bson::String(s)) => FileTexts::Single(s.clone()),
            Some(Bson::Document(files)) => FileTexts::PerFile(
                files
                    .iter()
                    .filter_map(|(name, v)| match v {
                        Bson::String(text) => Some((name.clone(), text.clone())),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => FileTexts::Missing,
        }
    }
}

/// Read-only view of one processed tender.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TenderRecord {
    pub tender_id: String,
    pub file_texts: FileTexts,
}

impl TenderRecord {
    pub fn new(tender_id: impl Into<String>, file_texts: FileTexts) -> Self {
        Self {
            tender_id: tender_id.into(),
            file_texts,
        }
    }

    /// Builds a record from a raw document; other fields are ignored.
    ///
    /// `queried_id` is used when the document carries no string `tender_id`.
    pub fn from_document(doc: &Document, queried_id: &str) -> Self {
        let tender_id = doc
            .get_str("tender_id")
            .map(str::to_string)
            .unwrap_or_else(|_| queried_id.to_string());
        Self {
            tender_id,
            file_texts: FileTexts::from_bson(doc.get("file_texts")),
        }
    }
}

/// Outcome of a lookup by tender id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TenderLookup {
    Found(TenderRecord),
    NotFound,
    /// The store could not be reached or queried; carries a log-only reason.
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn single_string_text() {
        let d = doc! { "tender_id": "T1", "file_texts": "Deadline: June 1", "status": "done" };
        let rec = TenderRecord::from_document(&d, "T1");
        assert_eq!(rec.file_texts, FileTexts::Single("Deadline: June 1".into()));
    }

    #[test]
    fn mapping_keeps_stored_order_and_skips_non_strings() {
        let d = doc! {
            "tender_id": "T2",
            "file_texts": { "z.pdf": "Z", "pages": 12, "a.pdf": "A" },
        };
        let rec = TenderRecord::from_document(&d, "T2");
        assert_eq!(
            rec.file_texts,
            FileTexts::PerFile(vec![
                ("z.pdf".into(), "Z".into()),
                ("a.pdf".into(), "A".into()),
            ])
        );
    }

    #[test]
    fn unsupported_shapes_are_missing() {
        assert_eq!(FileTexts::from_bson(None), FileTexts::Missing);
        assert_eq!(
            FileTexts::from_bson(Some(&Bson::Array(vec![Bson::String("x".into())]))),
            FileTexts::Missing
        );
        assert_eq!(FileTexts::from_bson(Some(&Bson::Null)), FileTexts::Missing);
    }

    #[test]
    fn falls_back_to_queried_id() {
        let d = doc! { "tender_id": 42, "file_texts": "x" };
        assert_eq!(TenderRecord::from_document(&d, "42").tender_id, "42");
    }
}
