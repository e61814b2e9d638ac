use serde::Deserialize;

/// Request payload for /ask.
///
/// Both fields are optional at the wire level so that a missing or
/// malformed body becomes a validation error rather than a rejection.
#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub tender_id: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
}

impl AskRequest {
    /// Parses a raw body; anything that is not a matching JSON object counts as `{}`.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// `(tender_id, question)` when both are present and non-empty.
    ///
    /// Whitespace-only values count as given and are passed on unchanged.
    pub fn into_parts(self) -> Option<(String, String)> {
        let filled = |v: Option<String>| v.filter(|s| !s.is_empty());
        Some((filled(self.tender_id)?, filled(self.question)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_body_is_empty_request() {
        assert!(AskRequest::from_body(b"{not json").into_parts().is_none());
        assert!(AskRequest::from_body(b"").into_parts().is_none());
        assert!(AskRequest::from_body(b"[1,2]").into_parts().is_none());
    }

    #[test]
    fn empty_fields_are_missing() {
        let req = AskRequest::from_body(br#"{"tender_id":"","question":"When?"}"#);
        assert!(req.into_parts().is_none());
        let req = AskRequest::from_body(br#"{"tender_id":"T1","question":null}"#);
        assert!(req.into_parts().is_none());
    }

    #[test]
    fn whitespace_only_fields_are_accepted() {
        let req = AskRequest::from_body(br#"{"tender_id":"T1","question":"   "}"#);
        assert_eq!(
            req.into_parts(),
            Some(("T1".to_string(), "   ".to_string()))
        );
    }

    #[test]
    fn values_are_kept_verbatim() {
        let req = AskRequest::from_body(br#"{"tender_id":"T1 ","question":"When?","extra":1}"#);
        assert_eq!(
            req.into_parts(),
            Some(("T1 ".to_string(), "When?".to_string()))
        );
    }
}
