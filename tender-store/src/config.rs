//! Connection settings for the processed-tenders collection.

use std::time::Duration;

use tracing::warn;

use crate::errors::StoreError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where processed tenders live.
///
/// Every field is optional so a half-configured deployment still boots; the
/// gap shows up as an unavailable store on the first lookup.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// MongoDB connection string, e.g. `mongodb://localhost:27017`.
    pub uri: Option<String>,
    pub db_name: Option<String>,
    pub collection: Option<String>,
    /// Server selection and connect timeout.
    pub timeout: Duration,
}

/// Validated view of [`StoreConfig`].
pub(crate) struct Target<'a> {
    pub uri: &'a str,
    pub db_name: &'a str,
    pub collection: &'a str,
}

impl StoreConfig {
    pub fn new(
        uri: impl Into<String>,
        db_name: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            uri: Some(uri.into()),
            db_name: Some(db_name.into()),
            collection: Some(collection.into()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads `MONGODB_URI`, `MONGODB_DB_NAME`, `MONGODB_PROCESSED_COLLECTION`
    /// and `MONGODB_TIMEOUT_SECS`. Never fails.
    pub fn from_env() -> Self {
        let timeout_secs = match env("MONGODB_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                warn!(value = %raw, "MONGODB_TIMEOUT_SECS is not a number; using default");
                DEFAULT_TIMEOUT_SECS
            }),
            None => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            uri: env("MONGODB_URI"),
            db_name: env("MONGODB_DB_NAME"),
            collection: env("MONGODB_PROCESSED_COLLECTION"),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Names of the variables that are not set, for startup warnings.
    pub fn missing_vars(&self) -> Vec<&'static str> {
        [
            ("MONGODB_URI", &self.uri),
            ("MONGODB_DB_NAME", &self.db_name),
            ("MONGODB_PROCESSED_COLLECTION", &self.collection),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_none())
        .map(|(name, _)| name)
        .collect()
    }

    pub(crate) fn target(&self) -> Result<Target<'_>, StoreError> {
        let missing = self.missing_vars();
        match (&self.uri, &self.db_name, &self.collection) {
            (Some(uri), Some(db_name), Some(collection)) => Ok(Target {
                uri,
                db_name,
                collection,
            }),
            _ => Err(StoreError::Config(format!(
                "missing settings: {}",
                missing.join(", ")
            ))),
        }
    }
}

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_each_missing_var() {
        let cfg = StoreConfig {
            uri: Some("mongodb://localhost".into()),
            db_name: None,
            collection: None,
            timeout: Duration::from_secs(1),
        };
        assert_eq!(
            cfg.missing_vars(),
            vec!["MONGODB_DB_NAME", "MONGODB_PROCESSED_COLLECTION"]
        );
        let err = cfg.target().err().unwrap();
        assert!(err.to_string().contains("MONGODB_DB_NAME"));
    }

    #[test]
    fn complete_config_has_target() {
        let cfg = StoreConfig::new("mongodb://localhost", "tenders", "processed");
        assert!(cfg.missing_vars().is_empty());
        assert_eq!(cfg.target().unwrap().collection, "processed");
    }
}
