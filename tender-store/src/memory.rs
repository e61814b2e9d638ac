//! In-process store for tests and local runs without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    TenderStore,
    errors::StoreError,
    record::{TenderLookup, TenderRecord},
};

#[derive(Default)]
pub struct InMemoryTenderStore {
    records: RwLock<HashMap<String, TenderRecord>>,
    offline: Option<String>,
}

impl InMemoryTenderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every lookup reports `Unavailable(reason)`.
    pub fn offline(reason: impl Into<String>) -> Self {
        Self {
            records: RwLock::default(),
            offline: Some(reason.into()),
        }
    }

    pub fn with_records(records: impl IntoIterator<Item = TenderRecord>) -> Self {
        let map = records
            .into_iter()
            .map(|r| (r.tender_id.clone(), r))
            .collect();
        Self {
            records: RwLock::new(map),
            offline: None,
        }
    }

    /// Inserts or replaces a record.
    pub async fn insert(&self, record: TenderRecord) {
        self.records
            .write()
            .await
            .insert(record.tender_id.clone(), record);
    }
}

#[async_trait]
impl TenderStore for InMemoryTenderStore {
    async fn fetch(&self, tender_id: &str) -> TenderLookup {
        if let Some(reason) = &self.offline {
            return TenderLookup::Unavailable(reason.clone());
        }
        match self.records.read().await.get(tender_id) {
            Some(r) => TenderLookup::Found(r.clone()),
            None => TenderLookup::NotFound,
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        match &self.offline {
            Some(reason) => Err(StoreError::Offline(reason.clone())),
            None => Ok(()),
        }
    }
}
