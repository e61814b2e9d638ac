//! Read-only access to processed tenders.
//!
//! The processing pipeline writes one document per tender with the extracted
//! text under `file_texts`. This crate looks those documents up by
//! `tender_id` and never writes.
//!
//! Lookups do not fail with an error: connectivity problems are reported as
//! [`TenderLookup::Unavailable`] so callers can answer the user gracefully.

mod config;
mod errors;
mod memory;
mod mongo_facade;
mod record;

pub use config::{DEFAULT_TIMEOUT_SECS, StoreConfig};
pub use errors::StoreError;
pub use memory::InMemoryTenderStore;
pub use record::{FileTexts, TenderLookup, TenderRecord};

use async_trait::async_trait;
use tracing::trace;

/// Lookup contract used by the HTTP layer.
#[async_trait]
pub trait TenderStore: Send + Sync {
    /// Exact-match lookup by `tender_id`; first match wins.
    async fn fetch(&self, tender_id: &str) -> TenderLookup;

    /// Cheap round trip for readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Production store backed by MongoDB.
///
/// Construct once and share; the driver connection is created on the first
/// lookup and reused afterwards.
pub struct MongoTenderStore {
    facade: mongo_facade::MongoFacade,
}

impl MongoTenderStore {
    pub fn new(cfg: StoreConfig) -> Self {
        trace!("MongoTenderStore::new timeout={:?}", cfg.timeout);
        Self {
            facade: mongo_facade::MongoFacade::new(cfg),
        }
    }
}

#[async_trait]
impl TenderStore for MongoTenderStore {
    async fn fetch(&self, tender_id: &str) -> TenderLookup {
        self.facade.find_tender(tender_id).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.facade.ping().await
    }
}
