//! Thin adapter around the `mongodb` driver to isolate API usage.
//!
//! The handle is built lazily on first use and shared by every request.
//! Any connect or query failure drops it, so the next call reconnects.

use std::time::Instant;

use mongodb::{
    Client, Collection, Database,
    bson::{Document, doc},
    options::ClientOptions,
};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};

use crate::{
    config::StoreConfig,
    errors::StoreError,
    record::{TenderLookup, TenderRecord},
};

/// Live driver objects for the configured database and collection.
#[derive(Clone, Debug)]
struct MongoHandle {
    db: Database,
    tenders: Collection<Document>,
}

/// Lazily connected facade over the processed-tenders collection.
pub struct MongoFacade {
    cfg: StoreConfig,
    handle: RwLock<Option<MongoHandle>>,
}

impl MongoFacade {
    /// No I/O happens here.
    pub fn new(cfg: StoreConfig) -> Self {
        Self {
            cfg,
            handle: RwLock::new(None),
        }
    }

    /// Looks up the first document with `tender_id == id`.
    #[instrument(skip_all, fields(tender_id = %tender_id))]
    pub async fn find_tender(&self, tender_id: &str) -> TenderLookup {
        let started = Instant::now();
        let result: Result<Option<Document>, StoreError> = async {
            let handle = self.get_or_connect().await?;
            handle
                .tenders
                .find_one(doc! { "tender_id": tender_id })
                .await
                .map_err(StoreError::Query)
        }
        .await;

        match result {
            Ok(Some(raw)) => {
                debug!(latency_ms = started.elapsed().as_millis(), "tender found");
                TenderLookup::Found(TenderRecord::from_document(&raw, tender_id))
            }
            Ok(None) => {
                info!(latency_ms = started.elapsed().as_millis(), "tender not found");
                TenderLookup::NotFound
            }
            Err(err) => {
                error!(
                    error = %err,
                    latency_ms = started.elapsed().as_millis(),
                    "tender lookup failed; dropping cached connection"
                );
                self.reset().await;
                TenderLookup::Unavailable(err.to_string())
            }
        }
    }

    /// Runs `ping` against the configured database.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let handle = self.get_or_connect().await?;
        match handle.db.run_command(doc! { "ping": 1 }).await {
            Ok(_) => Ok(()),
            Err(e) => {
                self.reset().await;
                Err(StoreError::Query(e))
            }
        }
    }

    #[cfg(test)]
    fn is_connected(&self) -> bool {
        self.handle.try_read().is_ok_and(|h| h.is_some())
    }

    async fn get_or_connect(&self) -> Result<MongoHandle, StoreError> {
        if let Some(h) = self.handle.read().await.as_ref() {
            return Ok(h.clone());
        }
        let mut w = self.handle.write().await;
        // Another request may have connected while we waited for the lock.
        if let Some(h) = w.as_ref() {
            return Ok(h.clone());
        }
        let h = self.connect().await?;
        *w = Some(h.clone());
        Ok(h)
    }

    async fn connect(&self) -> Result<MongoHandle, StoreError> {
        let target = self.cfg.target()?;

        let mut opts = ClientOptions::parse(target.uri)
            .await
            .map_err(StoreError::Connect)?;
        opts.server_selection_timeout = Some(self.cfg.timeout);
        opts.connect_timeout = Some(self.cfg.timeout);
        opts.app_name = Some("tender-qa".to_string());

        let client = Client::with_options(opts).map_err(StoreError::Connect)?;
        let db = client.database(target.db_name);
        let tenders = db.collection::<Document>(target.collection);

        info!(
            db = %target.db_name,
            collection = %target.collection,
            timeout_secs = self.cfg.timeout.as_secs_f32(),
            "MongoDB client initialized"
        );

        Ok(MongoHandle { db, tenders })
    }

    async fn reset(&self) {
        self.handle.write().await.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn cfg(uri: &str) -> StoreConfig {
        let mut c = StoreConfig::new(uri, "tenders", "processed");
        c.timeout = Duration::from_millis(200);
        c
    }

    #[tokio::test]
    async fn unconfigured_store_is_unavailable() {
        let mut c = cfg("mongodb://127.0.0.1:1");
        c.uri = None;
        let facade = MongoFacade::new(c);
        match facade.find_tender("T1").await {
            TenderLookup::Unavailable(reason) => assert!(reason.contains("MONGODB_URI")),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!facade.is_connected());
    }

    #[tokio::test]
    async fn malformed_uri_is_unavailable() {
        let facade = MongoFacade::new(cfg("not-a-mongo-uri"));
        assert!(matches!(
            facade.find_tender("T1").await,
            TenderLookup::Unavailable(_)
        ));
    }

    #[tokio::test]
    async fn unreachable_server_drops_cached_handle() {
        let facade = MongoFacade::new(cfg("mongodb://127.0.0.1:1/?directConnection=true"));
        assert!(matches!(
            facade.find_tender("T1").await,
            TenderLookup::Unavailable(_)
        ));
        assert!(!facade.is_connected());
        assert!(facade.ping().await.is_err());
    }
}
