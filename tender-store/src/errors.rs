//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for tender-store operations.
///
/// Lookups never return it directly; it is folded into
/// [`TenderLookup::Unavailable`](crate::TenderLookup::Unavailable).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection settings are absent or unusable.
    #[error("config error: {0}")]
    Config(String),

    /// Could not build a client from the connection string.
    #[error("connect error: {0}")]
    Connect(#[source] mongodb::error::Error),

    /// The server rejected or timed out a query/command.
    #[error("query error: {0}")]
    Query(#[source] mongodb::error::Error),

    /// In-memory store configured to behave as if the database were down.
    #[error("store offline: {0}")]
    Offline(String),
}
