//! Error types for the handoff routing store.

use thiserror::Error;

/// Routing store error type.
#[derive(Debug, Error)]
pub enum HandoffStoreError {
    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The backing table service failed or could not be reached.
    #[error("table service unavailable: {0}")]
    Unavailable(#[from] tokio_rusqlite::Error),
    /// A record body is not the serialized form of the expected type.
    #[error("malformed {kind} record: {source}")]
    MalformedRecord {
        /// Record kind that failed to decode.
        kind: &'static str,
        /// Underlying decode error.
        source: serde_json::Error,
    },
    /// A stored body failed to decode while listing a collection.
    ///
    /// The listing is aborted; no partial results are returned.
    #[error("corrupt record {row_key:?} in collection {collection}: {source}")]
    CorruptData {
        /// Collection that holds the corrupt record.
        collection: String,
        /// Row key of the corrupt record.
        row_key: String,
        /// Underlying decode error.
        source: serde_json::Error,
    },
}

/// Convenience result alias for routing store operations.
pub type HandoffResult<T> = Result<T, HandoffStoreError>;
