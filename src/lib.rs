//! Persistence layer for conversation-handoff routing state.
//!
//! The store records which conversational endpoints exist (bot instances,
//! end users, aggregation channels), which connection requests are
//! pending, and which endpoints are currently connected, on top of a
//! partitioned key-value table service. Modules:
//! - `core`: configuration, errors, identifiers, endpoint references,
//!   routing records, and the clock seam
//! - `codec`: record serialization to opaque text bodies
//! - `keys`: row-key derivation, including the composite connection key
//! - `storage`: the table service seam, its `SQLite` backend, and the
//!   per-collection store
//! - `store`: the routing data store facade and its provisioning
//!   lifecycle

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod codec;
pub mod core;
pub mod keys;
pub mod storage;
pub mod store;

pub use self::core::{
    BotId, Clock, Connection, ConnectionRequest, ConversationId, EndpointIdentity,
    EndpointReference, HandoffResult, HandoffStoreError, IdError, StoreConfig, SystemClock, UserId,
};
pub use self::storage::{
    CollectionStore, SqliteTableService, StoredRecord, TableFuture, TableService,
};
pub use self::store::{RoutingDataStore, StoreState};
