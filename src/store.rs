//! Routing data store: the domain-level persistence contract.
//!
//! The store composes five collection stores (bot instances, users,
//! aggregation channels, connection requests, connections) and owns
//! provisioning of their physical layout. Callers pass domain records in
//! and out by value; key derivation and body encoding happen here.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::codec;
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::StoreConfig;
use crate::core::endpoint::{EndpointIdentity, EndpointReference};
use crate::core::errors::{HandoffResult, HandoffStoreError};
use crate::core::records::{Connection, ConnectionRequest};
use crate::keys;
use crate::storage::collection::CollectionStore;
use crate::storage::table::{SqliteTableService, TableService};

/// Constant partition discriminator shared by every collection.
///
/// Each collection lives in its own physical table, so a single constant
/// cannot collide across record kinds.
const PARTITION_KEY: &str = "routing";

/// Lifecycle state of the store's physical layout.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StoreState {
    /// Collections are being created. Operations may be issued but are not
    /// guaranteed durable until provisioning completes.
    Provisioning,
    /// All five collections confirmed to exist or confirmed already
    /// existing.
    Ready,
}

impl StoreState {
    /// Stable string representation for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Provisioning => "provisioning",
            Self::Ready => "ready",
        }
    }
}

impl fmt::Display for StoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistence facade over the five routing collections.
///
/// The store exclusively owns its physical collections; no other component
/// writes to them directly. Multiple store instances may share the same
/// collections (service replicas); isolation between them is entirely the
/// backing store's insert-if-absent behavior.
pub struct RoutingDataStore {
    bot_instances: CollectionStore,
    users: CollectionStore,
    aggregation_channels: CollectionStore,
    connection_requests: CollectionStore,
    connections: CollectionStore,
    clock: Arc<dyn Clock>,
    state: watch::Receiver<StoreState>,
}

impl std::fmt::Debug for RoutingDataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingDataStore")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl RoutingDataStore {
    /// Open a store over the bundled `SQLite` table service with the
    /// system clock.
    ///
    /// Collection provisioning starts in the background; use
    /// [`Self::await_ready`] to wait for it.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the backing
    /// database cannot be opened.
    pub async fn connect(config: StoreConfig) -> HandoffResult<Self> {
        config.validate()?;
        let service: Arc<dyn TableService> =
            Arc::new(SqliteTableService::connect(&config).await?);
        Self::with_service(config, service, Arc::new(SystemClock))
    }

    /// Build a store over an injected table service and time source.
    ///
    /// Provisioning is spawned as a background task at construction and is
    /// not repeated, so this must be called within a Tokio runtime.
    /// Provisioning failures are logged and swallowed; the first operation
    /// against a collection that could not be created surfaces
    /// [`HandoffStoreError::Unavailable`].
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn with_service(
        config: StoreConfig,
        service: Arc<dyn TableService>,
        clock: Arc<dyn Clock>,
    ) -> HandoffResult<Self> {
        config.validate()?;

        let bot_instances = CollectionStore::new(
            Arc::clone(&service),
            config.bot_instance_table,
            PARTITION_KEY,
        );
        let users = CollectionStore::new(Arc::clone(&service), config.user_table, PARTITION_KEY);
        let aggregation_channels = CollectionStore::new(
            Arc::clone(&service),
            config.aggregation_channel_table,
            PARTITION_KEY,
        );
        let connection_requests = CollectionStore::new(
            Arc::clone(&service),
            config.connection_request_table,
            PARTITION_KEY,
        );
        let connections = CollectionStore::new(
            Arc::clone(&service),
            config.connection_table,
            PARTITION_KEY,
        );

        let (state_tx, state_rx) = watch::channel(StoreState::Provisioning);
        let to_provision = [
            bot_instances.clone(),
            users.clone(),
            aggregation_channels.clone(),
            connection_requests.clone(),
            connections.clone(),
        ];
        tokio::spawn(async move {
            for collection in to_provision {
                if let Err(err) = collection.ensure_exists().await {
                    warn!(
                        table = collection.table(),
                        "collection provisioning failed: {err}"
                    );
                }
            }
            debug!("routing collections provisioned");
            let _ = state_tx.send(StoreState::Ready);
        });

        Ok(Self {
            bot_instances,
            users,
            aggregation_channels,
            connection_requests,
            connections,
            clock,
            state: state_rx,
        })
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> StoreState {
        *self.state.borrow()
    }

    /// Wait until the provisioning pass over every collection has finished.
    ///
    /// Provisioning failures are logged and swallowed, so this resolves
    /// whether or not every collection could actually be created.
    pub async fn await_ready(&self) {
        let mut state = self.state.clone();
        let _ = state.wait_for(|s| *s == StoreState::Ready).await;
    }

    /// Store an endpoint reference, routed by identity: bot instances for
    /// bots, users otherwise.
    ///
    /// Returns `false` if an endpoint with the same conversation
    /// identifier already exists in that collection.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call.
    pub async fn add_endpoint(&self, endpoint: &EndpointReference) -> HandoffResult<bool> {
        let body = codec::encode(codec::kind::ENDPOINT, endpoint)?;
        self.endpoint_collection(endpoint)
            .insert(keys::endpoint_key(endpoint), body)
            .await
    }

    /// Remove an endpoint reference from its identity-routed collection.
    ///
    /// Returns `false` if no endpoint with that key was stored.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call.
    pub async fn remove_endpoint(&self, endpoint: &EndpointReference) -> HandoffResult<bool> {
        self.endpoint_collection(endpoint)
            .delete(&keys::endpoint_key(endpoint))
            .await
    }

    /// List every stored bot instance endpoint.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call, or
    /// [`HandoffStoreError::CorruptData`] if any stored body fails to
    /// decode (the listing is aborted, without partial results).
    pub async fn list_bot_instances(&self) -> HandoffResult<Vec<EndpointReference>> {
        list_records(&self.bot_instances, codec::kind::ENDPOINT).await
    }

    /// List every stored user endpoint.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call, or
    /// [`HandoffStoreError::CorruptData`] if any stored body fails to
    /// decode.
    pub async fn list_users(&self) -> HandoffResult<Vec<EndpointReference>> {
        list_records(&self.users, codec::kind::ENDPOINT).await
    }

    /// Store an aggregation channel endpoint.
    ///
    /// Returns `false` if a channel with the same conversation identifier
    /// already exists.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call.
    pub async fn add_aggregation_channel(
        &self,
        channel: &EndpointReference,
    ) -> HandoffResult<bool> {
        let body = codec::encode(codec::kind::ENDPOINT, channel)?;
        self.aggregation_channels
            .insert(keys::endpoint_key(channel), body)
            .await
    }

    /// Remove an aggregation channel endpoint.
    ///
    /// Returns `false` if no channel with that key was stored.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call.
    pub async fn remove_aggregation_channel(
        &self,
        channel: &EndpointReference,
    ) -> HandoffResult<bool> {
        self.aggregation_channels
            .delete(&keys::endpoint_key(channel))
            .await
    }

    /// List every stored aggregation channel endpoint.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call, or
    /// [`HandoffStoreError::CorruptData`] if any stored body fails to
    /// decode.
    pub async fn list_aggregation_channels(&self) -> HandoffResult<Vec<EndpointReference>> {
        list_records(&self.aggregation_channels, codec::kind::ENDPOINT).await
    }

    /// Build a connection request for `requestor`, stamped through the
    /// store's time source.
    #[must_use]
    pub fn create_connection_request(&self, requestor: EndpointReference) -> ConnectionRequest {
        ConnectionRequest::new(requestor, self.clock.now())
    }

    /// Store a pending connection request.
    ///
    /// Returns `false` if a request keyed by the same requestor
    /// conversation is already pending.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call.
    pub async fn add_connection_request(
        &self,
        request: &ConnectionRequest,
    ) -> HandoffResult<bool> {
        let body = codec::encode(codec::kind::CONNECTION_REQUEST, request)?;
        self.connection_requests
            .insert(keys::connection_request_key(request), body)
            .await
    }

    /// Remove a pending connection request.
    ///
    /// Returns `false` if no request with that key was pending.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call.
    pub async fn remove_connection_request(
        &self,
        request: &ConnectionRequest,
    ) -> HandoffResult<bool> {
        self.connection_requests
            .delete(&keys::connection_request_key(request))
            .await
    }

    /// List every pending connection request.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call, or
    /// [`HandoffStoreError::CorruptData`] if any stored body fails to
    /// decode.
    pub async fn list_connection_requests(&self) -> HandoffResult<Vec<ConnectionRequest>> {
        list_records(&self.connection_requests, codec::kind::CONNECTION_REQUEST).await
    }

    /// Store an established connection.
    ///
    /// Returns `false` if a connection with the same composite key already
    /// exists. The composite key is order-sensitive; see
    /// [`keys::connection_key`].
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call.
    pub async fn add_connection(&self, connection: &Connection) -> HandoffResult<bool> {
        let body = codec::encode(codec::kind::CONNECTION, connection)?;
        self.connections
            .insert(keys::connection_key(connection), body)
            .await
    }

    /// Remove an established connection.
    ///
    /// Returns `false` if no connection with that composite key was
    /// stored.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call.
    pub async fn remove_connection(&self, connection: &Connection) -> HandoffResult<bool> {
        self.connections
            .delete(&keys::connection_key(connection))
            .await
    }

    /// List every established connection.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call, or
    /// [`HandoffStoreError::CorruptData`] if any stored body fails to
    /// decode.
    pub async fn list_connections(&self) -> HandoffResult<Vec<Connection>> {
        list_records(&self.connections, codec::kind::CONNECTION).await
    }

    fn endpoint_collection(&self, endpoint: &EndpointReference) -> &CollectionStore {
        match endpoint.identity {
            EndpointIdentity::Bot { .. } => &self.bot_instances,
            EndpointIdentity::User { .. } => &self.users,
        }
    }
}

/// Decode every body in a collection; the first failure aborts the listing.
async fn list_records<T: DeserializeOwned>(
    collection: &CollectionStore,
    kind: &'static str,
) -> HandoffResult<Vec<T>> {
    let stored = collection.list_all().await?;
    let mut records = Vec::with_capacity(stored.len());
    for record in stored {
        match codec::decode(kind, &record.body) {
            Ok(value) => records.push(value),
            Err(HandoffStoreError::MalformedRecord { source, .. }) => {
                return Err(HandoffStoreError::CorruptData {
                    collection: collection.table().to_string(),
                    row_key: record.row_key,
                    source,
                });
            }
            Err(err) => return Err(err),
        }
    }
    Ok(records)
}
