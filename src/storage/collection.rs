//! A single physical collection bound to its partition discriminator.

use std::sync::Arc;

use crate::core::errors::HandoffResult;
use crate::storage::table::{StoredRecord, TableService};

/// One physical collection plus the constant partition its records share.
///
/// All records of a kind live under one partition value, so enumeration is
/// always a partition-equality query against the backing service.
#[derive(Clone)]
pub struct CollectionStore {
    service: Arc<dyn TableService>,
    table: String,
    partition_key: String,
}

impl CollectionStore {
    /// Bind a collection to its backing table and partition discriminator.
    #[must_use]
    pub fn new(
        service: Arc<dyn TableService>,
        table: impl Into<String>,
        partition_key: impl Into<String>,
    ) -> Self {
        Self {
            service,
            table: table.into(),
            partition_key: partition_key.into(),
        }
    }

    /// Name of the backing physical table.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Ensure the physical table exists. Creation is idempotent.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call.
    pub async fn ensure_exists(&self) -> HandoffResult<()> {
        self.service.create_table_if_absent(self.table.clone()).await
    }

    /// Insert a record body under a derived row key.
    ///
    /// Returns `false` when a record with the same key already exists; the
    /// stored data is left untouched in that case.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call.
    pub async fn insert(&self, row_key: String, body: String) -> HandoffResult<bool> {
        let record = StoredRecord {
            partition_key: self.partition_key.clone(),
            row_key,
            body,
        };
        self.service.insert_if_absent(self.table.clone(), record).await
    }

    /// Delete the record with the given row key.
    ///
    /// Returns `false` when no record with that key existed.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call.
    pub async fn delete(&self, row_key: &str) -> HandoffResult<bool> {
        self.service
            .delete(
                self.table.clone(),
                self.partition_key.clone(),
                row_key.to_string(),
            )
            .await
    }

    /// Snapshot every record in this collection's partition.
    ///
    /// Order is unspecified; insertion order is not preserved by the
    /// backing store.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call.
    pub async fn list_all(&self) -> HandoffResult<Vec<StoredRecord>> {
        self.service
            .query_partition(self.table.clone(), self.partition_key.clone())
            .await
    }
}
