//! Partitioned key-value table service seam and its `SQLite` backend.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tokio_rusqlite::Connection;

use crate::core::config::StoreConfig;
use crate::core::errors::HandoffResult;

/// Boxed future type for table service operations.
pub type TableFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The only physical shape written to the backing store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Logical collection discriminator.
    pub partition_key: String,
    /// Derived record identity within the partition.
    pub row_key: String,
    /// Opaque serialized record body.
    pub body: String,
}

/// Minimal contract of the partitioned table service backing the store.
///
/// Calls are remote from the caller's perspective; completion is observable
/// only once the returned future resolves. No retry or timeout policy is
/// applied at this layer.
pub trait TableService: Send + Sync {
    /// Create a physical table if it does not already exist.
    ///
    /// Creation is idempotent; an already-existing table is not an error.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call.
    fn create_table_if_absent(&self, table: String) -> TableFuture<'_, HandoffResult<()>>;

    /// Insert a record unless its `(partition_key, row_key)` already exists.
    ///
    /// Returns `false` without modifying the table when the key is taken.
    /// The insert-if-absent decision is atomic within the backing store;
    /// concurrent writers cannot both succeed for the same key.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call.
    fn insert_if_absent(
        &self,
        table: String,
        record: StoredRecord,
    ) -> TableFuture<'_, HandoffResult<bool>>;

    /// Delete the record with the given key.
    ///
    /// Returns `false` when no record with that key existed.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call.
    fn delete(
        &self,
        table: String,
        partition_key: String,
        row_key: String,
    ) -> TableFuture<'_, HandoffResult<bool>>;

    /// Snapshot every record whose partition key matches.
    ///
    /// The sequence is finite, taken at call time, and unordered.
    ///
    /// # Errors
    /// Returns an error if the backing service rejects the call.
    fn query_partition(
        &self,
        table: String,
        partition_key: String,
    ) -> TableFuture<'_, HandoffResult<Vec<StoredRecord>>>;
}

/// `SQLite` implementation of the table service.
///
/// Each collection is one physical table with a composite
/// `(partition_key, row_key)` primary key; `INSERT OR IGNORE` provides the
/// atomic insert-if-absent the concurrency model delegates to the backing
/// store.
pub struct SqliteTableService {
    conn: Connection,
}

impl SqliteTableService {
    /// Open the backing database named by the configured connection string.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened.
    pub async fn connect(config: &StoreConfig) -> HandoffResult<Self> {
        let conn = Connection::open(&config.connection_string).await?;
        Ok(Self { conn })
    }
}

impl TableService for SqliteTableService {
    fn create_table_if_absent(&self, table: String) -> TableFuture<'_, HandoffResult<()>> {
        Box::pin(async move {
            self.conn
                .call(move |conn| {
                    conn.execute_batch(&format!(
                        "CREATE TABLE IF NOT EXISTS {table} (
                            partition_key TEXT NOT NULL,
                            row_key TEXT NOT NULL,
                            body TEXT NOT NULL,
                            PRIMARY KEY (partition_key, row_key)
                        )"
                    ))?;
                    Ok(())
                })
                .await?;
            Ok(())
        })
    }

    fn insert_if_absent(
        &self,
        table: String,
        record: StoredRecord,
    ) -> TableFuture<'_, HandoffResult<bool>> {
        Box::pin(async move {
            let inserted = self
                .conn
                .call(move |conn| {
                    let changed = conn.execute(
                        &format!(
                            "INSERT OR IGNORE INTO {table} (partition_key, row_key, body)
                             VALUES (?1, ?2, ?3)"
                        ),
                        rusqlite::params![record.partition_key, record.row_key, record.body],
                    )?;
                    Ok(changed > 0)
                })
                .await?;
            Ok(inserted)
        })
    }

    fn delete(
        &self,
        table: String,
        partition_key: String,
        row_key: String,
    ) -> TableFuture<'_, HandoffResult<bool>> {
        Box::pin(async move {
            let removed = self
                .conn
                .call(move |conn| {
                    let changed = conn.execute(
                        &format!(
                            "DELETE FROM {table} WHERE partition_key = ?1 AND row_key = ?2"
                        ),
                        rusqlite::params![partition_key, row_key],
                    )?;
                    Ok(changed > 0)
                })
                .await?;
            Ok(removed)
        })
    }

    fn query_partition(
        &self,
        table: String,
        partition_key: String,
    ) -> TableFuture<'_, HandoffResult<Vec<StoredRecord>>> {
        Box::pin(async move {
            let records = self
                .conn
                .call(move |conn| {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT partition_key, row_key, body FROM {table}
                         WHERE partition_key = ?1"
                    ))?;
                    let rows = stmt
                        .query_map(rusqlite::params![partition_key], |row| {
                            Ok(StoredRecord {
                                partition_key: row.get(0)?,
                                row_key: row.get(1)?,
                                body: row.get(2)?,
                            })
                        })?
                        .collect::<Result<Vec<_>, rusqlite::Error>>()?;
                    Ok(rows)
                })
                .await?;
            Ok(records)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::HandoffStoreError;

    async fn memory_service() -> SqliteTableService {
        let config = StoreConfig::with_connection_string(":memory:");
        SqliteTableService::connect(&config).await.unwrap()
    }

    fn record(partition: &str, row: &str, body: &str) -> StoredRecord {
        StoredRecord {
            partition_key: partition.to_string(),
            row_key: row.to_string(),
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn table_creation_is_idempotent() {
        let service = memory_service().await;
        service
            .create_table_if_absent("records".to_string())
            .await
            .unwrap();
        service
            .create_table_if_absent("records".to_string())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn insert_is_atomic_if_absent() {
        let service = memory_service().await;
        service
            .create_table_if_absent("records".to_string())
            .await
            .unwrap();

        let first = service
            .insert_if_absent("records".to_string(), record("p", "k", "one"))
            .await
            .unwrap();
        let second = service
            .insert_if_absent("records".to_string(), record("p", "k", "two"))
            .await
            .unwrap();
        assert!(first);
        assert!(!second);

        let rows = service
            .query_partition("records".to_string(), "p".to_string())
            .await
            .unwrap();
        assert_eq!(rows, vec![record("p", "k", "one")]);
    }

    #[tokio::test]
    async fn delete_reports_absence_without_error() {
        let service = memory_service().await;
        service
            .create_table_if_absent("records".to_string())
            .await
            .unwrap();

        let removed = service
            .delete("records".to_string(), "p".to_string(), "k".to_string())
            .await
            .unwrap();
        assert!(!removed);

        service
            .insert_if_absent("records".to_string(), record("p", "k", "one"))
            .await
            .unwrap();
        let removed = service
            .delete("records".to_string(), "p".to_string(), "k".to_string())
            .await
            .unwrap();
        assert!(removed);
    }

    #[tokio::test]
    async fn query_filters_on_partition_key() {
        let service = memory_service().await;
        service
            .create_table_if_absent("records".to_string())
            .await
            .unwrap();

        service
            .insert_if_absent("records".to_string(), record("p1", "k", "one"))
            .await
            .unwrap();
        service
            .insert_if_absent("records".to_string(), record("p2", "k", "two"))
            .await
            .unwrap();

        let rows = service
            .query_partition("records".to_string(), "p1".to_string())
            .await
            .unwrap();
        assert_eq!(rows, vec![record("p1", "k", "one")]);
    }

    #[tokio::test]
    async fn missing_table_surfaces_as_unavailable() {
        let service = memory_service().await;
        let err = service
            .query_partition("missing".to_string(), "p".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, HandoffStoreError::Unavailable(_)));
    }
}
