//! Physical storage: the table service seam and per-collection stores.

pub mod collection;
pub mod table;

pub use collection::CollectionStore;
pub use table::{SqliteTableService, StoredRecord, TableFuture, TableService};
