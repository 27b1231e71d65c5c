//! Table store trait

use crate::domain::row::Record;
use crate::domain::table::{TableHandle, TableName};
use crate::error::RecordsResult;

/// Dynamic-table persistence
#[trait_variant::make(TableStore: Send)]
pub trait LocalTableStore {
    /// Create `name` if absent, with one string column per key of the first
    /// sample record, and return the columns the table actually has
    async fn ensure_table(&self, name: &TableName, sample: &[Record]) -> RecordsResult<TableHandle>;

    /// Write every record in one transaction; returns the rows written
    ///
    /// Records with an integer `id` upsert on it, the rest insert. Any failure
    /// rolls back the whole batch.
    async fn bulk_upsert(&self, table: &TableHandle, records: &[Record]) -> RecordsResult<u64>;
}
