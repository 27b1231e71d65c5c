//! Row preparation
//!
//! Turns a JSON object into column/value pairs for a known table.

use kernel::id::RecordId;
use serde_json::Value;

use crate::domain::table::TableHandle;

/// One JSON object to persist
pub type Record = serde_json::Map<String, Value>;

/// A record reduced to what the table can store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRow {
    /// Upsert key, when the record carries an integer `id`
    pub id: Option<RecordId>,
    /// Data columns in record order; `None` is SQL NULL
    pub values: Vec<(String, Option<String>)>,
    /// Keys the table has no column for
    pub dropped: Vec<String>,
}

/// Filter `record` down to the columns of `table`
///
/// `created_at`/`updated_at` are managed by the database and always dropped,
/// as is an `id` that is not an integer.
pub fn prepare_row(table: &TableHandle, record: &Record) -> PreparedRow {
    let mut row = PreparedRow {
        id: None,
        values: Vec::new(),
        dropped: Vec::new(),
    };

    for (key, value) in record {
        match key.as_str() {
            "id" => match value.as_i64() {
                Some(id) => row.id = Some(RecordId::new(id)),
                None => row.dropped.push(key.clone()),
            },
            "created_at" | "updated_at" => row.dropped.push(key.clone()),
            _ if table.has_column(key) => row.values.push((key.clone(), to_column_text(value))),
            _ => row.dropped.push(key.clone()),
        }
    }

    row
}

/// Strings as-is, null as NULL, everything else as JSON text
pub fn to_column_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
