//! Table names and column inference

use std::collections::BTreeSet;
use std::fmt;

use crate::domain::row::Record;
use crate::error::{RecordsError, RecordsResult};

/// PostgreSQL truncates identifiers beyond this
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Columns every dynamic table carries; never inferred from records
pub const RESERVED_COLUMNS: [&str; 3] = ["id", "created_at", "updated_at"];

/// A validated SQL identifier: `[a-z_][a-z0-9_]{0,62}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    pub fn new(raw: impl Into<String>) -> RecordsResult<Self> {
        let raw = raw.into();
        if is_identifier(&raw) {
            Ok(Self(raw))
        } else {
            Err(RecordsError::InvalidTableName(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Double-quoted form for SQL text
    pub fn quoted(&self) -> String {
        quote_identifier(&self.0)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An existing table and the columns it actually has
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHandle {
    pub name: TableName,
    pub columns: BTreeSet<String>,
}

impl TableHandle {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }
}

/// `[a-z_][a-z0-9_]{0,62}`
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    s.len() <= MAX_IDENTIFIER_LENGTH
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Only call with strings that passed [`is_identifier`]
pub(crate) fn quote_identifier(ident: &str) -> String {
    format!("\"{}\"", ident)
}

/// Data columns for a new table, taken from the first sample record
///
/// Reserved names are skipped silently; keys that are not safe identifiers
/// are skipped with a warning.
pub fn infer_columns(table: &TableName, sample: &[Record]) -> Vec<String> {
    let Some(first) = sample.first() else {
        return Vec::new();
    };

    first
        .keys()
        .filter(|key| !RESERVED_COLUMNS.contains(&key.as_str()))
        .filter(|key| {
            let ok = is_identifier(key);
            if !ok {
                tracing::warn!(table = %table, column = %key, "Skipping key that is not a valid column name");
            }
            ok
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_table_name_valid() {
        for name in ["orders", "_tmp", "t1", "order_items_2024"] {
            assert!(TableName::new(name).is_ok(), "{name}");
        }
        assert!(TableName::new("a".repeat(63)).is_ok());
    }

    #[test]
    fn test_table_name_invalid() {
        for name in ["", "1abc", "Orders", "drop table", "a;b", "a\"b", "naïve"] {
            assert!(
                matches!(TableName::new(name), Err(RecordsError::InvalidTableName(_))),
                "{name}"
            );
        }
        assert!(TableName::new("a".repeat(64)).is_err());
    }

    #[test]
    fn test_quoted() {
        let name = TableName::new("orders").unwrap();
        assert_eq!(name.quoted(), "\"orders\"");
    }

    #[test]
    fn test_infer_columns_from_first_record_only() {
        let table = TableName::new("t").unwrap();
        let sample = vec![
            record(json!({"name": "a", "price": 1})),
            record(json!({"extra": true})),
        ];
        assert_eq!(infer_columns(&table, &sample), ["name", "price"]);
    }

    #[test]
    fn test_infer_columns_skips_reserved_and_unsafe() {
        let table = TableName::new("t").unwrap();
        let sample = vec![record(json!({
            "id": 1,
            "created_at": "x",
            "updated_at": "y",
            "Bad Key": 1,
            "ok_key": 2
        }))];
        assert_eq!(infer_columns(&table, &sample), ["ok_key"]);
    }

    #[test]
    fn test_infer_columns_empty_sample() {
        let table = TableName::new("t").unwrap();
        assert!(infer_columns(&table, &[]).is_empty());
    }
}
