//! Records (Dynamic Table) Backend Module
//!
//! Persists arbitrary JSON objects into tables created on demand.
//!
//! - `domain/` - Table names, column inference, row preparation, store trait
//! - `infra/` - PostgreSQL implementation
//!
//! ## Known limitation
//! Every inferred column is `VARCHAR(256)`; non-string JSON values are stored
//! as their JSON text.

pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use domain::row::Record;
pub use domain::store::TableStore;
pub use domain::table::{TableHandle, TableName};
pub use error::{RecordsError, RecordsResult};
pub use infra::postgres::PgTableStore;
