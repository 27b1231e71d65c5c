//! Domain Layer

pub mod row;
pub mod store;
pub mod table;
