//! hbm-db - Database abstraction layer for hbm
//!
//! This crate provides the blocking `Database` trait, the `with_transaction`
//! scope helper, and the DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;
pub mod value;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{with_transaction, Database};
pub use value::{Row, SqlValue};
