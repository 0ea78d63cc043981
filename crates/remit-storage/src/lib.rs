//! # remit-storage
//!
//! SQLite persistence for flattened 835 remittance records.
//! Content-hash file dedup, an additively growing column set, a batched
//! insert pipeline with relaxed-durability pragmas, and the query/export
//! surface. Single writer, connection per operation.

pub mod conflict;
pub mod connection;
pub mod engine;
pub mod files;
pub mod ingest;
pub mod queries;
pub mod schema;

pub use engine::RemitStore;
pub use files::FileCheck;
pub use ingest::{generate_transaction_uid, InsertOptions, InsertReport, ProgressFn};
pub use queries::stats::Statistics;
pub use queries::QueryParams;
pub use queries::stream::{StreamItem, TransactionStream};
pub use schema::sanitize::sanitize_column_name;
pub use schema::SchemaManager;
