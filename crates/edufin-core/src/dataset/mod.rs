//! Typed ingestion boundary: CSV text in, clean `PaymentRecord`s out.
//!
//! The column-mapping UI lives outside the engine; by the time data gets
//! here the caller has decided which source column backs each logical
//! field. Loading is all-or-nothing: a CSV-level failure aborts the run
//! with no partial dataset.

mod loader;
mod mapping;

pub use loader::{load_records, DatasetLoad};
pub use mapping::{normalize_header, ColumnMap};
