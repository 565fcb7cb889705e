//! Data sources: adapters that hand the four input tables to the store.
//!
//! The reporting core only ever sees `RawTable`s; where they come from
//! (a SQLite file, a folder of CSV exports) is decided here.

pub mod csv_files;
pub mod sqlite;

pub use sqlite::SqliteSource;
