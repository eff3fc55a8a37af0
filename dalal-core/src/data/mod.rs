//! Price data loading and indicator export.

pub mod ingest;

pub use ingest::{load_csv, parse_csv, write_indicators, LoadError};
