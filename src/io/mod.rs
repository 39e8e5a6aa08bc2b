//! I/O module for reading CSV sources

pub mod csv;

pub use csv::{CsvReader, CsvReaderConfiguration};
