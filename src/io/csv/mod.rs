//! CSV (comma-separated values) reading

mod configuration;
pub mod encoding;
mod reader;

pub use configuration::{CsvReaderConfiguration, DEFAULT_DELIMITER, DEFAULT_ENCLOSURE, DEFAULT_ESCAPE};
pub use reader::{
    strip_enclosure, CsvReader, LineSource, LineTokenizer, ParseState, RawRow, Records, RowAssembler,
    TextLineSource, ValueNormalizer, NULL_SENTINEL,
};
