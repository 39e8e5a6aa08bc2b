//! # csvstream
//!
//! A streaming, quote-aware CSV reader.
//!
//! Physical lines are pulled from a file, a string or any seekable stream
//! and assembled into logical rows, including quoted fields that span
//! several lines.  The dialect (delimiter, enclosure, escape) is
//! configurable, and every field value passes through a normalization step
//! (null sentinel, transliteration into a target encoding, empty-string
//! default).
//!
//! ## Quick Start
//!
//! ```rust
//! use csvstream::CsvReader;
//!
//! let mut reader = CsvReader::from_string("id,name\n1,\"Smith, J.\"\n");
//! for row in reader.records() {
//!     let row = row?;
//!     assert_eq!(row.get_str("name"), Some("Smith, J."));
//! }
//! # Ok::<(), csvstream::error::CsvError>(())
//! ```
//!
//! ## Architecture
//!
//! - `LineSource` - Physical lines from a byte stream, decoded per line
//! - `LineTokenizer` - Splits one line on the delimiter, tracking quotes
//! - `RowAssembler` - Feeds lines to the tokenizer until a row is complete
//! - `ValueNormalizer` - Per-field post-processing
//! - `CsvReader` - Header resolution, iteration and row counting
//!
//! Rows are either positional or keyed by header name; see [`Row`].

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod io;
pub mod notification;
pub mod types;

// Re-export commonly used types
pub use error::{CsvError, Result};
pub use types::{Header, Row, Value};

// Re-export I/O types
pub use io::csv::{CsvReader, CsvReaderConfiguration, Records};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
