//! Shared test utilities for csvstream integration tests.
//!
//! Fixture files are written under the system temp directory with a name
//! unique to the calling test and removed when the guard is dropped.

#![allow(dead_code)]

use csvstream::{CsvReader, CsvReaderConfiguration, Row};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A fixture file that is deleted on drop.
pub struct TempCsv {
    path: PathBuf,
}

impl TempCsv {
    /// Write `content` to a fresh file named after `name`.
    pub fn new(name: &str, content: &[u8]) -> Self {
        let path = std::env::temp_dir().join(format!(
            "csvstream_{}_{}.csv",
            name,
            std::process::id()
        ));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempCsv {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Read every row of `content` with the given configuration.
pub fn read_rows(content: &str, config: CsvReaderConfiguration) -> csvstream::Result<Vec<Row>> {
    CsvReader::from_string(content)
        .with_configuration(config)
        .read_all()
}

/// Build the expected named row from `(key, value)` pairs.
pub fn named(pairs: &[(&str, &str)]) -> Row {
    Row::Named(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .collect(),
    )
}
