//! CSV file reader

mod line_source;
mod row_assembler;
mod tokenizer;
mod value_normalizer;

pub use line_source::{LineSource, TextLineSource};
pub use row_assembler::{RawRow, RowAssembler};
pub use tokenizer::{LineTokenizer, ParseState};
pub use value_normalizer::{strip_enclosure, ValueNormalizer, NULL_SENTINEL};

use super::CsvReaderConfiguration;
use crate::error::{CsvError, Result};
use crate::notification::NotificationCollection;
use crate::types::{Header, Row};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// Streaming CSV reader.
///
/// The reader pulls physical lines from its source on demand, resolves the
/// header once, and yields one [`Row`] per logical record.  A pass ends at
/// end of input or at the first error; [`CsvReader::rewind`] starts a new
/// one.
///
/// Files opened by the reader are closed when the source is replaced or the
/// reader is dropped.  A stream handed in by the caller may be borrowed
/// (`&mut File`), in which case it stays open once the reader is gone.
pub struct CsvReader<'s> {
    source: Option<Box<dyn LineSource + 's>>,
    config: CsvReaderConfiguration,
    assembler: RowAssembler,
    normalizer: ValueNormalizer,
    header: Option<Header>,
    header_resolved: bool,
    expected_columns: Option<usize>,
    halted: bool,
    rewind_pending: bool,
    record_count: Option<usize>,
    notifications: NotificationCollection,
}

impl Default for CsvReader<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'s> CsvReader<'s> {
    /// Create a reader with the default configuration and no source
    pub fn new() -> Self {
        let config = CsvReaderConfiguration::default();
        Self {
            source: None,
            assembler: RowAssembler::new(&config),
            normalizer: ValueNormalizer::new(&config),
            config,
            header: None,
            header_resolved: false,
            expected_columns: None,
            halted: false,
            rewind_pending: false,
            record_count: None,
            notifications: NotificationCollection::new(),
        }
    }

    /// Create a reader over a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = Self::new();
        reader.set_path(path)?;
        Ok(reader)
    }

    /// Create a reader over in-memory text
    pub fn from_string(content: impl Into<String>) -> Self {
        let mut reader = Self::new();
        reader.set_string(content);
        reader
    }

    /// Create a reader over any seekable byte stream
    pub fn from_reader<R: Read + Seek + 's>(reader: R) -> Self {
        let mut csv_reader = Self::new();
        csv_reader.set_reader(reader);
        csv_reader
    }

    /// Set the reader configuration.
    pub fn with_configuration(mut self, config: CsvReaderConfiguration) -> Self {
        self.set_configuration(config);
        self
    }

    /// Replace the configuration.  The current pass is abandoned and the
    /// cached header and row count are discarded.
    pub fn set_configuration(&mut self, config: CsvReaderConfiguration) {
        self.assembler = RowAssembler::new(&config);
        self.normalizer = ValueNormalizer::new(&config);
        if let Some(source) = self.source.as_deref_mut() {
            source.set_encoding(config.source_encoding());
            self.rewind_pending = true;
        }
        self.config = config;
        self.record_count = None;
        self.start_pass();
    }

    /// Current configuration
    pub fn configuration(&self) -> &CsvReaderConfiguration {
        &self.config
    }

    /// Read from the file at `path`
    pub fn set_path<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path)?;
        log::debug!("reading CSV from {}", path.display());
        self.set_source(Box::new(TextLineSource::new(BufReader::new(file))));
        Ok(())
    }

    /// Read from in-memory text
    pub fn set_string(&mut self, content: impl Into<String>) {
        let bytes = content.into().into_bytes();
        log::debug!("reading CSV from {} bytes of text", bytes.len());
        self.set_source(Box::new(TextLineSource::new(Cursor::new(bytes))));
    }

    /// Read from any seekable byte stream
    pub fn set_reader<R: Read + Seek + 's>(&mut self, reader: R) {
        self.set_source(Box::new(TextLineSource::new(BufReader::new(reader))));
    }

    /// Read from a custom line source
    pub fn set_source(&mut self, mut source: Box<dyn LineSource + 's>) {
        source.set_encoding(self.config.source_encoding());
        self.source = Some(source);
        self.rewind_pending = false;
        self.record_count = None;
        self.start_pass();
    }

    /// Seek the source back to its start and discard the cached header.
    pub fn rewind(&mut self) -> Result<()> {
        self.source_mut()?.reset()?;
        self.rewind_pending = false;
        self.start_pass();
        Ok(())
    }

    fn start_pass(&mut self) {
        self.header = None;
        self.header_resolved = false;
        self.expected_columns = None;
        self.halted = false;
        self.notifications.clear();
    }

    fn source_mut(&mut self) -> Result<&mut dyn LineSource> {
        let source = self.source.as_deref_mut().ok_or(CsvError::SourceNotSet)?;
        Ok(source)
    }

    /// Recoveries made so far in the current pass
    pub fn notifications(&self) -> &NotificationCollection {
        &self.notifications
    }

    /// Resolve the header once per pass.
    fn resolve_header(&mut self) -> Result<()> {
        if self.header_resolved {
            return Ok(());
        }
        if self.rewind_pending {
            self.source_mut()?.reset()?;
            self.rewind_pending = false;
        }
        if !self.config.has_header() {
            self.header_resolved = true;
            return Ok(());
        }

        let source = self.source.as_deref_mut().ok_or(CsvError::SourceNotSet)?;
        let raw = self.assembler.next_row(source, None, &mut self.notifications)?;
        self.header_resolved = true;

        if let Some(raw) = raw {
            self.expected_columns = Some(raw.fields.len());
            let names = raw
                .fields
                .into_iter()
                .map(|name| self.normalizer.normalize_name(name))
                .collect();
            let header = Header::new(names, self.config.lower_case_header());
            log::debug!("resolved header with {} columns: {}", header.len(), header);
            self.header = Some(header);
        } else {
            log::debug!("source is empty, no header");
        }
        Ok(())
    }

    /// The column header, read on first access.
    ///
    /// Returns `None` when the reader is configured without a header or the
    /// source is empty.
    pub fn header(&mut self) -> Result<Option<&Header>> {
        self.resolve_header()?;
        Ok(self.header.as_ref())
    }

    /// Read the next row of the current pass.
    ///
    /// Returns `Ok(None)` at end of input.  After an error the pass is over
    /// and this keeps returning `Ok(None)` until the source is rewound or
    /// replaced.
    pub fn next_record(&mut self) -> Result<Option<Row>> {
        if self.halted {
            return Ok(None);
        }
        let result = self.read_record();
        if !matches!(result, Ok(Some(_))) {
            self.halted = true;
        }
        result
    }

    fn read_record(&mut self) -> Result<Option<Row>> {
        self.resolve_header()?;

        let source = self.source.as_deref_mut().ok_or(CsvError::SourceNotSet)?;
        let raw = match self
            .assembler
            .next_row(source, self.expected_columns, &mut self.notifications)?
        {
            Some(raw) => raw,
            None => return Ok(None),
        };

        if self.expected_columns.is_none() {
            self.expected_columns = Some(raw.fields.len());
        }

        let values = raw
            .fields
            .into_iter()
            .map(|field| self.normalizer.normalize(field))
            .collect();

        match &self.header {
            Some(header) => Row::from_header(header, values).map(Some),
            None => Ok(Some(Row::Positional(values))),
        }
    }

    /// Iterate over the remaining rows of the current pass
    pub fn records(&mut self) -> Records<'_, 's> {
        Records { reader: self }
    }

    /// Read every remaining row.  The first error aborts the read and is
    /// returned; rows read before it are discarded.
    pub fn read_all(&mut self) -> Result<Vec<Row>> {
        self.records().collect()
    }

    /// Number of rows in the source.
    ///
    /// Computed once with a full pass from the start and cached until the
    /// source or configuration is replaced.  The source is left rewound.
    pub fn count(&mut self) -> Result<usize> {
        if let Some(count) = self.record_count {
            return Ok(count);
        }

        self.rewind()?;
        let mut count = 0;
        let outcome = loop {
            match self.next_record() {
                Ok(Some(_)) => count += 1,
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            }
        };
        self.rewind()?;
        outcome?;

        log::debug!("counted {} rows", count);
        self.record_count = Some(count);
        Ok(count)
    }
}

/// Lazy sequence of rows produced by [`CsvReader::records`]
pub struct Records<'r, 's> {
    reader: &'r mut CsvReader<'s>,
}

impl Iterator for Records<'_, '_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_record().transpose()
    }
}

impl std::iter::FusedIterator for Records<'_, '_> {}
