//! Assembles logical rows from physical lines

use super::line_source::LineSource;
use super::tokenizer::{LineTokenizer, ParseState};
use crate::error::{CsvError, Result};
use crate::io::csv::CsvReaderConfiguration;
use crate::notification::{NotificationCollection, NotificationType};

/// Raw fields of one logical row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// Field texts, enclosures stripped, not yet normalized
    pub fields: Vec<String>,
    /// Physical line the row starts on
    pub line: usize,
}

/// Drives the [`LineTokenizer`] across as many physical lines as a row
/// needs.
#[derive(Debug, Clone)]
pub struct RowAssembler {
    tokenizer: LineTokenizer,
    strict: bool,
}

impl RowAssembler {
    /// Create an assembler for the configuration's dialect
    pub fn new(config: &CsvReaderConfiguration) -> Self {
        Self {
            tokenizer: LineTokenizer::new(config),
            strict: config.strict(),
        }
    }

    /// Strip trailing whitespace, keeping a trailing delimiter (which may
    /// itself be whitespace, e.g. a tab).
    fn trim_line<'a>(&self, line: &'a str) -> &'a str {
        let delimiter = self.tokenizer.delimiter();
        line.trim_end_matches(|c: char| c.is_whitespace() && c != delimiter)
    }

    /// Read the next row.
    ///
    /// With `expected == None` the row is complete at the first line end
    /// outside quotes, and its field count becomes the expected width of
    /// the rows that follow.  Otherwise lines are pulled until exactly
    /// `expected` fields are complete.  Returns `Ok(None)` when the source
    /// is exhausted before a row starts.
    pub fn next_row(
        &self,
        source: &mut dyn LineSource,
        expected: Option<usize>,
        notifications: &mut NotificationCollection,
    ) -> Result<Option<RawRow>> {
        let mut state = ParseState::new();

        while let Some(raw_line) = source.read_line()? {
            let line = self.trim_line(&raw_line);
            if line.is_empty() && !state.in_quote() {
                continue;
            }

            let line_number = source.line_number();
            self.tokenizer.tokenize(line, line_number, &mut state, notifications)?;

            if state.in_quote() {
                continue;
            }

            let count = state.field_count();
            match expected {
                None => return Ok(Some(Self::complete(state))),
                Some(expected) if count == expected => return Ok(Some(Self::complete(state))),
                Some(expected) if count > expected => {
                    return Err(CsvError::MalformedRow {
                        line: line_number,
                        count,
                        expected,
                    });
                }
                Some(expected) => {
                    if Self::has_trailing_empty_field(&state, expected) && source.is_exhausted()? {
                        state.push_empty_field();
                        return Ok(Some(Self::complete(state)));
                    }
                }
            }
        }

        if !state.is_started() {
            return Ok(None);
        }
        // only blank lines followed the delimiter
        if let Some(expected) = expected {
            if Self::has_trailing_empty_field(&state, expected) {
                state.push_empty_field();
                return Ok(Some(Self::complete(state)));
            }
        }
        self.finish_truncated(state, expected, source.line_number(), notifications)
            .map(Some)
    }

    /// A line ending on the delimiter one column short, at end of input,
    /// carries an explicit empty last field.
    fn has_trailing_empty_field(state: &ParseState, expected: usize) -> bool {
        !state.in_quote() && state.ends_on_delimiter() && state.field_count() + 1 == expected
    }

    fn complete(state: ParseState) -> RawRow {
        let line = state.first_line();
        let fields = state.into_fields();
        log::trace!("row at line {}: {} fields", line, fields.len());
        RawRow { fields, line }
    }

    /// Input ended mid-row: an error in strict mode, otherwise the partial
    /// row is padded to the expected width and emitted.  A partial row wider
    /// than expected is `MalformedRow`.
    fn finish_truncated(
        &self,
        mut state: ParseState,
        expected: Option<usize>,
        last_line: usize,
        notifications: &mut NotificationCollection,
    ) -> Result<RawRow> {
        let found = state.field_count();
        if self.strict {
            return Err(CsvError::TruncatedRow {
                line: last_line,
                expected: expected.unwrap_or(found),
                found,
            });
        }

        state.finish_partial(self.tokenizer.enclosure(), expected);
        if let Some(expected) = expected {
            let count = state.field_count();
            if count > expected {
                return Err(CsvError::MalformedRow {
                    line: last_line,
                    count,
                    expected,
                });
            }
        }

        notifications.notify(
            NotificationType::TruncatedRow,
            last_line,
            format!(
                "input ended inside a row starting at line {} ({} complete fields)",
                state.first_line(),
                found
            ),
        );
        Ok(Self::complete(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::csv::TextLineSource;
    use std::io::{BufReader, Cursor};

    fn source(data: &str) -> TextLineSource<BufReader<Cursor<Vec<u8>>>> {
        TextLineSource::new(BufReader::new(Cursor::new(data.as_bytes().to_vec())))
    }

    fn lenient() -> RowAssembler {
        RowAssembler::new(&CsvReaderConfiguration::default())
    }

    fn strict() -> RowAssembler {
        RowAssembler::new(&CsvReaderConfiguration::default().with_strict(true))
    }

    #[test]
    fn test_header_establishes_width() {
        let mut src = source("a,b,c\n1,2,3\n");
        let mut notes = NotificationCollection::new();
        let asm = lenient();

        let header = asm.next_row(&mut src, None, &mut notes).unwrap().unwrap();
        assert_eq!(header.fields, vec!["a", "b", "c"]);
        assert_eq!(header.line, 1);

        let row = asm.next_row(&mut src, Some(3), &mut notes).unwrap().unwrap();
        assert_eq!(row.fields, vec!["1", "2", "3"]);
        assert_eq!(row.line, 2);

        assert_eq!(asm.next_row(&mut src, Some(3), &mut notes).unwrap(), None);
    }

    #[test]
    fn test_multi_line_row() {
        let mut src = source("test1,test2,\"te\nst\n34\",test4\nx,y,z,w\n");
        let mut notes = NotificationCollection::new();
        let asm = lenient();

        let row = asm.next_row(&mut src, Some(4), &mut notes).unwrap().unwrap();
        assert_eq!(row.fields, vec!["test1", "test2", "te\nst\n34", "test4"]);
        assert_eq!(row.line, 1);

        let row = asm.next_row(&mut src, Some(4), &mut notes).unwrap().unwrap();
        assert_eq!(row.line, 4);
    }

    #[test]
    fn test_overflow_is_malformed() {
        let mut src = source("a,b\n1,2\n1,2,3\n4,5\n");
        let mut notes = NotificationCollection::new();
        let asm = lenient();

        asm.next_row(&mut src, None, &mut notes).unwrap();
        asm.next_row(&mut src, Some(2), &mut notes).unwrap();
        let err = asm.next_row(&mut src, Some(2), &mut notes).unwrap_err();
        assert!(matches!(
            err,
            CsvError::MalformedRow {
                line: 3,
                count: 3,
                expected: 2
            }
        ));
    }

    #[test]
    fn test_trailing_delimiter_at_end_of_input() {
        let mut src = source("t1,t2,\"0,0\",\n");
        let mut notes = NotificationCollection::new();
        let row = lenient().next_row(&mut src, Some(4), &mut notes).unwrap().unwrap();
        assert_eq!(row.fields, vec!["t1", "t2", "0,0", ""]);
        assert!(notes.is_empty());
    }

    #[test]
    fn test_short_lines_are_joined() {
        let mut src = source("a,b\nc,d\n");
        let mut notes = NotificationCollection::new();
        let row = lenient().next_row(&mut src, Some(4), &mut notes).unwrap().unwrap();
        assert_eq!(row.fields, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_blank_lines_between_rows_are_skipped() {
        let mut src = source("\n\n1,2\n\n");
        let mut notes = NotificationCollection::new();
        let asm = lenient();
        let row = asm.next_row(&mut src, Some(2), &mut notes).unwrap().unwrap();
        assert_eq!(row.fields, vec!["1", "2"]);
        assert_eq!(row.line, 3);
        assert_eq!(asm.next_row(&mut src, Some(2), &mut notes).unwrap(), None);
    }

    #[test]
    fn test_tab_delimiter_survives_trimming() {
        let config = CsvReaderConfiguration::default().with_delimiter("\t").unwrap();
        let mut src = source("a\tb\t\n");
        let mut notes = NotificationCollection::new();
        let row = RowAssembler::new(&config)
            .next_row(&mut src, Some(3), &mut notes)
            .unwrap()
            .unwrap();
        assert_eq!(row.fields, vec!["a", "b", ""]);
    }

    #[test]
    fn test_truncated_row_is_padded_when_lenient() {
        let mut src = source("1,\"open\nstill open");
        let mut notes = NotificationCollection::new();
        let row = lenient().next_row(&mut src, Some(3), &mut notes).unwrap().unwrap();
        assert_eq!(row.fields, vec!["1", "open\nstill open", ""]);
        assert!(notes.has_type(NotificationType::TruncatedRow));
    }

    #[test]
    fn test_truncated_row_is_error_when_strict() {
        let mut src = source("1,2\n");
        let mut notes = NotificationCollection::new();
        let err = strict().next_row(&mut src, Some(3), &mut notes).unwrap_err();
        assert!(matches!(
            err,
            CsvError::TruncatedRow {
                line: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_open_quote_past_expected_width_is_malformed() {
        let mut src = source("1,2,3,\"x");
        let mut notes = NotificationCollection::new();
        let err = lenient().next_row(&mut src, Some(2), &mut notes).unwrap_err();
        assert!(matches!(
            err,
            CsvError::MalformedRow {
                line: 1,
                count: 4,
                expected: 2
            }
        ));
        assert!(!notes.has_type(NotificationType::TruncatedRow));
    }

    #[test]
    fn test_trailing_delimiter_before_blank_lines() {
        let mut src = source("t1,t2,\"0,0\",\n\n   \n");
        let mut notes = NotificationCollection::new();
        let asm = strict();
        let row = asm.next_row(&mut src, Some(4), &mut notes).unwrap().unwrap();
        assert_eq!(row.fields, vec!["t1", "t2", "0,0", ""]);
        assert_eq!(row.line, 1);
        assert!(notes.is_empty());
        assert_eq!(asm.next_row(&mut src, Some(4), &mut notes).unwrap(), None);

        let mut src = source("t1,t2,\"0,0\",\n\n");
        let row = lenient().next_row(&mut src, Some(4), &mut notes).unwrap().unwrap();
        assert_eq!(row.fields, vec!["t1", "t2", "0,0", ""]);
        assert!(notes.is_empty());
    }

    #[test]
    fn test_blank_line_inside_row_keeps_joining() {
        let mut src = source("a,b\n\nc,d\n");
        let mut notes = NotificationCollection::new();
        let row = lenient().next_row(&mut src, Some(4), &mut notes).unwrap().unwrap();
        assert_eq!(row.fields, vec!["a", "b", "c", "d"]);
        assert_eq!(row.line, 1);
    }

    #[test]
    fn test_empty_source() {
        let mut src = source("");
        let mut notes = NotificationCollection::new();
        assert_eq!(lenient().next_row(&mut src, None, &mut notes).unwrap(), None);
    }
}
