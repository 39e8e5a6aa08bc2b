//! Quote-aware line tokenizer.
//!
//! A [`LineTokenizer`] scans one physical line at a time and moves the
//! owned [`ParseState`] forward.  The state carries the partial field, the
//! completed fields and the in-quote flag across line boundaries, which is
//! how a quoted field spans several physical lines.

use super::value_normalizer::strip_enclosure;
use crate::error::{CsvError, Result};
use crate::io::csv::CsvReaderConfiguration;
use crate::notification::{NotificationCollection, NotificationType};

/// Accumulated state of the row being assembled.
#[derive(Debug, Clone, Default)]
pub struct ParseState {
    field: String,
    fields: Vec<String>,
    in_quote: bool,
    ends_on_delimiter: bool,
    line: usize,
    first_line: usize,
}

impl ParseState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Whether the scan position is inside a quoted field
    pub fn in_quote(&self) -> bool {
        self.in_quote
    }

    /// Whether the last tokenized line ended on a delimiter outside quotes
    pub fn ends_on_delimiter(&self) -> bool {
        self.ends_on_delimiter
    }

    /// Whether any line has been fed into this state
    pub fn is_started(&self) -> bool {
        self.first_line != 0
    }

    /// Physical line currently being scanned
    pub fn line(&self) -> usize {
        self.line
    }

    /// Physical line the row started on
    pub fn first_line(&self) -> usize {
        self.first_line
    }

    /// Completed fields so far
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    fn begin_line(&mut self, line: usize) {
        if self.first_line == 0 {
            self.first_line = line;
        }
        self.line = line;
        self.ends_on_delimiter = false;
    }

    /// Move the buffered field (minus one enclosure pair) into the row.
    fn end_field(&mut self, enclosure: char) {
        let field = std::mem::take(&mut self.field);
        self.fields.push(strip_enclosure(&field, enclosure).to_string());
    }

    /// Append an explicit empty field.
    pub fn push_empty_field(&mut self) {
        self.fields.push(String::new());
    }

    /// Close out a row the input ended in the middle of.
    ///
    /// An open quoted field loses its opening enclosure and the line break
    /// appended when its last line ended.  Missing columns are filled with
    /// empty values up to `width`.
    pub fn finish_partial(&mut self, enclosure: char, width: Option<usize>) {
        if self.in_quote {
            let mut field = std::mem::take(&mut self.field);
            if field.ends_with('\n') {
                field.pop();
            }
            let field = field.strip_prefix(enclosure).unwrap_or(&field);
            self.fields.push(field.to_string());
            self.in_quote = false;
        } else if self.ends_on_delimiter || !self.field.is_empty() {
            self.end_field(enclosure);
        }

        if let Some(width) = width {
            while self.fields.len() < width {
                self.fields.push(String::new());
            }
        }
    }

    /// Consume the state and return the completed fields
    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

/// Splits physical lines into fields according to the configured dialect.
#[derive(Debug, Clone)]
pub struct LineTokenizer {
    delimiter: char,
    enclosure: char,
    escape: char,
    strict: bool,
}

impl LineTokenizer {
    /// Create a tokenizer for the configuration's dialect
    pub fn new(config: &CsvReaderConfiguration) -> Self {
        Self {
            delimiter: config.delimiter(),
            enclosure: config.enclosure(),
            escape: config.escape(),
            strict: config.strict(),
        }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn enclosure(&self) -> char {
        self.enclosure
    }

    /// Feed one physical line (without terminator) into `state`.
    ///
    /// An enclosure opens a quoted field at the start of the line or right
    /// after a delimiter, and closes it when followed by a delimiter or the
    /// end of the line.  An enclosure preceded by the escape character never
    /// toggles.  A line that ends inside quotes appends a `\n` to the field
    /// and the field continues on the next line.
    pub fn tokenize(
        &self,
        line: &str,
        line_number: usize,
        state: &mut ParseState,
        notifications: &mut NotificationCollection,
    ) -> Result<()> {
        state.begin_line(line_number);

        let chars: Vec<char> = line.chars().collect();
        for (i, &c) in chars.iter().enumerate() {
            let prev = if i > 0 { Some(chars[i - 1]) } else { None };
            let next = chars.get(i + 1).copied();

            state.field.push(c);

            if c == self.enclosure {
                if state.in_quote {
                    if prev != Some(self.escape) {
                        if next.is_none() || next == Some(self.delimiter) {
                            state.in_quote = false;
                        } else if self.strict {
                            return Err(CsvError::UnterminatedQuote {
                                line: line_number,
                                column: i + 1,
                            });
                        } else {
                            notifications.notify(
                                NotificationType::AmbiguousEnclosure,
                                line_number,
                                format!("enclosure at column {} kept as literal", i + 1),
                            );
                        }
                    }
                } else if i == 0 || prev == Some(self.delimiter) {
                    state.in_quote = true;
                }
            } else if c == self.delimiter && !state.in_quote {
                state.field.pop();
                state.end_field(self.enclosure);
            }
        }

        if state.in_quote {
            if self.strict {
                return Err(CsvError::UnterminatedQuote {
                    line: line_number,
                    column: chars.len() + 1,
                });
            }
            notifications.notify(
                NotificationType::EmbeddedNewline,
                line_number,
                "quoted field continues on the next line",
            );
            state.field.push('\n');
        } else if chars.last() == Some(&self.delimiter) {
            state.ends_on_delimiter = true;
        } else if !chars.is_empty() {
            state.end_field(self.enclosure);
        }

        Ok(())
    }
}
