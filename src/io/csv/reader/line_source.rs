//! Physical line sources

use crate::error::Result;
use crate::io::csv::encoding::decode_line;
use encoding_rs::{Encoding, UTF_8};
use std::io::{BufRead, Seek, SeekFrom};

/// Trait for reading physical lines from a byte stream
pub trait LineSource {
    /// Read the next physical line without its terminator (`\n` or `\r\n`).
    ///
    /// Returns `None` once the source is exhausted.
    fn read_line(&mut self) -> Result<Option<String>>;

    /// 1-based number of the line last returned by [`Self::read_line`]
    fn line_number(&self) -> usize;

    /// Check whether another line is available without consuming it
    fn is_exhausted(&mut self) -> Result<bool>;

    /// Reset the source to the beginning
    fn reset(&mut self) -> Result<()>;

    /// Set the encoding used to decode subsequent lines
    fn set_encoding(&mut self, encoding: &'static Encoding);
}

/// Line source over any buffered, seekable byte stream.
///
/// Each line is decoded with the configured encoding; malformed byte
/// sequences are replaced rather than reported.
pub struct TextLineSource<R: BufRead + Seek> {
    reader: R,
    line_number: usize,
    encoding: &'static Encoding,
    buffer: Vec<u8>,
}

impl<R: BufRead + Seek> TextLineSource<R> {
    /// Create a new line source decoding UTF-8
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            encoding: UTF_8,
            buffer: Vec::new(),
        }
    }

    /// Consume the source and return the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead + Seek> LineSource for TextLineSource<R> {
    fn read_line(&mut self) -> Result<Option<String>> {
        self.buffer.clear();
        if self.reader.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(None);
        }

        if self.buffer.last() == Some(&b'\n') {
            self.buffer.pop();
            if self.buffer.last() == Some(&b'\r') {
                self.buffer.pop();
            }
        }

        let first_line = self.line_number == 0;
        self.line_number += 1;

        let (line, bom) = decode_line(&self.buffer, self.encoding, first_line);
        if bom {
            log::debug!("stripped UTF-8 byte order mark");
        }
        Ok(Some(line))
    }

    fn line_number(&self) -> usize {
        self.line_number
    }

    fn is_exhausted(&mut self) -> Result<bool> {
        Ok(self.reader.fill_buf()?.is_empty())
    }

    fn reset(&mut self) -> Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.line_number = 0;
        Ok(())
    }

    fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = encoding;
    }
}
