//! Line-by-line reading with decode errors mapped to [`ParseError`].

use std::io::{self, BufRead};

use solar_tabulate_core::ParseError;

/// Reads a stream one line at a time, tracking the 1-based line number.
pub(crate) struct LineSource<R> {
    reader: R,
    line_number: usize,
    buf: String,
}

impl<R: BufRead> LineSource<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buf: String::new(),
        }
    }

    /// Next line without its terminator, or `None` at end of stream.
    pub(crate) fn next_line(&mut self) -> Result<Option<&str>, ParseError> {
        self.buf.clear();
        let read = self.reader.read_line(&mut self.buf).map_err(unreadable)?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        let line = self.buf.strip_suffix('\n').unwrap_or(&self.buf);
        Ok(Some(line.strip_suffix('\r').unwrap_or(line)))
    }

    /// Number of the line most recently returned by [`next_line`](Self::next_line).
    pub(crate) fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads and discards the rest of the stream, ignoring errors.
    pub(crate) fn drain(&mut self) {
        while let Ok(Some(_)) = self.next_line() {}
    }
}

fn unreadable(err: io::Error) -> ParseError {
    ParseError::UnreadableFile(err.to_string())
}
