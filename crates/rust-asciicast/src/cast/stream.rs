//! Streaming v2 reader.
//!
//! v2 recordings are line oriented, so they can be decoded one record at a
//! time without holding the document in memory. The rules and error line
//! numbers match [`parse`](super::parser::parse).

use std::io::{BufRead, Lines};

use serde_json::Value;

use super::detect::has_version;
use super::model::{CastEvent, CastFormat, CastHeader, ParsedCast};
use super::parser::{decode_v2_event, decode_v2_header};
use crate::error::{CastError, Result};

/// Incremental reader over a v2 recording.
///
/// The header is read eagerly by [`V2Reader::new`]; events are decoded as
/// the iterator is advanced. The iterator ends after the first error.
#[derive(Debug)]
pub struct V2Reader<R> {
    lines: Lines<R>,
    header: CastHeader,
    line_no: usize,
    failed: bool,
}

impl<R: BufRead> V2Reader<R> {
    /// Read the header line and prepare to stream events.
    ///
    /// Fails with [`CastError::InvalidFormat`] when the first non-blank line
    /// is not a v2 header.
    pub fn new(reader: R) -> Result<Self> {
        let mut lines = reader.lines();
        let mut line_no = 0;

        let header_line = loop {
            let Some(line) = lines.next() else {
                return Err(CastError::InvalidFormat);
            };
            line_no += 1;
            let line = line.map_err(|e| CastError::io_context("reading cast header line", e))?;
            if !line.trim().is_empty() {
                break line;
            }
        };

        let is_v2 = serde_json::from_str::<Value>(header_line.trim())
            .is_ok_and(|v| v.is_object() && has_version(&v, 2));
        if !is_v2 {
            return Err(CastError::InvalidFormat);
        }

        Ok(Self {
            header: decode_v2_header(&header_line, line_no)?,
            lines,
            line_no,
            failed: false,
        })
    }

    /// The decoded header.
    #[must_use]
    pub const fn header(&self) -> &CastHeader {
        &self.header
    }

    /// Line number of the last line consumed.
    #[must_use]
    pub const fn line_no(&self) -> usize {
        self.line_no
    }

    /// Drain the remaining events into a [`ParsedCast`].
    ///
    /// A recording with no event lines is a structural error, as it is for
    /// the in-memory parser.
    pub fn into_cast(mut self) -> Result<ParsedCast> {
        let mut events = Vec::new();
        for event in self.by_ref() {
            events.push(event?);
        }
        if events.is_empty() {
            return Err(CastError::parse(CastFormat::V2, "expected at least 2 lines"));
        }
        Ok(ParsedCast::new(self.header, events, CastFormat::V2))
    }
}

impl<R: BufRead> Iterator for V2Reader<R> {
    type Item = Result<CastEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(CastError::io_context("reading cast event line", e)));
                }
            };
            self.line_no += 1;
            match decode_v2_event(&line, self.line_no) {
                Ok(Some(event)) => return Some(Ok(event)),
                Ok(None) => {}
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Read a whole v2 recording from `reader`.
pub fn read_v2<R: BufRead>(reader: R) -> Result<ParsedCast> {
    V2Reader::new(reader)?.into_cast()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cast::parser::parse;

    const CAST: &str = "{\"version\": 2, \"width\": 90}\n[0.1, \"o\", \"a\"]\n\n[0.2, \"i\", \"b\"]\n";

    #[test]
    fn matches_in_memory_parser() {
        let streamed = read_v2(CAST.as_bytes()).unwrap();
        let parsed = parse(CAST).unwrap();
        assert_eq!(streamed, parsed);
    }

    #[test]
    fn iterates_lazily() {
        let mut reader = V2Reader::new(CAST.as_bytes()).unwrap();
        assert_eq!(reader.header().width, 90);
        assert_eq!(reader.line_no(), 1);
        let first = reader.next().unwrap().unwrap();
        assert_eq!(first.data, "a");
        assert_eq!(reader.line_no(), 2);
    }

    #[test]
    fn stops_after_first_error() {
        let content = "{\"version\": 2}\n[0.1, \"o\", \"a\"]\n[broken\n[0.3, \"o\", \"c\"]\n";
        let mut reader = V2Reader::new(content.as_bytes()).unwrap();
        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(reader.next().is_none());
    }

    #[test]
    fn rejects_non_v2_input() {
        let err = V2Reader::new(&b"[{\"version\": 1}, [0, \"o\", \"x\"]]"[..]).unwrap_err();
        assert!(err.is_invalid_format());
        assert!(V2Reader::new(&b""[..]).unwrap_err().is_invalid_format());
    }

    #[test]
    fn header_only_is_structural_error() {
        let err = read_v2(&b"{\"version\": 2}\n\n"[..]).unwrap_err();
        assert!(err.is_parse());
    }
}
