//! Asciicast v2 serialization.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use super::model::{CastHeader, ParsedCast};
use crate::error::{CastError, Result};

/// Header line as written to disk.
#[derive(Debug, Serialize)]
struct HeaderLine<'a> {
    version: u8,
    width: u16,
    height: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    idle_time_limit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    command: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    // Sorted so output is stable across runs.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    env: BTreeMap<&'a str, &'a str>,
}

impl<'a> From<&'a CastHeader> for HeaderLine<'a> {
    fn from(header: &'a CastHeader) -> Self {
        Self {
            version: 2,
            width: header.width,
            height: header.height,
            timestamp: header.timestamp,
            duration: header.duration,
            idle_time_limit: header.idle_time_limit,
            command: header.command.as_deref(),
            title: header.title.as_deref(),
            env: header
                .env
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
        }
    }
}

/// Write `cast` in asciicast v2 format.
///
/// v1 casts are upgraded: the header is written with `version: 2`.
pub fn write_v2<W: Write>(writer: &mut W, cast: &ParsedCast) -> Result<()> {
    let header = serde_json::to_string(&HeaderLine::from(&cast.header))?;
    writeln!(writer, "{header}").map_err(|e| CastError::io_context("writing cast header", e))?;

    for event in &cast.events {
        let line = serde_json::to_string(&(event.time, event.kind.tag(), &event.data))?;
        writeln!(writer, "{line}").map_err(|e| CastError::io_context("writing cast event", e))?;
    }

    writer
        .flush()
        .map_err(|e| CastError::io_context("flushing cast output", e))
}

/// Render `cast` as a v2 document in memory.
pub fn to_v2_string(cast: &ParsedCast) -> Result<String> {
    let mut buf = Vec::new();
    write_v2(&mut buf, cast)?;
    String::from_utf8(buf).map_err(|e| {
        CastError::io_context(
            "rendering cast",
            std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cast::model::{CastEvent, CastFormat};
    use crate::cast::parser::parse;

    #[test]
    fn writes_header_and_events() {
        let mut header = CastHeader::new(120, 40).with_title("Demo \"quoted\"");
        header.env.insert("TERM".into(), "xterm".into());
        let cast = ParsedCast::new(
            header,
            vec![CastEvent::output(0.5, "\u{1b}[1mhi\r\n"), CastEvent::input(1.0, "q")],
            CastFormat::V2,
        );

        let text = to_v2_string(&cast).unwrap();
        let mut lines = text.lines();
        let header_line = lines.next().unwrap();
        assert!(header_line.starts_with("{\"version\":2,\"width\":120,\"height\":40"));
        assert!(header_line.contains("\"env\":{\"TERM\":\"xterm\"}"));
        assert_eq!(lines.next(), Some("[0.5,\"o\",\"\\u001b[1mhi\\r\\n\"]"));
        assert_eq!(lines.next(), Some("[1.0,\"i\",\"q\"]"));
    }

    #[test]
    fn output_parses_back() {
        let v1 = r#"[{"version": 1, "width": 70, "height": 20, "title": "t"}, [0.1, "o", "a\nb"], [0.2, "x", "c"]]"#;
        let cast = parse(v1).unwrap();
        let upgraded = parse(&to_v2_string(&cast).unwrap()).unwrap();

        assert_eq!(upgraded.format, CastFormat::V2);
        assert_eq!(upgraded.header.width, 70);
        assert_eq!(upgraded.header.title.as_deref(), Some("t"));
        assert_eq!(upgraded.events, cast.events);
    }
}
