//! Strict asciicast parsing.
//!
//! [`parse`] sniffs the generation with [`detect`](super::detect::detect)
//! and then applies that generation's structural rules. Both generations
//! share the event tuple shape `[time, type, data]`, where `time` is a
//! number, `type` is any value and `data` is a string.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use super::detect::detect;
use super::model::{
    CastEvent, CastFormat, CastHeader, DEFAULT_HEIGHT, DEFAULT_WIDTH, EventKind, ParsedCast,
};
use crate::error::{CastError, Result};

/// Parse a cast of either generation.
///
/// Fails with [`CastError::InvalidFormat`] when the generation cannot be
/// detected and with [`CastError::Parse`] when the detected generation's
/// rules are broken.
pub fn parse(content: &str) -> Result<ParsedCast> {
    let format = detect(content).known().ok_or(CastError::InvalidFormat)?;
    parse_as(content, format)
}

/// Parse a cast whose generation is already known.
pub fn parse_as(content: &str, format: CastFormat) -> Result<ParsedCast> {
    let cast = match format {
        CastFormat::V1 => parse_v1(content)?,
        CastFormat::V2 => parse_v2(content)?,
    };
    debug!(
        format = %cast.format,
        events = cast.events.len(),
        width = cast.header.width,
        height = cast.header.height,
        "parsed cast"
    );
    Ok(cast)
}

/// Check whether `content` parses.
#[must_use]
pub fn validate(content: &str) -> bool {
    parse(content).is_ok()
}

fn parse_v1(content: &str) -> Result<ParsedCast> {
    let format = CastFormat::V1;
    let data: Value = serde_json::from_str(content)
        .map_err(|e| CastError::parse_at(format, e.line(), e.to_string()))?;

    let items = match data {
        Value::Array(items) if items.len() >= 2 => items,
        _ => {
            return Err(CastError::parse(
                format,
                "expected array with at least 2 elements",
            ));
        }
    };

    let mut items = items.into_iter();
    let header_value = items.next().unwrap_or_default();
    let header = decode_header(&header_value, format)
        .ok_or_else(|| CastError::parse(format, "header must be a JSON object"))?;

    let events = items
        .enumerate()
        .map(|(index, value)| {
            decode_event(&value).map_err(|reason| {
                CastError::parse(format, format!("event {}: {reason}", index + 1))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ParsedCast::new(header, events, format))
}

fn parse_v2(content: &str) -> Result<ParsedCast> {
    let format = CastFormat::V2;

    // Line numbers refer to the untrimmed input, counting stripped blank lines.
    let trimmed = content.trim();
    let leading = &content[..content.len() - content.trim_start().len()];
    let offset = leading.matches('\n').count();

    let lines: Vec<&str> = trimmed.split('\n').collect();
    if lines.len() < 2 {
        return Err(CastError::parse(format, "expected at least 2 lines"));
    }

    let header = decode_v2_header(lines[0], offset + 1)?;

    let mut events = Vec::with_capacity(lines.len() - 1);
    for (index, line) in lines.iter().enumerate().skip(1) {
        if let Some(event) = decode_v2_event(line, index + offset + 1)? {
            events.push(event);
        }
    }

    Ok(ParsedCast::new(header, events, format))
}

/// Decode a v2 header line.
pub(crate) fn decode_v2_header(line: &str, line_no: usize) -> Result<CastHeader> {
    let format = CastFormat::V2;
    let value: Value = serde_json::from_str(line.trim())
        .map_err(|e| CastError::parse_at(format, line_no, e.to_string()))?;
    decode_header(&value, format)
        .ok_or_else(|| CastError::parse_at(format, line_no, "header must be a JSON object"))
}

/// Decode one v2 event line; blank lines yield `None`.
pub(crate) fn decode_v2_event(line: &str, line_no: usize) -> Result<Option<CastEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(line).map_err(|e| {
        CastError::parse_at(CastFormat::V2, line_no, format!("failed to parse event: {e}"))
    })?;
    decode_event(&value)
        .map(Some)
        .map_err(|reason| CastError::parse_at(CastFormat::V2, line_no, reason))
}

/// Build a header from a JSON object, applying defaults.
fn decode_header(value: &Value, format: CastFormat) -> Option<CastHeader> {
    let object = value.as_object()?;

    let env = match format {
        CastFormat::V1 => HashMap::new(),
        CastFormat::V2 => object
            .get("env")
            .and_then(Value::as_object)
            .map(|env| {
                env.iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                    .collect()
            })
            .unwrap_or_default(),
    };

    Some(CastHeader {
        version: format.version(),
        width: dimension(object.get("width")).unwrap_or(DEFAULT_WIDTH),
        height: dimension(object.get("height")).unwrap_or(DEFAULT_HEIGHT),
        timestamp: object
            .get("timestamp")
            .and_then(Value::as_f64)
            .filter(|t| t.is_finite() && *t >= 0.0)
            .map(|t| t as u64),
        duration: object.get("duration").and_then(Value::as_f64),
        idle_time_limit: object.get("idle_time_limit").and_then(Value::as_f64),
        command: object.get("command").and_then(Value::as_str).map(String::from),
        title: object.get("title").and_then(Value::as_str).map(String::from),
        env,
    })
}

/// A usable terminal dimension; absent, zero or non-numeric values are `None`.
fn dimension(value: Option<&Value>) -> Option<u16> {
    value
        .and_then(Value::as_f64)
        .filter(|d| d.is_finite() && *d >= 1.0 && *d <= f64::from(u16::MAX))
        .map(|d| d as u16)
}

/// Decode an event tuple `[time, type, data, ...]`.
fn decode_event(value: &Value) -> std::result::Result<CastEvent, String> {
    let tuple = value
        .as_array()
        .filter(|t| t.len() >= 3)
        .ok_or("event must be an array of at least 3 elements")?;

    let time = tuple[0].as_f64().ok_or("event time must be a number")?;
    let kind = EventKind::from_tag(tuple[1].as_str());
    let data = tuple[2].as_str().ok_or("event data must be a string")?;

    Ok(CastEvent {
        time,
        kind,
        data: data.to_string(),
    })
}
