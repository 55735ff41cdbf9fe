//! Format sniffing.
//!
//! Detection looks at the first line only. It never validates the rest of
//! the document, so it stays cheap on large recordings.

use serde_json::Value;

use super::model::CastFormat;

/// Result of sniffing a cast's generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectedFormat {
    /// Asciicast v1.
    V1,
    /// Asciicast v2.
    V2,
    /// Neither generation.
    Unknown,
}

impl DetectedFormat {
    /// The parseable format, if one was recognized.
    #[must_use]
    pub const fn known(self) -> Option<CastFormat> {
        match self {
            Self::V1 => Some(CastFormat::V1),
            Self::V2 => Some(CastFormat::V2),
            Self::Unknown => None,
        }
    }

    /// Whether a generation was recognized.
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl From<CastFormat> for DetectedFormat {
    fn from(format: CastFormat) -> Self {
        match format {
            CastFormat::V1 => Self::V1,
            CastFormat::V2 => Self::V2,
        }
    }
}

/// Classify `content` as v1, v2 or unknown.
#[must_use]
pub fn detect(content: &str) -> DetectedFormat {
    let content = content.trim();
    if content.is_empty() {
        return DetectedFormat::Unknown;
    }

    let first_line = content.split('\n').next().unwrap_or_default();
    let Ok(value) = serde_json::from_str::<Value>(first_line) else {
        return DetectedFormat::Unknown;
    };

    match &value {
        Value::Object(_) if has_version(&value, 2) => DetectedFormat::V2,
        Value::Array(items)
            if items.first().is_some_and(|h| h.is_object() && has_version(h, 1)) =>
        {
            DetectedFormat::V1
        }
        _ => DetectedFormat::Unknown,
    }
}

/// Whether a JSON object carries a numeric `version` equal to `expected`.
pub(crate) fn has_version(value: &Value, expected: u8) -> bool {
    value
        .get("version")
        .and_then(Value::as_f64)
        .is_some_and(|v| (v - f64::from(expected)).abs() < f64::EPSILON)
}
