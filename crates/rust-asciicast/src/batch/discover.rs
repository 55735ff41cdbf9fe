//! Recording discovery.
//!
//! Files are found with a recursive directory walk and filtered by a glob
//! evaluated against each file's path relative to the input directory.

use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{CastError, Result};

/// Pattern used when none is configured.
pub const DEFAULT_PATTERN: &str = "*.cast";

/// A compiled path glob.
///
/// Supports `*` (any run of characters within one path segment), `?`
/// (one character), and `**` as a whole segment (zero or more segments).
/// A pattern without a `/` is matched against the file name alone, so
/// `*.cast` finds recordings at any depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glob {
    source: String,
    segments: Vec<Vec<char>>,
    name_only: bool,
}

impl Glob {
    /// Compile a glob.
    pub fn new(pattern: &str) -> Result<Self> {
        let trimmed = pattern.trim().trim_start_matches("./");
        if trimmed.is_empty() {
            return Err(CastError::config("file pattern must not be empty"));
        }
        if trimmed.starts_with('/') {
            return Err(CastError::config(format!(
                "file pattern must be relative to the input directory: {pattern}"
            )));
        }
        let segments = trimmed
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| s.chars().collect())
            .collect();
        Ok(Self {
            source: pattern.to_string(),
            segments,
            name_only: !trimmed.contains('/'),
        })
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `relative` (a path below the input directory) matches.
    #[must_use]
    pub fn matches(&self, relative: &Path) -> bool {
        let parts: Vec<Vec<char>> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().chars().collect()),
                _ => None,
            })
            .collect();

        if self.name_only {
            return match (parts.last(), self.segments.first()) {
                (Some(name), Some(pattern)) => segment_matches(pattern, name),
                _ => false,
            };
        }
        path_matches(&self.segments, &parts)
    }
}

impl Default for Glob {
    fn default() -> Self {
        Self {
            source: DEFAULT_PATTERN.to_string(),
            segments: vec![DEFAULT_PATTERN.chars().collect()],
            name_only: true,
        }
    }
}

fn path_matches(pattern: &[Vec<char>], parts: &[Vec<char>]) -> bool {
    match pattern.split_first() {
        None => parts.is_empty(),
        Some((first, rest)) if first.as_slice() == ['*', '*'] => {
            (0..=parts.len()).any(|skip| path_matches(rest, &parts[skip..]))
        }
        Some((first, rest)) => match parts.split_first() {
            Some((part, remaining)) => {
                segment_matches(first, part) && path_matches(rest, remaining)
            }
            None => false,
        },
    }
}

/// Anchored wildcard match of a single path segment.
const fn segment_matches(pattern: &[char], text: &[char]) -> bool {
    let mut p = 0;
    let mut t = 0;
    let mut star_p = None;
    let mut star_t = 0;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == '*' {
            star_p = Some(p);
            star_t = t;
            p += 1;
        } else if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if let Some(sp) = star_p {
            p = sp + 1;
            star_t += 1;
            t = star_t;
        } else {
            return false;
        }
    }

    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}

/// Find every regular file under `dir` whose relative path matches `glob`.
///
/// The result is sorted. Any walk error, including a missing or unreadable
/// directory, fails the whole discovery.
pub fn discover(dir: &Path, glob: &Glob) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(dir).map_err(|e| CastError::discovery_failed(dir, e))?;
    if !metadata.is_dir() {
        return Err(CastError::discovery_failed(
            dir,
            io::Error::other("not a directory"),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            let message = e.to_string();
            let source = e.into_io_error().unwrap_or_else(|| io::Error::other(message));
            CastError::discovery_failed(path, source)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(dir).unwrap_or_else(|_| entry.path());
        if glob.matches(relative) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    debug!(
        dir = %dir.display(),
        pattern = glob.as_str(),
        found = files.len(),
        "discovered cast files"
    );
    Ok(files)
}
