//! Batch options.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::discover::{DEFAULT_PATTERN, Glob};
use crate::error::{CastError, Result};

/// Workers used when `parallel` is unset or zero.
pub const DEFAULT_PARALLEL: usize = 4;

/// Extension written by converters that produce cast files.
pub const DEFAULT_EXTENSION: &str = "cast";

/// How discovered files are handed to workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    /// Workers pull the next file from a shared queue as they free up.
    #[default]
    Queue,
    /// Files are split into contiguous chunks of near-equal size, one per
    /// worker.
    Chunked,
}

impl FromStr for Distribution {
    type Err = CastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "queue" => Ok(Self::Queue),
            "chunked" => Ok(Self::Chunked),
            other => Err(CastError::config(format!(
                "unknown distribution {other:?}, expected \"queue\" or \"chunked\""
            ))),
        }
    }
}

/// Options for a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Directory searched for recordings.
    pub input_dir: PathBuf,
    /// Where converters write artifacts; next to each input when unset.
    pub output_dir: Option<PathBuf>,
    /// Glob selecting files, relative to `input_dir`.
    pub pattern: Option<String>,
    /// Upper bound on concurrent workers.
    pub parallel: Option<usize>,
    /// Keep going after a file fails.
    pub skip_errors: bool,
    /// Work distribution strategy.
    pub distribution: Distribution,
    /// Extension of produced artifacts, without the dot.
    pub extension: String,
}

impl BatchOptions {
    /// Options for `input_dir` with all defaults.
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: None,
            pattern: None,
            parallel: None,
            skip_errors: false,
            distribution: Distribution::default(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Set the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the file pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set the worker limit.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: usize) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Set whether failures are skipped.
    #[must_use]
    pub const fn with_skip_errors(mut self, skip: bool) -> Self {
        self.skip_errors = skip;
        self
    }

    /// Set the distribution strategy.
    #[must_use]
    pub const fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Set the artifact extension.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Compile the configured pattern, or the default one.
    pub fn glob(&self) -> Result<Glob> {
        Glob::new(self.pattern.as_deref().unwrap_or(DEFAULT_PATTERN))
    }

    /// Workers to run for `files` discovered files.
    #[must_use]
    pub fn workers(&self, files: usize) -> usize {
        let parallel = match self.parallel {
            Some(0) | None => DEFAULT_PARALLEL,
            Some(n) => n,
        };
        parallel.min(files)
    }

    /// Artifact path for `input`.
    ///
    /// Under an output directory the input's layout below `input_dir` is
    /// kept; otherwise the artifact sits next to the input.
    #[must_use]
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let target = match &self.output_dir {
            Some(out) => out.join(input.strip_prefix(&self.input_dir).unwrap_or(input)),
            None => input.to_path_buf(),
        };
        target.with_extension(self.extension.trim_start_matches('.'))
    }
}
