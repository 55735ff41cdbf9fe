//! Recording through the `asciinema` command-line tool.
//!
//! The crate does not capture terminals itself. [`Recorder`] runs an
//! installed `asciinema rec` and hands back the recording it wrote, ready
//! for [`parse`](crate::parse).
//!
//! ```ignore
//! use rust_asciicast::record::{RecordOptions, Recorder};
//!
//! let recorder = Recorder::new();
//! if recorder.is_installed().await {
//!     let options = RecordOptions::new().with_command("ls -la").with_title("listing");
//!     let cast = rust_asciicast::parse(&recorder.record(&options).await?)?;
//! }
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{CastError, Result};

/// Program looked up on `PATH` by default.
pub const DEFAULT_PROGRAM: &str = "asciinema";

/// Output file name inside the scratch directory used when no output is set.
const SCRATCH_FILE_NAME: &str = "recording.cast";

/// Options for one `asciinema rec` run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordOptions {
    /// Command to record instead of an interactive shell.
    pub command: Option<String>,
    /// Recording title.
    pub title: Option<String>,
    /// Where to keep the recording. A scratch file is used when unset.
    pub output: Option<PathBuf>,
    /// Replace an existing output file.
    pub overwrite: bool,
    /// Append to an existing output file.
    pub append: bool,
    /// Idle time limit in seconds stored in the header. Zero means none.
    pub idle_time_limit: Option<f64>,
    /// Answer yes to every prompt.
    pub yes: bool,
    /// Suppress asciinema's own notices.
    pub quiet: bool,
}

impl RecordOptions {
    /// Options recording an interactive shell to a scratch file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `command`.
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Keep the recording at `path`.
    #[must_use]
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Replace an existing output file.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Append to an existing output file.
    #[must_use]
    pub const fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    /// Cap recorded idle time.
    #[must_use]
    pub const fn with_idle_time_limit(mut self, secs: f64) -> Self {
        self.idle_time_limit = Some(secs);
        self
    }

    /// Answer yes to every prompt.
    #[must_use]
    pub const fn with_yes(mut self, yes: bool) -> Self {
        self.yes = yes;
        self
    }

    /// Suppress notices.
    #[must_use]
    pub const fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Arguments for `asciinema`, ending with the output path.
    #[must_use]
    pub fn args(&self, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["rec".into()];
        if let Some(command) = &self.command {
            args.push("-c".into());
            args.push(command.into());
        }
        if let Some(title) = &self.title {
            args.push("-t".into());
            args.push(title.into());
        }
        if self.overwrite {
            args.push("--overwrite".into());
        }
        if self.append {
            args.push("--append".into());
        }
        if let Some(limit) = self.idle_time_limit.filter(|s| s.is_finite() && *s > 0.0) {
            args.push("-i".into());
            args.push(limit.to_string().into());
        }
        if self.yes {
            args.push("-y".into());
        }
        if self.quiet {
            args.push("-q".into());
        }
        args.push(output.into());
        args
    }
}

/// Runs `asciinema`.
///
/// Standard input is closed for the child, so recordings should name a
/// [`command`](RecordOptions::command); an interactive shell exits at once.
#[derive(Debug, Clone)]
pub struct Recorder {
    program: OsString,
    base_args: Vec<OsString>,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Recorder {
    /// Use `asciinema` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_command(DEFAULT_PROGRAM, Vec::<OsString>::new())
    }

    /// Use another launcher, e.g. `python3 -m asciinema`.
    #[must_use]
    pub fn with_command<I, S>(program: impl Into<OsString>, base_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            base_args: base_args.into_iter().map(Into::into).collect(),
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.base_args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        command
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// The version line `asciinema --version` prints.
    ///
    /// Fails with [`CastError::NotInstalled`] when the program cannot be run
    /// or exits unsuccessfully.
    pub async fn version(&self) -> Result<String> {
        let not_installed = || CastError::not_installed(self.program_name());
        let output = self
            .command()
            .arg("--version")
            .output()
            .await
            .map_err(|_| not_installed())?;
        if !output.status.success() {
            return Err(not_installed());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Whether the program runs.
    pub async fn is_installed(&self) -> bool {
        self.version().await.is_ok()
    }

    /// Record according to `options` and return the cast text.
    ///
    /// Without an output path the recording goes to a scratch directory that
    /// is removed before this returns.
    pub async fn record(&self, options: &RecordOptions) -> Result<String> {
        let (output, _scratch) = match &options.output {
            Some(path) => (path.clone(), None),
            None => {
                let dir = tempfile::tempdir().map_err(|e| {
                    CastError::io_context("creating scratch directory for recording", e)
                })?;
                (dir.path().join(SCRATCH_FILE_NAME), Some(dir))
            }
        };

        let args = options.args(&output);
        debug!(program = %self.program_name(), ?args, "starting recording");

        let result = self.command().args(&args).output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CastError::not_installed(self.program_name())
            } else {
                CastError::io_context(format!("running {}", self.program_name()), e)
            }
        })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                String::from_utf8_lossy(&result.stdout).trim().to_string()
            } else {
                stderr
            };
            return Err(CastError::recording_failed(result.status.code(), message));
        }

        let cast = tokio::fs::read_to_string(&output).await.map_err(|e| {
            CastError::recording_failed(None, format!("reading {}: {e}", output.display()))
        })?;
        info!(output = %output.display(), bytes = cast.len(), "recording finished");
        Ok(cast)
    }
}
