//! Per-file conversion step.

use std::future::Future;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::options::BatchOptions;
use crate::cast;
use crate::error::{CastError, Result};

/// Converts one recording into an artifact.
///
/// Implementations are shared across workers, so `convert` takes `&self`.
/// Any closure `Fn(PathBuf, BatchOptions) -> impl Future<Output = Result<()>>`
/// is a converter.
pub trait Converter: Send + Sync + 'static {
    /// Convert the file at `path`.
    fn convert(
        &self,
        path: &Path,
        options: &BatchOptions,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl<F, Fut> Converter for F
where
    F: Fn(PathBuf, BatchOptions) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send,
{
    fn convert(
        &self,
        path: &Path,
        options: &BatchOptions,
    ) -> impl Future<Output = Result<()>> + Send {
        self(path.to_path_buf(), options.clone())
    }
}

/// Rewrites recordings of either generation as v2.
///
/// Output goes to [`BatchOptions::output_path`]. A file converted in place
/// is fully parsed before it is overwritten.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeConverter;

impl Converter for NormalizeConverter {
    async fn convert(&self, path: &Path, options: &BatchOptions) -> Result<()> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CastError::io_context(format!("reading {}", path.display()), e))?;
        let parsed = cast::parse(&content)?;
        let output = cast::to_v2_string(&parsed)?;

        let target = options.output_path(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CastError::io_context(format!("creating {}", parent.display()), e))?;
        }
        tokio::fs::write(&target, output)
            .await
            .map_err(|e| CastError::io_context(format!("writing {}", target.display()), e))?;

        debug!(
            input = %path.display(),
            output = %target.display(),
            from = %parsed.format,
            events = parsed.events.len(),
            "normalized cast"
        );
        Ok(())
    }
}
