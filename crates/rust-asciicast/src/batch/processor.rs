//! Bounded-concurrency batch processor.
//!
//! Each worker is a tokio task owning an isolated [`Partial`]. Workers take
//! files from their [`WorkSource`] strictly one at a time; the partials are
//! merged once every task has been joined, so counters are never shared.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::convert::Converter;
use super::discover::discover;
use super::options::{BatchOptions, Distribution};
use super::result::{BatchResult, Partial, merge};
use crate::error::{CastError, Result};

type Job = (usize, PathBuf);

/// Where a worker gets its next file.
enum WorkSource {
    Shared(Arc<Mutex<VecDeque<Job>>>),
    Owned(VecDeque<Job>),
}

impl WorkSource {
    fn next(&mut self) -> Option<Job> {
        match self {
            Self::Shared(queue) => queue
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front(),
            Self::Owned(chunk) => chunk.pop_front(),
        }
    }
}

/// What a worker leaves behind, readable even if its task panicked.
#[derive(Debug, Default)]
struct WorkerSlot {
    current: Option<Job>,
    partial: Partial,
}

type Slot = Arc<Mutex<WorkerSlot>>;

fn lock(slot: &Slot) -> std::sync::MutexGuard<'_, WorkerSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs a [`Converter`] over every recording in a directory.
#[derive(Debug, Clone)]
pub struct BatchProcessor<C> {
    converter: Arc<C>,
}

impl<C: Converter> BatchProcessor<C> {
    /// Create a processor around `converter`.
    pub fn new(converter: C) -> Self {
        Self {
            converter: Arc::new(converter),
        }
    }

    /// The converter.
    #[must_use]
    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// Discover and convert every matching file under `options.input_dir`.
    ///
    /// With `skip_errors` unset, the first failure stops workers from taking
    /// new files; files already in progress finish, and the call fails with
    /// [`CastError::BatchAborted`] carrying everything counted so far.
    pub async fn process(&self, options: &BatchOptions) -> Result<BatchResult> {
        let glob = options.glob()?;
        let files = {
            let dir = options.input_dir.clone();
            tokio::task::spawn_blocking(move || discover(&dir, &glob))
                .await
                .map_err(|e| CastError::discovery_failed(&options.input_dir, e.into()))??
        };

        if files.is_empty() {
            info!(dir = %options.input_dir.display(), "no cast files found");
            return Ok(BatchResult::default());
        }

        let processed = files.len();
        let workers = options.workers(processed);
        info!(
            dir = %options.input_dir.display(),
            files = processed,
            workers,
            distribution = ?options.distribution,
            "batch started"
        );

        let options = Arc::new(options.clone());
        let abort = Arc::new(AtomicBool::new(false));
        let mut tasks = JoinSet::new();
        let mut slots: Vec<Slot> = Vec::with_capacity(workers);

        for (worker, source) in distribute(files, workers, options.distribution)
            .into_iter()
            .enumerate()
        {
            let slot = Slot::default();
            tasks.spawn(run_worker(
                worker,
                source,
                Arc::clone(&self.converter),
                Arc::clone(&options),
                Arc::clone(&abort),
                Arc::clone(&slot),
            ));
            slots.push(slot);
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "batch worker died");
                if !options.skip_errors {
                    abort.store(true, Ordering::SeqCst);
                }
            }
        }

        let partials = slots.iter().map(|slot| {
            let mut slot = lock(slot);
            // A file still marked current belongs to a worker that died on it.
            if let Some((index, file)) = slot.current.take() {
                warn!(file = %file.display(), "cast conversion panicked");
                slot.partial.record_failure(index, file, "converter panicked".into());
            }
            std::mem::take(&mut slot.partial)
        });
        let result = merge(processed, partials.collect::<Vec<_>>());

        info!(
            processed = result.processed,
            succeeded = result.succeeded,
            failed = result.failed,
            "batch finished"
        );

        if !options.skip_errors {
            if let Some(first) = result.errors.first() {
                return Err(CastError::BatchAborted {
                    file: first.file.clone(),
                    message: first.message.clone(),
                    partial: Box::new(result.clone()),
                });
            }
        }
        Ok(result)
    }
}

/// Split `files` into one work source per worker.
fn distribute(
    files: Vec<PathBuf>,
    workers: usize,
    distribution: Distribution,
) -> Vec<WorkSource> {
    let jobs: VecDeque<Job> = files.into_iter().enumerate().collect();
    match distribution {
        Distribution::Queue => {
            let queue = Arc::new(Mutex::new(jobs));
            (0..workers)
                .map(|_| WorkSource::Shared(Arc::clone(&queue)))
                .collect()
        }
        Distribution::Chunked => chunk_sizes(jobs.len(), workers)
            .scan(jobs, |jobs, size| {
                Some(WorkSource::Owned(jobs.drain(..size).collect()))
            })
            .collect(),
    }
}

/// Near-equal contiguous chunk sizes; the first `len % workers` get one more.
fn chunk_sizes(len: usize, workers: usize) -> impl Iterator<Item = usize> {
    let base = len.checked_div(workers).unwrap_or(0);
    let extra = len.checked_rem(workers).unwrap_or(0);
    (0..workers).map(move |i| base + usize::from(i < extra))
}

async fn run_worker<C: Converter>(
    worker: usize,
    mut source: WorkSource,
    converter: Arc<C>,
    options: Arc<BatchOptions>,
    abort: Arc<AtomicBool>,
    slot: Slot,
) {
    debug!(worker, "batch worker started");
    while !abort.load(Ordering::SeqCst) {
        let Some((index, file)) = source.next() else { break };
        lock(&slot).current = Some((index, file.clone()));

        let outcome = converter.convert(&file, &options).await;

        let mut slot = lock(&slot);
        slot.current = None;
        match outcome {
            Ok(()) => {
                debug!(worker, file = %file.display(), "cast converted");
                slot.partial.record_success();
            }
            Err(e) => {
                let message = e.to_string();
                warn!(worker, file = %file.display(), error = %message, "cast conversion failed");
                slot.partial.record_failure(index, file, message);
                if !options.skip_errors {
                    abort.store(true, Ordering::SeqCst);
                    break;
                }
            }
        }
    }
    debug!(worker, "batch worker finished");
}
