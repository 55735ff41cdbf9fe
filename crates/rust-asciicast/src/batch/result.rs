//! Batch outcome accounting.

use std::path::PathBuf;

/// A file that failed to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// The file.
    pub file: PathBuf,
    /// Why its conversion failed.
    pub message: String,
}

/// Counts from one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    /// Files discovered, whether or not they were attempted.
    pub processed: usize,
    /// Files converted.
    pub succeeded: usize,
    /// Files whose conversion failed.
    pub failed: usize,
    /// Failures in discovery order.
    pub errors: Vec<BatchFailure>,
}

impl BatchResult {
    /// Whether every discovered file was converted.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failed == 0 && self.succeeded == self.processed
    }

    /// Files discovered but never attempted, which happens after a strict
    /// run aborts.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.processed.saturating_sub(self.succeeded + self.failed)
    }
}

/// One worker's share of the result.
///
/// Failures keep their discovery index so the merged list can be ordered
/// independently of which worker finished first.
#[derive(Debug, Default)]
pub(crate) struct Partial {
    pub(crate) succeeded: usize,
    pub(crate) failures: Vec<(usize, BatchFailure)>,
}

impl Partial {
    pub(crate) const fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub(crate) fn record_failure(&mut self, index: usize, file: PathBuf, message: String) {
        self.failures.push((index, BatchFailure { file, message }));
    }
}

/// Merge worker partials into a single result.
pub(crate) fn merge(processed: usize, partials: impl IntoIterator<Item = Partial>) -> BatchResult {
    let mut succeeded = 0;
    let mut failures = Vec::new();
    for partial in partials {
        succeeded += partial.succeeded;
        failures.extend(partial.failures);
    }
    failures.sort_by_key(|(index, _)| *index);

    BatchResult {
        processed,
        succeeded,
        failed: failures.len(),
        errors: failures.into_iter().map(|(_, failure)| failure).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_orders_failures_by_discovery() {
        let mut a = Partial::default();
        a.record_success();
        a.record_failure(3, "d.cast".into(), "bad".into());
        let mut b = Partial::default();
        b.record_failure(1, "b.cast".into(), "worse".into());
        b.record_success();

        let result = merge(5, [a, b]);
        assert_eq!(result.processed, 5);
        assert_eq!(result.succeeded, 2);
        assert_eq!(result.failed, 2);
        let files: Vec<_> = result.errors.iter().map(|e| e.file.clone()).collect();
        assert_eq!(files, vec![PathBuf::from("b.cast"), PathBuf::from("d.cast")]);
        assert_eq!(result.skipped(), 1);
        assert!(!result.is_complete());
    }

    #[test]
    fn empty_result_is_complete() {
        assert!(BatchResult::default().is_complete());
    }
}
