//! Concurrent batch conversion of a directory of recordings.
//!
//! ```ignore
//! use rust_asciicast::batch::{BatchOptions, BatchProcessor, NormalizeConverter};
//!
//! let options = BatchOptions::new("recordings")
//!     .with_output_dir("normalized")
//!     .with_parallel(8)
//!     .with_skip_errors(true);
//! let result = BatchProcessor::new(NormalizeConverter).process(&options).await?;
//! println!("{} of {} converted", result.succeeded, result.processed);
//! ```

pub mod convert;
pub mod discover;
pub mod options;
pub mod processor;
pub mod result;

pub use convert::{Converter, NormalizeConverter};
pub use discover::{DEFAULT_PATTERN, Glob, discover};
pub use options::{BatchOptions, DEFAULT_EXTENSION, DEFAULT_PARALLEL, Distribution};
pub use processor::BatchProcessor;
pub use result::{BatchFailure, BatchResult};
