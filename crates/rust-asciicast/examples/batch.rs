//! Normalize a directory of recordings to v2.
//!
//! Run with: `cargo run --example batch --features logging -- <input> <output>`

use rust_asciicast::batch::{BatchProcessor, NormalizeConverter};
use rust_asciicast::logging;
use rust_asciicast::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        eprintln!("usage: batch <input-dir> <output-dir>");
        std::process::exit(2);
    };

    let config = AsciicastConfig::from_env()?;
    logging::init(&config.logging)?;

    let mut options = config.batch.to_options(input);
    options.output_dir = Some(output.into());

    let result = match BatchProcessor::new(NormalizeConverter).process(&options).await {
        Ok(result) => result,
        Err(CastError::BatchAborted { file, message, partial }) => {
            eprintln!("stopped at {}: {message}", file.display());
            eprintln!("rerun with ASCIICAST_SKIP_ERRORS=1 to convert the rest");
            *partial
        }
        Err(e) => return Err(e),
    };

    println!(
        "{} found, {} converted, {} failed, {} skipped",
        result.processed,
        result.succeeded,
        result.failed,
        result.skipped()
    );
    for failure in &result.errors {
        println!("  {}: {}", failure.file.display(), failure.message);
    }
    Ok(())
}
