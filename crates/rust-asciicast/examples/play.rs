//! Play a recording in the terminal.
//!
//! Settings come from `asciicast.toml` in the current directory when present,
//! then from `ASCIICAST_*` environment variables. Ctrl-C stops playback.
//!
//! Run with: `cargo run --example play --features logging -- demo.cast`

use std::sync::Arc;

use rust_asciicast::config::file;
use rust_asciicast::logging;
use rust_asciicast::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: play <file.cast>");
        std::process::exit(2);
    };

    let config = match file::find(&["."]) {
        Some(found) => AsciicastConfig::load(found)?,
        None => AsciicastConfig::from_env()?,
    };
    logging::init(&config.logging)?;

    let content =
        CastError::with_io_context(std::fs::read_to_string(&path), format!("reading {path}"))?;
    let cast = parse(&content)?;

    let mut options = config.playback.to_options()?;
    if options.idle_time_limit.is_none() {
        options.idle_time_limit = PlaybackOptions::from_header(&cast.header).idle_time_limit;
    }

    let player = Arc::new(Player::new());
    tokio::spawn({
        let player = Arc::clone(&player);
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                player.stop();
            }
        }
    });

    let mut stdout = std::io::stdout();
    let report = player.play(&cast, &options, &mut stdout).await?;

    eprintln!(
        "\n{} output events, {:?}, recording length {:?}",
        report.events_written,
        report.outcome,
        cast.duration()
    );
    Ok(())
}
