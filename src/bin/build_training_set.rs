/// League Harvest — training set builder
///
/// Walks the per-player tree the scraper produced, broadcasts each
/// player's career stats and category percentages across their match
/// rows, unions everyone into training_set.csv, and drops forfeits.
///
/// Run:
///   cargo run --bin build-training-set -- --data-dir data

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use logger::{now_iso, EventLogger, TrainingSetEvent};

#[derive(Parser)]
#[command(name = "build-training-set")]
#[command(about = "Aggregate per-player files into one training set")]
struct Cli {
    /// Root of the per-player tree produced by scrape-players.
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,
}

fn main() -> Result<()> {
    dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let summary = training_set::generate(&cli.data_dir)?;

    let events = EventLogger::new("logs");
    let _ = events.log(&TrainingSetEvent {
        ts: now_iso(),
        event: "TRAINING_SET_WRITTEN",
        players: summary.players,
        rows: summary.rows,
        path: summary.path.display().to_string(),
    });

    info!(
        "training set ready: {} rows from {} players at {}",
        summary.rows,
        summary.players,
        summary.path.display()
    );
    Ok(())
}
