/// League Harvest — category predictor
///
/// Sends trivia questions to the hosted chat model (few-shot seeded,
/// temperature 0) and prints one predicted category label per question.
///
/// Run:
///   cargo run --bin predict-categories -- "What is the capital of Chad?"
///   cargo run --bin predict-categories -- --questions-file questions.txt

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use dotenv::dotenv;
use tracing_subscriber::{fmt, EnvFilter};

use category_predictor::CategoryPredictor;

#[derive(Parser)]
#[command(name = "predict-categories")]
#[command(about = "Classify trivia questions into league categories")]
struct Cli {
    /// Questions to classify, one label printed per question.
    questions: Vec<String>,

    /// File with one question per line, appended to any positional questions.
    #[arg(short = 'f', long)]
    questions_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut questions = cli.questions;
    if let Some(path) = &cli.questions_file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        questions.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }
    if questions.is_empty() {
        bail!("no questions given; pass them as arguments or via --questions-file");
    }

    let predictor = CategoryPredictor::from_env()?;
    let labels = predictor.predict_all(&questions).await?;
    for (label, question) in labels.iter().zip(&questions) {
        println!("{label}\t{question}");
    }
    Ok(())
}
