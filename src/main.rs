/// League Harvest — player scraper
///
/// What it does:
///   1. Logs into the league site with credentials from the environment
///   2. Scrapes every configured player (category breakdown, season/career
///      stats, match history) into tab-delimited files under the data dir
///   3. Caches per-season match categories so shared seasons are fetched once
///
/// Run:
///   cargo run --bin scrape-players -- --players-file friends.json

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use dotenv::dotenv;
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use league_session::{Credentials, LeagueSession};
use player_scraper::{branches, PlayerScraper, SeasonCache};

#[derive(Parser)]
#[command(name = "scrape-players")]
#[command(about = "Scrape league player data into per-player flat files")]
struct Cli {
    /// Re-scrape everything, ignoring data already on disk.
    #[arg(short, long)]
    skip_check_files: bool,

    /// JSON file mapping player ids to display names.
    #[arg(short, long, default_value = "friends.json")]
    players_file: PathBuf,

    /// JSON file mapping branch ids to display names; branch members are
    /// added to the player set.
    #[arg(short, long)]
    branches_file: Option<PathBuf>,

    /// Root of the per-player output tree.
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,
}

#[derive(Deserialize)]
struct NamedEntry {
    name: String,
}

/// Load an id → name config file. A missing players file is fine (the
/// branches file may supply the whole roster).
fn load_entries(path: &Path) -> Result<BTreeMap<String, NamedEntry>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(file).with_context(|| format!("{} did not parse", path.display()))
}

fn main() -> Result<()> {
    dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!("=== League Harvest — player scraper ===");

    // Single instance lock: two scrapers would hammer the site and race
    // on the shared season files.
    let lock_file_path = env::temp_dir().join("league_harvest_scrape.lock");
    let lock_file = match File::create(&lock_file_path) {
        Ok(f) => f,
        Err(e) => {
            warn!("failed to create lock file at {:?}: {}", lock_file_path, e);
            return Ok(());
        }
    };
    let mut lock = fd_lock::RwLock::new(lock_file);
    let _write_guard = match lock.try_write() {
        Ok(guard) => {
            info!("acquired single-instance lock");
            guard
        }
        Err(_) => {
            warn!("another scrape-players instance is already running, exiting");
            return Ok(());
        }
    };

    let credentials = Credentials::from_env()?;

    let mut players: BTreeMap<String, String> = load_entries(&cli.players_file)?
        .into_iter()
        .map(|(id, entry)| (id, entry.name))
        .collect();

    let session = LeagueSession::login(&credentials)?;

    if let Some(branches_path) = &cli.branches_file {
        let branch_entries: HashMap<String, String> = load_entries(branches_path)?
            .into_iter()
            .map(|(id, entry)| (id, entry.name))
            .collect();
        let member_ids = branches::branch_player_ids(
            &session,
            branch_entries.iter().map(|(id, name)| (id.as_str(), name.as_str())),
        )?;
        for id in member_ids {
            players
                .entry(id.clone())
                .or_insert_with(|| branches::placeholder_name(&id));
        }
    }

    if players.is_empty() {
        bail!(
            "no players to scrape; check {} and --branches-file",
            cli.players_file.display()
        );
    }
    info!("scraping {} players into {}", players.len(), cli.data_dir.display());

    let scraper = PlayerScraper::new(&session, &cli.data_dir, !cli.skip_check_files);
    let mut cache = SeasonCache::new();
    for (player_id, player_name) in &players {
        if let Err(err) = scraper.scrape_player(&mut cache, player_id, player_name) {
            warn!("scraping {player_name} failed: {err:#}");
        }
    }

    info!(
        "scraping finished: {} players, {} seasons cached",
        players.len(),
        cache.len()
    );
    Ok(())
}
