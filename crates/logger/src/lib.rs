/// League Harvest — Logger
/// JSONL run-event stream, one file per day

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

pub struct EventLogger {
    log_dir: PathBuf,
}

impl EventLogger {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        let dir = log_dir.into();
        fs::create_dir_all(&dir).ok();
        Self { log_dir: dir }
    }

    pub fn log<T: Serialize>(&self, event: &T) -> Result<()> {
        let date  = Utc::now().format("%Y-%m-%d").to_string();
        let path  = self.log_dir.join(format!("{date}.jsonl"));
        let line  = serde_json::to_string(event)?;
        let mut f = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(f, "{line}")?;
        Ok(())
    }
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

// ── Event types ───────────────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
pub struct PlayerScrapedEvent {
    pub ts:          String,
    pub event:       &'static str,   // "PLAYER_SCRAPED"
    pub player_id:   String,
    pub player_name: String,
    pub seasons:     usize,
}

#[derive(Serialize, Debug)]
pub struct SeasonCachedEvent {
    pub ts:      String,
    pub event:   &'static str,       // "SEASON_CACHED"
    pub season:  String,
    pub matches: usize,
}

#[derive(Serialize, Debug)]
pub struct FetchTimeoutEvent {
    pub ts:        String,
    pub event:     &'static str,     // "FETCH_TIMEOUT"
    pub player_id: String,
    pub url:       String,
}

#[derive(Serialize, Debug)]
pub struct TrainingSetEvent {
    pub ts:      String,
    pub event:   &'static str,       // "TRAINING_SET_WRITTEN"
    pub players: usize,
    pub rows:    usize,
    pub path:    String,
}
