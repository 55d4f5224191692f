//! Training-set aggregation over the per-player flat-file tree.
//!
//! For every player directory: concatenate the match files, broadcast the
//! one-row career stats across all match rows (a single-row cross join),
//! pivot the category percentages into one column per category, and write
//! an intermediate aggregated file. The union of those files, minus
//! forfeited matches, is the training set.
//!
//! Scanning skips everything this module itself produces (`aggregated/`,
//! `seasons/`, `training_set.csv`) and orders players and files by name,
//! so re-running over unchanged inputs is byte-identical.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use table_parser::league::FORFEIT_SENTINEL;
use table_parser::{read_table, write_table, Table};

const DELIMITER: u8 = b'\t';
const AGGREGATED_DIR: &str = "aggregated";
const SEASONS_DIR: &str = "seasons";
const TRAINING_SET_FILE: &str = "training_set.csv";

pub struct Summary {
    pub players: usize,
    pub rows: usize,
    pub path: PathBuf,
}

/// Player directories under the data dir, sorted by name. Byproducts of
/// scraping seasons and of prior aggregation runs are not players.
fn player_dirs(data_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    let entries = fs::read_dir(data_dir)
        .with_context(|| format!("failed to read {}", data_dir.display()))?;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == AGGREGATED_DIR || name == SEASONS_DIR {
            continue;
        }
        dirs.push(entry.path());
    }
    dirs.sort();
    Ok(dirs)
}

fn match_files(player_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(player_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with("match_stats_") && name.ends_with(".csv") {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn concat(tables: Vec<Table>) -> Result<Table> {
    let mut iter = tables.into_iter();
    let mut combined = iter.next().context("no match tables to concatenate")?;
    for table in iter {
        if table.headers != combined.headers {
            bail!("match file headers disagree within one player directory");
        }
        combined.rows.extend(table.rows);
    }
    Ok(combined)
}

/// Broadcast every column of a one-row table down all rows of `target`.
fn broadcast(target: &mut Table, scalars: &Table) -> Result<()> {
    if scalars.len() != 1 {
        bail!("expected a single-row table, found {} rows", scalars.len());
    }
    for (header, value) in scalars.headers.iter().zip(&scalars.rows[0]) {
        target.push_constant_column(header, value);
    }
    Ok(())
}

/// Pivot the one-row-per-category percentage table into one column per
/// category, broadcast onto every match row. Column names are prefixed so
/// they cannot collide with the per-match category-count columns.
fn broadcast_category_percentages(target: &mut Table, categories: &Table) -> Result<()> {
    let label_idx = categories.col("Category")?;
    let pct_idx = categories.col("Percent Correct")?;
    for row in &categories.rows {
        let header = format!("Percent Correct ({})", row[label_idx]);
        target.push_constant_column(&header, &row[pct_idx]);
    }
    Ok(())
}

fn aggregate_player(player_dir: &Path) -> Result<Table> {
    let files = match_files(player_dir)?;
    let mut tables = Vec::with_capacity(files.len());
    for file in &files {
        tables.push(
            read_table(file, DELIMITER)
                .with_context(|| format!("failed to read {}", file.display()))?,
        );
    }
    let mut combined = concat(tables)
        .with_context(|| format!("no match data under {}", player_dir.display()))?;

    let career_path = player_dir.join("career_stats.csv");
    let career = read_table(&career_path, DELIMITER)
        .with_context(|| format!("failed to read {}", career_path.display()))?;
    broadcast(&mut combined, &career)
        .with_context(|| format!("career stats in {}", career_path.display()))?;

    let latest_path = player_dir.join("latest_league_stats.csv");
    let latest = read_table(&latest_path, DELIMITER)
        .with_context(|| format!("failed to read {}", latest_path.display()))?;
    broadcast_category_percentages(&mut combined, &latest)
        .with_context(|| format!("category stats in {}", latest_path.display()))?;

    Ok(combined)
}

fn drop_forfeits(table: &mut Table) -> Result<()> {
    let result_idx = table.col("Result").context("training set has no Result column")?;
    let sentinel = FORFEIT_SENTINEL.to_string();
    table.retain_rows(|row| row[result_idx] != sentinel);
    Ok(())
}

/// Build `training_set.csv` from the per-player tree. Players whose files
/// are incomplete or inconsistent are skipped with a warning, the same
/// way the scraper tolerates partially scraped players.
pub fn generate(data_dir: &Path) -> Result<Summary> {
    info!("building training set from {}", data_dir.display());

    let agg_dir = data_dir.join(AGGREGATED_DIR);
    fs::create_dir_all(&agg_dir)
        .with_context(|| format!("failed to create {}", agg_dir.display()))?;

    let mut aggregated: Vec<(String, Table)> = Vec::new();
    for player_dir in player_dirs(data_dir)? {
        let player = player_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("...reading data for {player}");
        match aggregate_player(&player_dir) {
            Ok(table) => {
                let path = agg_dir.join(format!("{player}.csv"));
                write_table(&path, &table, DELIMITER)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!("...wrote intermediate file {}", path.display());
                aggregated.push((player, table));
            }
            Err(err) => warn!("skipping {player}: {err:#}"),
        }
    }

    info!("...combining intermediate files");
    let mut players = 0usize;
    let mut training: Option<Table> = None;
    for (player, table) in aggregated {
        match training.as_mut() {
            None => {
                training = Some(table);
                players += 1;
            }
            Some(combined) if combined.headers == table.headers => {
                combined.rows.extend(table.rows);
                players += 1;
            }
            Some(_) => warn!("columns for {player} disagree with the rest, skipping"),
        }
    }
    let mut training = training.context("no players produced aggregated data")?;
    drop_forfeits(&mut training)?;

    let path = data_dir.join(TRAINING_SET_FILE);
    write_table(&path, &training, DELIMITER)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote training set to {}", path.display());

    Ok(Summary {
        players,
        rows: training.len(),
        path,
    })
}
