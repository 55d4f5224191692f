// Aggregator behavior over a realistic per-player file tree: career
// broadcast, forfeit filtering, and idempotence against its own output.

use std::fs;
use std::path::{Path, PathBuf};

use table_parser::{read_table, write_table, Table};

struct TempTree {
    root: PathBuf,
}

impl TempTree {
    fn new(tag: &str) -> Self {
        let root = std::env::temp_dir().join(format!(
            "league_harvest_{tag}_{}",
            std::process::id()
        ));
        fs::remove_dir_all(&root).ok();
        fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    fn path(&self) -> &Path {
        &self.root
    }
}

impl Drop for TempTree {
    fn drop(&mut self) {
        fs::remove_dir_all(&self.root).ok();
    }
}

fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
    let mut t = Table::new(headers.iter().map(|s| s.to_string()).collect());
    for row in rows {
        t.rows.push(row.iter().map(|s| s.to_string()).collect());
    }
    t
}

fn write_player(dir: &Path, name: &str, match_rows: &[&[&str]], wins: &str) {
    let player_dir = dir.join(name);
    fs::create_dir_all(&player_dir).unwrap();
    write_table(
        &player_dir.join("match_stats_LL99.csv"),
        &table(&["Result", "Rundle", "Opponent", "ART", "MATH"], match_rows),
        b'\t',
    )
    .unwrap();
    write_table(
        &player_dir.join("career_stats.csv"),
        &table(&["Wins", "Losses"], &[&[wins, "4"]]),
        b'\t',
    )
    .unwrap();
    write_table(
        &player_dir.join("latest_league_stats.csv"),
        &table(
            &["Category", "Percent Correct", "# Correct", "# Incorrect"],
            &[&["ART", "61.5", "8", "5"], &["MATH", "80", "4", "1"]],
        ),
        b'\t',
    )
    .unwrap();
}

fn seed(dir: &Path) {
    write_player(
        dir,
        "alice",
        &[&["3", "2", "frodo42", "4", "2"], &["0", "2", "sam7", "3", "3"]],
        "10",
    );
    write_player(dir, "bob", &[&["1", "0", "pippin9", "1", "5"]], "2");

    // Season byproducts of scraping, never training-set input.
    let seasons = dir.join("seasons");
    fs::create_dir_all(&seasons).unwrap();
    write_table(
        &seasons.join("match_categories_LL99.csv"),
        &table(&["ART", "MATH"], &[&["4", "2"]]),
        b'\t',
    )
    .unwrap();
}

#[test]
fn broadcasts_career_stats_and_drops_forfeits() {
    let tree = TempTree::new("aggregate");
    seed(tree.path());

    let summary = training_set::generate(tree.path()).unwrap();
    assert_eq!(summary.players, 2);
    // Three match rows total, one is a forfeit.
    assert_eq!(summary.rows, 2);

    let training = read_table(&summary.path, b'\t').unwrap();
    let result_idx = training.col("Result").unwrap();
    assert!(training.rows.iter().all(|row| row[result_idx] != "0"));

    // Career scalars repeated on every row of that player.
    let wins_idx = training.col("Wins").unwrap();
    let opponent_idx = training.col("Opponent").unwrap();
    for row in &training.rows {
        match row[opponent_idx].as_str() {
            "frodo42" => assert_eq!(row[wins_idx], "10"),
            "pippin9" => assert_eq!(row[wins_idx], "2"),
            other => panic!("unexpected opponent {other}"),
        }
    }

    // Pivoted category percentages present alongside the count columns.
    let pct_idx = training.col("Percent Correct (ART)").unwrap();
    assert_eq!(training.rows[0][pct_idx], "61.5");
    assert!(training.col("ART").is_ok());
}

#[test]
fn rerun_is_byte_identical_and_ignores_own_byproducts() {
    let tree = TempTree::new("idempotent");
    seed(tree.path());

    let first = training_set::generate(tree.path()).unwrap();
    let first_bytes = fs::read(&first.path).unwrap();

    // Second pass rescans a tree that now contains aggregated/ and
    // training_set.csv from the first pass.
    let second = training_set::generate(tree.path()).unwrap();
    let second_bytes = fs::read(&second.path).unwrap();

    assert_eq!(second.players, first.players);
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn incomplete_players_are_skipped_not_fatal() {
    let tree = TempTree::new("partial");
    seed(tree.path());

    // A player that timed out before any match file was written.
    fs::create_dir_all(tree.path().join("ghost")).unwrap();

    let summary = training_set::generate(tree.path()).unwrap();
    assert_eq!(summary.players, 2);
    assert!(!tree.path().join("aggregated/ghost.csv").exists());
}
