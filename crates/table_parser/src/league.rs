//! League vocabulary and the per-page-type table normalizers.

use crate::error::TableError;
use crate::spec::TableSpec;
use crate::table::Table;

/// The 18 question categories, in ordinal order. The index of a label in
/// this array is its canonical ordinal.
pub const CATEGORIES: [&str; 18] = [
    "AMER HIST",
    "ART",
    "BUS/ECON",
    "CLASS MUSIC",
    "CURR EVENTS",
    "FILM",
    "FOOD/DRINK",
    "GAMES/SPORT",
    "GEOGRAPHY",
    "LANGUAGE",
    "LIFESTYLE",
    "LITERATURE",
    "MATH",
    "POP MUSIC",
    "SCIENCE",
    "TELEVISION",
    "THEATRE",
    "WORLD HIST",
];

/// Questions per match day.
pub const QUESTIONS_PER_MATCH: usize = 6;

pub fn category_index(label: &str) -> Option<usize> {
    CATEGORIES.iter().position(|c| *c == label)
}

pub fn is_known_category(label: &str) -> bool {
    category_index(label).is_some()
}

/// Rundle letter → difficulty tier. First character only, case sensitive.
/// R (rookie) and E share the lowest tier; A is the hardest.
pub fn rundle_tier(rundle: &str) -> Result<u8, TableError> {
    match rundle.chars().next() {
        Some('R') | Some('E') => Ok(0),
        Some('D') => Ok(1),
        Some('C') => Ok(2),
        Some('B') => Ok(3),
        Some('A') => Ok(4),
        _ => Err(TableError::UnknownRundle(rundle.to_string())),
    }
}

/// Match outcome, win-biased ordinal encoding. Forfeit is the sentinel
/// value the training-set builder filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Forfeit,
    Loss,
    Tie,
    Win,
}

impl MatchResult {
    pub fn from_letter(letter: &str) -> Result<Self, TableError> {
        match letter.chars().next() {
            Some('W') => Ok(Self::Win),
            Some('T') => Ok(Self::Tie),
            Some('L') => Ok(Self::Loss),
            Some('F') => Ok(Self::Forfeit),
            _ => Err(TableError::UnknownResult(letter.to_string())),
        }
    }

    pub fn ordinal(self) -> u8 {
        match self {
            Self::Forfeit => 0,
            Self::Loss => 1,
            Self::Tie => 2,
            Self::Win => 3,
        }
    }
}

/// Ordinal the aggregator treats as "match not played".
pub const FORFEIT_SENTINEL: u8 = 0;

/// Abbreviated stats headers → descriptive names.
pub const STATS_RENAMES: &[(&str, &str)] = &[
    ("W", "Wins"),
    ("L", "Losses"),
    ("T", "Ties"),
    ("PTS", "Points in Standings"),
    ("MPD", "Match Points Differential"),
    ("TMP", "Total Match Points"),
    ("TCA", "Total Correct Answers"),
    ("TPA", "Total Points Allowed"),
    ("CAA", "Correct Answers Allowed"),
    ("UfPA", "Unforced Points Allowed"),
    ("DE", "Defensive Efficiency"),
    ("FW", "Wins by Forfeit"),
    ("FL", "Losses by Forfeit"),
    ("3PT", "3 point questions answered correctly"),
];

/// Category breakdown: current-season columns ignored, career totals kept.
const CATEGORY_SPEC: TableSpec = TableSpec {
    keep: &["Category", "Career", "%"],
    drop: &[],
    rename: &[("%", "Percent Correct")],
};

/// Rank is redundant; PCAA/MCW/QPct have no documented meaning on the site.
const SEASON_STATS_SPEC: TableSpec = TableSpec {
    keep: &[],
    drop: &["Rank", "PCAA", "MCW", "QPct", "Season"],
    rename: STATS_RENAMES,
};

const CAREER_STATS_SPEC: TableSpec = TableSpec {
    keep: &[],
    drop: &["Season", "Rank", "PCAA", "MCW", "QPct", "Rundle"],
    rename: STATS_RENAMES,
};

fn numeric_or_zero(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.parse::<f64>().is_ok() {
        trimmed.to_string()
    } else {
        "0".to_string()
    }
}

/// Normalize the category breakdown table: drop the TOTALS pseudo-row,
/// split the combined `W-L` career field into `# Correct` / `# Incorrect`,
/// blanks become 0. Rows must carry known category labels, one row each.
pub fn category_stats(raw: Table) -> Result<Table, TableError> {
    let mut table = CATEGORY_SPEC.apply(raw);

    let category_idx = table.col("Category")?;
    table.retain_rows(|row| row[category_idx] != "TOTALS");

    let mut seen = [false; CATEGORIES.len()];
    for row in &table.rows {
        let label = &row[category_idx];
        let idx = category_index(label)
            .ok_or_else(|| TableError::UnknownCategory(label.clone()))?;
        if seen[idx] {
            return Err(TableError::UnexpectedShape(format!(
                "duplicate category row: {label:?}"
            )));
        }
        seen[idx] = true;
    }

    table.map_column("Percent Correct", |v| Ok(numeric_or_zero(v)))?;

    let career = table.remove_column("Career")?;
    let mut correct = Vec::with_capacity(career.len());
    let mut incorrect = Vec::with_capacity(career.len());
    for value in &career {
        let (c, i) = match value.split_once('-') {
            Some((c, i)) => (numeric_or_zero(c), numeric_or_zero(i)),
            None => ("0".to_string(), "0".to_string()),
        };
        correct.push(c);
        incorrect.push(i);
    }
    table.push_column("# Correct", correct)?;
    table.push_column("# Incorrect", incorrect)?;
    Ok(table)
}

/// Normalize the per-season stats table: keep only real league seasons
/// (label starts with "LL", dropping career/per-rundle aggregate rows),
/// rundle letters become tier ordinals, headers get descriptive names.
pub fn season_stats(raw: Table) -> Result<Table, TableError> {
    let mut table = raw;
    let season_idx = table.col("Season")?;
    table.retain_rows(|row| row[season_idx].starts_with("LL"));
    table.map_column("Rundle", |v| rundle_tier(v).map(|t| t.to_string()))?;
    Ok(SEASON_STATS_SPEC.apply(table))
}

/// Normalize the career stats table: the stats page marks the aggregate
/// row with "Career" in the Rundle column; exactly that one row survives.
pub fn career_stats(raw: Table) -> Result<Table, TableError> {
    let mut table = raw;
    let rundle_idx = table.col("Rundle")?;
    table.retain_rows(|row| row[rundle_idx] == "Career");
    if table.len() != 1 {
        return Err(TableError::UnexpectedShape(format!(
            "expected one career row, found {}",
            table.len()
        )));
    }
    Ok(CAREER_STATS_SPEC.apply(table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn rundle_tiers_are_monotonic_with_r_and_e_shared() {
        let tiers: Vec<u8> = ["R", "E", "D", "C", "B", "A"]
            .iter()
            .map(|c| rundle_tier(c).unwrap())
            .collect();
        assert_eq!(tiers[0], tiers[1]);
        for pair in tiers.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        // Full strings map through their first character only.
        assert_eq!(rundle_tier("C Sugarloaf Div 1").unwrap(), 2);
        assert!(rundle_tier("x").is_err());
        assert!(rundle_tier("").is_err());
    }

    #[test]
    fn category_ordinals_are_a_bijection() {
        let indices: HashSet<usize> = CATEGORIES
            .iter()
            .map(|c| category_index(c).unwrap())
            .collect();
        assert_eq!(indices.len(), CATEGORIES.len());
        assert!(category_index("BASKET WEAVING").is_none());
    }

    #[test]
    fn result_letters_use_win_biased_encoding() {
        let ordinals: Vec<u8> = ["W", "T", "L", "F"]
            .iter()
            .map(|l| MatchResult::from_letter(l).unwrap().ordinal())
            .collect();
        assert_eq!(ordinals, vec![3, 2, 1, 0]);
        assert_eq!(MatchResult::Forfeit.ordinal(), FORFEIT_SENTINEL);
        assert!(MatchResult::from_letter("X").is_err());
    }

    fn category_table(rows: &[(&str, &str, &str)]) -> Table {
        let mut t = Table::new(
            ["Category", "Career", "%"].iter().map(|s| s.to_string()).collect(),
        );
        for (cat, career, pct) in rows {
            t.rows.push(vec![cat.to_string(), career.to_string(), pct.to_string()]);
        }
        t
    }

    #[test]
    fn category_stats_drops_totals_and_splits_career() {
        let raw = category_table(&[("AMER HIST", "10-2", "83.3"), ("TOTALS", "-", "-")]);
        let out = category_stats(raw).unwrap();
        assert_eq!(out.len(), 1);
        let row = &out.rows[0];
        assert_eq!(row[out.col("Category").unwrap()], "AMER HIST");
        assert_eq!(row[out.col("# Correct").unwrap()], "10");
        assert_eq!(row[out.col("# Incorrect").unwrap()], "2");
        assert_eq!(row[out.col("Percent Correct").unwrap()], "83.3");
    }

    #[test]
    fn category_stats_zero_fills_blank_cells() {
        let raw = category_table(&[("MATH", "", "")]);
        let out = category_stats(raw).unwrap();
        let row = &out.rows[0];
        assert_eq!(row[out.col("# Correct").unwrap()], "0");
        assert_eq!(row[out.col("# Incorrect").unwrap()], "0");
        assert_eq!(row[out.col("Percent Correct").unwrap()], "0");
    }

    #[test]
    fn category_stats_rejects_unknown_and_duplicate_labels() {
        assert!(matches!(
            category_stats(category_table(&[("KNITTING", "1-1", "50")])),
            Err(TableError::UnknownCategory(_))
        ));
        assert!(matches!(
            category_stats(category_table(&[("ART", "1-1", "50"), ("ART", "2-0", "100")])),
            Err(TableError::UnexpectedShape(_))
        ));
    }

    fn stats_table() -> Table {
        let headers = [
            "Season", "Rank", "Rundle", "W", "L", "T", "PTS", "MPD", "TMP", "TCA",
            "PCAA", "TPA", "CAA", "UfPA", "QPct", "DE", "MCW", "FW", "FL", "3PT",
        ];
        let mut t = Table::new(headers.iter().map(|s| s.to_string()).collect());
        let season = |season: &str, rundle: &str| {
            let mut row = vec![season.to_string(), "4".to_string(), rundle.to_string()];
            row.extend((0..17).map(|n| n.to_string()));
            row
        };
        t.rows.push(season("LL97", "B Coastal"));
        t.rows.push(season("LL98", "E Mesa"));
        t.rows.push(season("Total (B)", "B"));
        t.rows.push(season("Career", "Career"));
        t
    }

    #[test]
    fn season_stats_keeps_league_rows_and_renames() {
        let out = season_stats(stats_table()).unwrap();
        assert_eq!(out.len(), 2);
        assert!(!out.has_col("Season"));
        assert!(!out.has_col("Rank"));
        assert!(!out.has_col("PCAA"));
        assert!(out.has_col("Wins"));
        assert!(out.has_col("3 point questions answered correctly"));
        assert_eq!(out.column_values("Rundle").unwrap(), vec!["3", "0"]);
    }

    #[test]
    fn career_stats_keeps_exactly_the_career_row() {
        let out = career_stats(stats_table()).unwrap();
        assert_eq!(out.len(), 1);
        assert!(!out.has_col("Rundle"));
        assert!(!out.has_col("Season"));
        assert!(out.has_col("Defensive Efficiency"));
    }

    #[test]
    fn career_stats_requires_a_career_row() {
        let mut raw = stats_table();
        raw.rows.truncate(2);
        assert!(matches!(
            career_stats(raw),
            Err(TableError::UnexpectedShape(_))
        ));
    }
}
