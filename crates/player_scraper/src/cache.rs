use std::collections::HashMap;

use table_parser::Table;

/// Season id → per-match category-count table (count columns only, no
/// result/rundle/opponent). Match-day pages are public, so the counts are
/// identical for every player in that season; whoever hits a season first
/// pays the fetches, everyone after joins from here. Lives for one run,
/// never touches disk, no eviction (the league has a bounded number of
/// seasons).
#[derive(Debug, Default)]
pub struct SeasonCache {
    tables: HashMap<String, Table>,
}

impl SeasonCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, season: &str) -> bool {
        self.tables.contains_key(season)
    }

    pub fn get(&self, season: &str) -> Option<&Table> {
        self.tables.get(season)
    }

    pub fn insert(&mut self, season: String, counts: Table) {
        self.tables.insert(season, counts);
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
