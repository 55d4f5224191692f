use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use league_session::{LeagueSession, BASE_URL};
use logger::{now_iso, EventLogger, FetchTimeoutEvent, PlayerScrapedEvent, SeasonCachedEvent};
use table_parser::{league, write_table, Table};

use crate::cache::SeasonCache;
use crate::history;

const CATEGORY_TABLE_SELECTOR: &str = "div.fl_latest.fl_l_l.pldata";
const STATS_CONTAINER_SELECTOR: &str = ".statscontainer";
const SEASON_FRAGMENT_SELECTOR: &str = "div.fl_latest.fl_l_l";

const DELIMITER: u8 = b'\t';

/// The three profile views scraped per player.
#[derive(Debug, Clone, Copy)]
enum ProfileView {
    Latest,
    Stats,
    PastSeasons,
}

impl ProfileView {
    fn query(self) -> u8 {
        match self {
            Self::Latest => 1,
            Self::Stats => 2,
            Self::PastSeasons => 7,
        }
    }
}

fn profile_url(player_id: &str, view: ProfileView) -> String {
    format!("{BASE_URL}/profiles.php?{player_id}&{}", view.query())
}

/// A scrape section is skipped only when file checking is on and every
/// file it would produce is already there; a partial set is re-scraped.
fn all_on_disk(check_files: bool, paths: &[&Path]) -> bool {
    check_files && paths.iter().all(|p| p.exists())
}

/// Scrapes one player at a time through an authenticated session and
/// writes tab-delimited files under the data directory. Each section
/// failure is logged and skipped; the batch always moves to the next
/// player with whatever partial data made it to disk.
pub struct PlayerScraper<'a> {
    session: &'a LeagueSession,
    data_dir: PathBuf,
    check_files: bool,
    events: EventLogger,
}

impl<'a> PlayerScraper<'a> {
    pub fn new(session: &'a LeagueSession, data_dir: impl Into<PathBuf>, check_files: bool) -> Self {
        Self {
            session,
            data_dir: data_dir.into(),
            check_files,
            events: EventLogger::new("logs"),
        }
    }

    /// Scrape all three views for one player. Errors returned here are
    /// setup-level (directory creation); per-section scrape failures are
    /// handled inside and never abort the player, let alone the batch.
    pub fn scrape_player(
        &self,
        cache: &mut SeasonCache,
        player_id: &str,
        player_name: &str,
    ) -> Result<()> {
        let player_dir = self.data_dir.join(player_name.to_lowercase());
        fs::create_dir_all(&player_dir)
            .with_context(|| format!("failed to create {}", player_dir.display()))?;

        self.scrape_category_stats(player_id, player_name, &player_dir);
        self.scrape_stats(player_id, player_name, &player_dir);
        self.scrape_match_history(cache, player_id, player_name, &player_dir)?;
        Ok(())
    }

    fn scrape_category_stats(&self, player_id: &str, player_name: &str, player_dir: &Path) {
        let path = player_dir.join("latest_league_stats.csv");
        if all_on_disk(self.check_files, &[&path]) {
            info!("{} already exists, skipping", path.display());
            return;
        }
        info!("scraping categorical stats for {player_name}");

        let url = profile_url(player_id, ProfileView::Latest);
        if let Err(err) = self.session.page().goto(&url) {
            warn!("navigation failed for {player_name}: {err}");
            return;
        }
        let Some(html) = self.session.page().element_html(CATEGORY_TABLE_SELECTOR) else {
            warn!("category table missing for {player_name}, player is likely inactive");
            let _ = self.events.log(&FetchTimeoutEvent {
                ts: now_iso(),
                event: "FETCH_TIMEOUT",
                player_id: player_id.to_string(),
                url,
            });
            return;
        };

        match Table::from_html(&html).and_then(league::category_stats) {
            Ok(table) => self.write(&path, &table),
            Err(err) => warn!("category table for {player_name} did not parse: {err}"),
        }
    }

    fn scrape_stats(&self, player_id: &str, player_name: &str, player_dir: &Path) {
        let season_path = player_dir.join("per_season_stats.csv");
        let career_path = player_dir.join("career_stats.csv");
        if all_on_disk(self.check_files, &[&season_path, &career_path]) {
            info!("stats files for {player_name} already exist, skipping");
            return;
        }
        info!("scraping season/career stats for {player_name}");

        let url = profile_url(player_id, ProfileView::Stats);
        if let Err(err) = self.session.page().goto(&url) {
            warn!("navigation failed for {player_name}: {err}");
            return;
        }
        let Some(html) = self.session.page().element_html(STATS_CONTAINER_SELECTOR) else {
            warn!("stats table missing for {player_name}");
            let _ = self.events.log(&FetchTimeoutEvent {
                ts: now_iso(),
                event: "FETCH_TIMEOUT",
                player_id: player_id.to_string(),
                url,
            });
            return;
        };

        // One fetch feeds both normalizers.
        let raw = match Table::from_html(&html) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("stats table for {player_name} did not parse: {err}");
                return;
            }
        };
        match league::season_stats(raw.clone()) {
            Ok(table) => self.write(&season_path, &table),
            Err(err) => warn!("season stats for {player_name} did not parse: {err}"),
        }
        match league::career_stats(raw) {
            Ok(table) => self.write(&career_path, &table),
            Err(err) => warn!("career stats for {player_name} did not parse: {err}"),
        }
    }

    fn has_match_files(&self, player_dir: &Path) -> bool {
        let Ok(entries) = fs::read_dir(player_dir) else {
            return false;
        };
        entries
            .filter_map(|e| e.ok())
            .any(|e| e.file_name().to_string_lossy().starts_with("match_stats_"))
    }

    fn scrape_match_history(
        &self,
        cache: &mut SeasonCache,
        player_id: &str,
        player_name: &str,
        player_dir: &Path,
    ) -> Result<()> {
        if self.check_files && self.has_match_files(player_dir) {
            info!("match files for {player_name} already exist, skipping");
            return Ok(());
        }
        info!("scraping match history for {player_name}");

        let url = profile_url(player_id, ProfileView::PastSeasons);
        if let Err(err) = self.session.page().goto(&url) {
            warn!("navigation failed for {player_name}: {err}");
            return Ok(());
        }
        let fragments = self.session.page().elements_html(SEASON_FRAGMENT_SELECTOR);
        if fragments.len() < 2 {
            warn!("no season history found for {player_name}");
            return Ok(());
        }

        let mut seasons_written = 0usize;
        // The first fragment is the profile header, not match data.
        for fragment in &fragments[1..] {
            let parsed = match history::parse_season_fragment(fragment, BASE_URL) {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!("skipping a season for {player_name}: {err}");
                    continue;
                }
            };
            info!("...season {}", parsed.season);

            if !cache.contains(&parsed.season) {
                // Match-day fetches run in their own tab so the outer
                // page keeps its place in the season list.
                let detail = self.session.open_page()?;
                let counts = match history::cached_season_counts(
                    cache,
                    &parsed.season,
                    &parsed.match_urls,
                    |match_url| {
                        info!("....fetching question categories from {match_url}");
                        detail.goto(match_url)?;
                        detail.body_html()
                    },
                ) {
                    Ok(counts) => counts,
                    Err(err) => {
                        warn!("question categories for {} failed: {err}", parsed.season);
                        continue;
                    }
                };
                let _ = self.events.log(&SeasonCachedEvent {
                    ts: now_iso(),
                    event: "SEASON_CACHED",
                    season: parsed.season.clone(),
                    matches: counts.len(),
                });
                self.write_season_counts(&parsed.season, &counts);
            } else {
                info!("....already have question categories for {}", parsed.season);
            }

            let Some(counts) = cache.get(&parsed.season) else {
                continue;
            };
            let mut matches = parsed.match_table();
            if let Err(err) = matches.join_by_index(counts) {
                warn!(
                    "category counts for {} do not line up for {player_name}: {err}",
                    parsed.season
                );
                continue;
            }
            let path = player_dir.join(format!("match_stats_{}.csv", parsed.season));
            self.write(&path, &matches);
            seasons_written += 1;
        }

        let _ = self.events.log(&PlayerScrapedEvent {
            ts: now_iso(),
            event: "PLAYER_SCRAPED",
            player_id: player_id.to_string(),
            player_name: player_name.to_string(),
            seasons: seasons_written,
        });
        Ok(())
    }

    /// Shared per-season category counts under `seasons/`, written once
    /// per run when a season first enters the cache.
    fn write_season_counts(&self, season: &str, counts: &Table) {
        let seasons_dir = self.data_dir.join("seasons");
        if let Err(err) = fs::create_dir_all(&seasons_dir) {
            warn!("failed to create {}: {err}", seasons_dir.display());
            return;
        }
        let path = seasons_dir.join(format!("match_categories_{season}.csv"));
        if all_on_disk(self.check_files, &[&path]) {
            return;
        }
        self.write(&path, counts);
    }

    fn write(&self, path: &Path, table: &Table) {
        info!("writing {}", path.display());
        if let Err(err) = write_table(path, table, DELIMITER) {
            warn!("failed to write {}: {err}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_stats_files_do_not_skip_the_section() {
        let dir = std::env::temp_dir().join(format!(
            "league_harvest_scraper_{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        let season = dir.join("per_season_stats.csv");
        let career = dir.join("career_stats.csv");

        fs::write(&season, "Season\n").unwrap();
        assert!(!all_on_disk(true, &[&season, &career]));

        fs::write(&career, "Wins\n").unwrap();
        assert!(all_on_disk(true, &[&season, &career]));
        assert!(!all_on_disk(false, &[&season, &career]));

        fs::remove_dir_all(&dir).ok();
    }
}
