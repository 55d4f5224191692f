//! Per-player scraping across the three profile views, with a run-scoped
//! season cache so public match-day pages are fetched once per season no
//! matter how many players shared that season.

pub mod branches;
pub mod cache;
pub mod history;
mod scraper;

pub use cache::SeasonCache;
pub use history::HistoryError;
pub use scraper::PlayerScraper;
