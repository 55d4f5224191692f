//! Match-history parsing: one `div.fl_latest.fl_l_l` fragment per season
//! on the past-seasons profile view, plus per-match-day question pages.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};
use thiserror::Error;

use table_parser::league::{
    category_index, rundle_tier, MatchResult, CATEGORIES, QUESTIONS_PER_MATCH,
};
use table_parser::{Table, TableError};

use crate::cache::SeasonCache;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("season fragment has no LL season link")]
    MissingSeason,

    #[error("season heading has no rundle letter: {0:?}")]
    MissingRundle(String),

    /// Seasons before LL60 use a different match-page layout. Known gap;
    /// the season is skipped, the batch goes on.
    #[error("match page layout unsupported: {0}")]
    UnsupportedLayout(String),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("match page fetch failed: {0}")]
    Fetch(String),
}

fn season_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^LL\d+$").expect("static regex"))
}

fn sel(s: &str) -> Result<Selector, HistoryError> {
    Selector::parse(s).map_err(|_| TableError::Selector(s.to_string()).into())
}

/// Everything extracted from one season's fragment on the past-seasons
/// page: the player-specific columns plus the public match-day URLs.
#[derive(Debug)]
pub struct SeasonFragment {
    pub season: String,
    pub rundle_tier: u8,
    /// Result ordinals, one per match day, in page order.
    pub results: Vec<String>,
    /// Opponent ids, aligned with `results` (padded when the page shows
    /// fewer flags than match rows).
    pub opponents: Vec<String>,
    pub match_urls: Vec<String>,
}

impl SeasonFragment {
    /// Player-specific match table: Result, Rundle, Opponent. The season
    /// category counts join onto this by row index.
    pub fn match_table(&self) -> Table {
        let mut table = Table::new(vec![
            "Result".to_string(),
            "Rundle".to_string(),
            "Opponent".to_string(),
        ]);
        let rundle = self.rundle_tier.to_string();
        for (i, result) in self.results.iter().enumerate() {
            let opponent = self.opponents.get(i).cloned().unwrap_or_default();
            table.rows.push(vec![result.clone(), rundle.clone(), opponent]);
        }
        table
    }
}

/// Ids carried in `a.flag` href query strings, in document order. The
/// same link shape identifies opponents on profile pages and members on
/// branch pages.
pub fn flag_ids(html: &str) -> Result<Vec<String>, HistoryError> {
    let doc = Html::parse_fragment(html);
    let flag_sel = sel("a.flag")?;
    Ok(doc
        .select(&flag_sel)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| href.split('?').nth(1))
        .map(str::to_string)
        .collect())
}

/// Parse one season fragment from the past-seasons view.
pub fn parse_season_fragment(html: &str, base_url: &str) -> Result<SeasonFragment, HistoryError> {
    let doc = Html::parse_fragment(html);
    let link_sel = sel("a")?;
    let heading_sel = sel("h3")?;

    let season = doc
        .select(&link_sel)
        .map(|a| a.text().collect::<String>().trim().to_string())
        .find(|text| season_link_re().is_match(text))
        .ok_or(HistoryError::MissingSeason)?;

    // Heading reads like "Rundle C Sugarloaf Div 1"; the tier letter sits
    // at a fixed offset.
    let heading = doc
        .select(&heading_sel)
        .next()
        .map(|h| h.text().collect::<String>())
        .ok_or_else(|| HistoryError::MissingRundle(String::new()))?;
    let letter = heading
        .chars()
        .nth(7)
        .ok_or_else(|| HistoryError::MissingRundle(heading.clone()))?;
    let rundle_tier = rundle_tier(&letter.to_string())
        .map_err(|_| HistoryError::MissingRundle(heading.clone()))?;

    let raw = Table::from_html(html)?;
    let mut results = Vec::with_capacity(raw.len());
    for letter in raw.column_values("Result")? {
        results.push(MatchResult::from_letter(&letter)?.ordinal().to_string());
    }

    let opponents = flag_ids(html)?;

    let match_urls = doc
        .select(&link_sel)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.contains("match_day.php"))
        .map(|href| format!("{base_url}{href}"))
        .collect();

    Ok(SeasonFragment {
        season,
        rundle_tier,
        results,
        opponents,
        match_urls,
    })
}

/// Category of each of the 6 questions on a match-day page. The question
/// blocks render as "Q1 CATEGORY - question text…".
pub fn question_categories(body_html: &str) -> Result<Vec<String>, HistoryError> {
    let doc = Html::parse_document(body_html);
    let question_sel = sel("div.ind-Q20.dont-break-out")?;

    let mut labels = Vec::with_capacity(QUESTIONS_PER_MATCH);
    for question in doc.select(&question_sel).take(QUESTIONS_PER_MATCH) {
        let text = question.text().collect::<String>();
        let text = text.trim();
        let end = text
            .find(" -")
            .ok_or_else(|| HistoryError::UnsupportedLayout(preview(text)))?;
        if end <= 3 || !text.is_char_boundary(3) {
            return Err(HistoryError::UnsupportedLayout(preview(text)));
        }
        labels.push(text[3..end].trim().to_string());
    }

    if labels.len() != QUESTIONS_PER_MATCH {
        return Err(HistoryError::UnsupportedLayout(format!(
            "found {} question blocks, expected {}",
            labels.len(),
            QUESTIONS_PER_MATCH
        )));
    }
    Ok(labels)
}

fn preview(text: &str) -> String {
    text.chars().take(40).collect()
}

/// Fetch every match-day page of a season and tally question categories
/// per match row. One column per category, counts per row sum to 6.
pub fn season_category_counts<F>(
    match_urls: &[String],
    mut fetch: F,
) -> Result<Table, HistoryError>
where
    F: FnMut(&str) -> anyhow::Result<String>,
{
    let mut table = Table::new(CATEGORIES.iter().map(|c| c.to_string()).collect());
    for url in match_urls {
        let body = fetch(url).map_err(|e| HistoryError::Fetch(format!("{url}: {e}")))?;
        let mut counts = [0u8; CATEGORIES.len()];
        for label in question_categories(&body)? {
            let idx = category_index(&label)
                .ok_or(TableError::UnknownCategory(label))?;
            counts[idx] += 1;
        }
        table
            .rows
            .push(counts.iter().map(|c| c.to_string()).collect());
    }
    Ok(table)
}

/// Cache-aware front of `season_category_counts`: a hit costs zero
/// fetches, a miss fetches every match day and stores the counts.
pub fn cached_season_counts<F>(
    cache: &mut SeasonCache,
    season: &str,
    match_urls: &[String],
    fetch: F,
) -> Result<Table, HistoryError>
where
    F: FnMut(&str) -> anyhow::Result<String>,
{
    if let Some(counts) = cache.get(season) {
        return Ok(counts.clone());
    }
    let counts = season_category_counts(match_urls, fetch)?;
    cache.insert(season.to_string(), counts.clone());
    Ok(counts)
}
