//! Branch roster discovery: a branch page lists its members as the same
//! `a.flag` links profile pages use for opponents.

use std::collections::HashSet;

use anyhow::Result;
use tracing::{info, warn};

use league_session::{LeagueSession, BASE_URL};

use crate::history;

/// Player ids of every member of the named branches. Branches that fail
/// to load are skipped with a warning.
pub fn branch_player_ids<'a>(
    session: &LeagueSession,
    branches: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<HashSet<String>> {
    let mut ids = HashSet::new();
    for (branch_id, branch_name) in branches {
        info!("scraping player ids from branch {branch_name}");
        let url = format!("{BASE_URL}/branch.php?{branch_id}");
        if let Err(err) = session.page().goto(&url) {
            warn!("branch {branch_name} failed to load: {err}");
            continue;
        }
        let body = match session.page().body_html() {
            Ok(body) => body,
            Err(err) => {
                warn!("branch {branch_name} content unavailable: {err}");
                continue;
            }
        };
        match history::flag_ids(&body) {
            Ok(found) => ids.extend(found),
            Err(err) => warn!("branch {branch_name} member links did not parse: {err}"),
        }
    }
    Ok(ids)
}

/// Placeholder display name for players discovered only through a branch.
pub fn placeholder_name(player_id: &str) -> String {
    format!("Player_{player_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_names_embed_the_player_id() {
        assert_eq!(placeholder_name("abc123"), "Player_abc123");
    }

    #[test]
    fn flag_ids_extracts_member_ids_from_branch_markup() {
        let html = r#"
            <table>
              <tr><td><a class="flag" href="/profiles.php?frodo42">F</a></td></tr>
              <tr><td><a class="flag" href="/profiles.php?sam7">S</a></td></tr>
              <tr><td><a href="/profiles.php?not_a_flag">N</a></td></tr>
            </table>"#;
        let ids = history::flag_ids(html).unwrap();
        assert_eq!(ids, vec!["frodo42", "sam7"]);
    }
}
