//! Free-text search command

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{format_game_row, print_formatted, OutputFormat};
use crate::cli::session::Session;
use crate::model::GameSummary;

#[derive(Serialize)]
struct SearchResult<'a> {
    query: &'a str,
    games: &'a [GameSummary],
}

/// Search the catalog. The query goes through the session's debouncer, so
/// rapid successive searches in the shell only reach the API once settled.
pub async fn run(query: &str, session: &mut Session, format: OutputFormat) -> Result<()> {
    session.search.input(query);
    let results = session.search.settled().await;

    let result = SearchResult {
        query: &results.query,
        games: &results.games,
    };

    print_formatted(&result, format, |r| {
        if r.query.trim().is_empty() {
            return "Search cleared.".to_string();
        }
        if r.games.is_empty() {
            return format!("No games found for \"{}\"", r.query.trim());
        }

        r.games
            .iter()
            .map(|g| format_game_row(g, session.library.contains(g.id)))
            .collect::<Vec<_>>()
            .join("\n")
    });

    Ok(())
}
