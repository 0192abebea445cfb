//! Output formatting utilities for CLI

use serde::Serialize;

use crate::model::GameSummary;
use crate::pagination::Paginator;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print a serializable value as JSON or use custom text formatter
pub fn print_formatted<T, F>(value: &T, format: OutputFormat, text_formatter: F)
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Text => println!("{}", text_formatter(value)),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }
}

/// Print a success message (suppressed in quiet mode)
pub fn print_success(message: &str, quiet: bool) {
    if !quiet {
        println!("{}", message);
    }
}

/// Print an error message (never suppressed)
pub fn print_error(message: &str) {
    eprintln!("Error: {}", message);
}

/// One game as a table row: saved marker, id, name, rating, year, genres
pub fn format_game_row(game: &GameSummary, saved: bool) -> String {
    format!(
        "{} {:>7}  {:<40} {:>4}  {:>4}  {}",
        if saved { "*" } else { " " },
        game.id,
        truncate(&game.name, 40),
        game.rating_display(),
        game.year_display(),
        game.genre_names(2).join(", ")
    )
}

/// Page indicator with the visible page buttons, current page bracketed
pub fn format_pager(pager: &Paginator) -> String {
    let buttons: Vec<String> = pager
        .window()
        .into_iter()
        .map(|p| {
            if p == pager.current() {
                format!("[{}]", p)
            } else {
                p.to_string()
            }
        })
        .collect();

    format!(
        "Page {} of {}   {} {} {}",
        pager.current(),
        pager.total_pages(),
        if pager.has_previous() { "<" } else { " " },
        buttons.join(" "),
        if pager.has_next() { ">" } else { " " }
    )
}

/// Shorten `text` to at most `max` characters, marking the cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
