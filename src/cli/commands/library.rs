//! Saved library commands

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;

use crate::cli::output::{format_game_row, print_error, print_formatted, OutputFormat};
use crate::cli::session::Session;
use crate::library::{FileStore, LIBRARY_KEY};
use crate::model::GameSummary;

#[derive(Subcommand, Debug)]
pub enum LibraryCommands {
    /// List saved games
    List,

    /// Save a game, or remove it if already saved
    Toggle {
        /// Game id
        id: u64,
    },

    /// Show the library file path
    Path,
}

#[derive(Serialize)]
struct ToggleResult {
    id: u64,
    name: String,
    saved: bool,
    count: usize,
}

#[derive(Serialize)]
struct LibraryPathResult {
    path: String,
    exists: bool,
}

pub async fn run(command: LibraryCommands, session: &mut Session, format: OutputFormat) -> Result<()> {
    match command {
        LibraryCommands::List => list(session, format),
        LibraryCommands::Toggle { id } => toggle(id, session, format).await,
        LibraryCommands::Path => path(session, format),
    }
}

fn list(session: &Session, format: OutputFormat) -> Result<()> {
    let games = session.library.snapshot();

    print_formatted(&*games, format, |games: &Vec<GameSummary>| {
        if games.is_empty() {
            return "Your library is empty. Save games with `library toggle <id>`.".to_string();
        }

        let mut out = format!("{} saved games\n\n", games.len());
        let rows: Vec<String> = games.iter().map(|g| format_game_row(g, true)).collect();
        out.push_str(&rows.join("\n"));
        out
    });
    Ok(())
}

async fn toggle(id: u64, session: &mut Session, format: OutputFormat) -> Result<()> {
    let game = session
        .find_summary(id)
        .await
        .with_context(|| format!("Game {} not found", id))?;

    let games = match session.library.toggle(&game) {
        Ok(games) => games,
        Err(e) => {
            print_error(&format!("Failed to save library: {}", e));
            session.library.snapshot()
        }
    };

    let result = ToggleResult {
        id,
        name: game.name.clone(),
        saved: games.iter().any(|g| g.id == id),
        count: games.len(),
    };

    print_formatted(&result, format, |r| {
        if r.saved {
            format!("Added {} to library ({} saved)", r.name, r.count)
        } else {
            format!("Removed {} from library ({} saved)", r.name, r.count)
        }
    });
    Ok(())
}

fn path(session: &Session, format: OutputFormat) -> Result<()> {
    let store = FileStore::new(session.config.data_dir()?);
    let path = store.path_for(LIBRARY_KEY);

    let result = LibraryPathResult {
        path: path.to_string_lossy().to_string(),
        exists: path.exists(),
    };

    print_formatted(&result, format, |r| {
        format!("{}{}", r.path, if r.exists { "" } else { " (not found)" })
    });
    Ok(())
}
