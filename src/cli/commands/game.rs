//! Game details commands

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;

use crate::cli::output::{print_error, print_formatted, print_success, OutputFormat};
use crate::cli::session::Session;
use crate::model::{format_release_date, strip_html, GameDetails, Label, Screenshot};
use crate::rawg::CatalogSource;

#[derive(Subcommand, Debug)]
pub enum GameCommands {
    /// Show details and screenshots for a game
    Show {
        /// Game id
        id: u64,
    },

    /// Move through the open game's screenshots (needs `game show` earlier in the same `shell`)
    Shot {
        /// "next", "prev", or a screenshot number (1-based)
        target: String,
    },

    /// Open the game's website in the browser
    Open {
        /// Game id (defaults to the open game)
        id: Option<u64>,
    },

    /// Close the open game
    Close,
}

/// JSON-serializable details view
#[derive(Serialize)]
struct GameView<'a> {
    game: &'a GameDetails,
    saved: bool,
    screenshot_index: usize,
    screenshots: &'a [Screenshot],
}

#[derive(Serialize)]
struct ScreenshotView<'a> {
    index: usize,
    count: usize,
    image: Option<&'a str>,
}

pub async fn run(command: GameCommands, session: &mut Session, format: OutputFormat, quiet: bool) -> Result<()> {
    match command {
        GameCommands::Show { id } => show(id, session, format).await,
        GameCommands::Shot { target } => shot(&target, session, format),
        GameCommands::Open { id } => open_page(id, session, quiet).await,
        GameCommands::Close => {
            session.details.close();
            print_success("Closed game view", quiet);
            Ok(())
        }
    }
}

async fn show(id: u64, session: &mut Session, format: OutputFormat) -> Result<()> {
    session.details.open(session.client.as_ref(), id).await;

    let Some(game) = session.details.details.as_ref() else {
        print_error(&format!("Could not load game {}", id));
        return Ok(());
    };

    let view = GameView {
        game,
        saved: session.library.contains(id),
        screenshot_index: session.details.screenshots.index(),
        screenshots: session.details.screenshots.items(),
    };

    print_formatted(&view, format, format_details_text);
    Ok(())
}

fn shot(target: &str, session: &mut Session, format: OutputFormat) -> Result<()> {
    if session.details.viewing().is_none() {
        anyhow::bail!("No game open. Use `game show <id>` first.");
    }

    let carousel = &mut session.details.screenshots;
    if carousel.is_empty() {
        anyhow::bail!("The open game has no screenshots");
    }

    match target {
        "next" => carousel.next(),
        "prev" | "previous" => carousel.previous(),
        n => {
            let n: usize = n
                .parse()
                .with_context(|| format!("Expected next, prev or a number, got {:?}", n))?;
            // Out-of-range numbers are ignored, like clicking a missing dot
            if let Some(index) = n.checked_sub(1) {
                carousel.go_to(index);
            }
        }
    }

    let view = ScreenshotView {
        index: carousel.index(),
        count: carousel.len(),
        image: carousel.current().map(|s| s.image.as_str()),
    };

    print_formatted(&view, format, |v| {
        format!("Screenshot {}/{}: {}", v.index + 1, v.count, v.image.unwrap_or_default())
    });
    Ok(())
}

async fn open_page(id: Option<u64>, session: &mut Session, quiet: bool) -> Result<()> {
    let id = id
        .or(session.details.viewing())
        .context("No game open. Pass a game id.")?;

    let details = match session.details.details.as_ref().filter(|d| d.id == id) {
        Some(details) => Some(details.clone()),
        None => session.client.game_details(id).await,
    };

    let url = details
        .as_ref()
        .and_then(|d| d.web_page())
        .with_context(|| format!("No web page known for game {}", id))?;

    open::that(&url).with_context(|| format!("Failed to open {}", url))?;
    print_success(&format!("Opened {}", url), quiet);
    Ok(())
}

fn join_names(labels: &[Label]) -> String {
    if labels.is_empty() {
        "N/A".to_string()
    } else {
        labels.iter().map(|l| l.name.as_str()).collect::<Vec<_>>().join(", ")
    }
}

fn format_details_text(view: &GameView) -> String {
    let game = view.game;
    let summary = game.summary();
    let mut lines = Vec::new();

    lines.push(format!(
        "{}{}",
        game.name,
        if view.saved { "  [in library]" } else { "" }
    ));
    lines.push(format!(
        "Released: {}   Rating: {}{}",
        format_release_date(game.released),
        summary.rating_display(),
        game.metacritic
            .map(|m| format!("   Metacritic: {}", m))
            .unwrap_or_default()
    ));
    lines.push(format!("Genres: {}", join_names(&game.genres)));

    let platforms: Vec<Label> = game.platforms.iter().map(|p| p.platform.clone()).collect();
    lines.push(format!("Platforms: {}", join_names(&platforms)));
    lines.push(format!("Developers: {}", join_names(&game.developers)));
    lines.push(format!("Publishers: {}", join_names(&game.publishers)));
    if let Some(page) = game.web_page() {
        lines.push(format!("Website: {}", page));
    }

    lines.push(String::new());
    lines.push(game.description_text());

    lines.push(String::new());
    lines.push("System Requirements (PC)".to_string());
    match game.pc_requirements() {
        Some(reqs) => {
            if let Some(min) = reqs.minimum.as_deref().filter(|s| !s.is_empty()) {
                lines.push(format!("  Minimum:\n{}", indent(&strip_html(min))));
            }
            if let Some(rec) = reqs.recommended.as_deref().filter(|s| !s.is_empty()) {
                lines.push(format!("  Recommended:\n{}", indent(&strip_html(rec))));
            }
        }
        None => lines.push("  System requirements not available".to_string()),
    }

    lines.push(String::new());
    lines.push("Where to Buy".to_string());
    if game.stores.is_empty() {
        lines.push("  Pricing information not available".to_string());
    } else {
        for store in &game.stores {
            lines.push(format!(
                "  {}{}",
                store.store.name,
                store.link().map(|l| format!("  {}", l)).unwrap_or_default()
            ));
        }
    }

    lines.push(String::new());
    match view.screenshots.get(view.screenshot_index) {
        Some(shot) => lines.push(format!(
            "Screenshot {}/{}: {}",
            view.screenshot_index + 1,
            view.screenshots.len(),
            shot.image
        )),
        None => lines.push("No screenshots available".to_string()),
    }

    lines.join("\n")
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|l| format!("    {}", l))
        .collect::<Vec<_>>()
        .join("\n")
}
