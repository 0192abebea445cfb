//! Catalog browsing commands: listing, filters, and paging

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::app_data::filter_options;
use crate::catalog::{FilterAxis, FilterSelection};
use crate::cli::output::{format_game_row, format_pager, print_formatted, OutputFormat};
use crate::cli::session::Session;
use crate::model::GameSummary;

#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// Toggle a category (genre) filter
    #[arg(long)]
    category: Option<String>,

    /// Toggle a tag filter
    #[arg(long)]
    tag: Option<String>,

    /// Toggle a release year filter ("2023", "2020-2023", "2015-2019", "Before 2015")
    #[arg(long)]
    year: Option<String>,

    /// Toggle a sort mode ("Top Rated", "Most Played", "New Releases")
    #[arg(long)]
    sort: Option<String>,

    /// Page to show
    #[arg(long)]
    page: Option<usize>,

    /// Clear all filters first
    #[arg(long)]
    clear: bool,

    /// Fetch the listing again
    #[arg(long)]
    refresh: bool,
}

#[derive(Subcommand, Debug)]
pub enum FilterCommands {
    /// Toggle a filter value (selecting the active value clears it)
    Set {
        /// Filter axis: category, tag, year or sort
        axis: String,

        /// Value to toggle
        value: String,
    },

    /// Clear one filter axis, or all filters
    Clear {
        /// Filter axis to clear (all if omitted)
        axis: Option<String>,
    },

    /// List the available filter values
    Options,
}

#[derive(Subcommand, Debug)]
pub enum PageCommands {
    /// Next page
    Next,

    /// Previous page
    Prev,

    /// Jump to a page
    Go {
        /// Page number (1-based)
        page: usize,
    },
}

/// JSON-serializable page of results
#[derive(Serialize)]
struct BrowseResult<'a> {
    found: usize,
    page: usize,
    total_pages: usize,
    window: Vec<usize>,
    filters: &'a FilterSelection,
    games: &'a [GameSummary],
}

#[derive(Serialize)]
struct OptionsResult<'a> {
    categories: &'a [String],
    tags: &'a [String],
    years: &'a [String],
    sort_modes: &'a [String],
}

pub async fn run(args: BrowseArgs, session: &mut Session, format: OutputFormat) -> Result<()> {
    session.ensure_catalog(args.refresh).await;

    if args.clear {
        session.catalog.clear_filters();
    }

    let toggles = [
        (FilterAxis::Category, args.category),
        (FilterAxis::Tag, args.tag),
        (FilterAxis::Year, args.year),
        (FilterAxis::Sort, args.sort),
    ];
    for (axis, value) in toggles {
        if let Some(value) = value {
            session.catalog.toggle_filter(axis, &value)?;
        }
    }

    // Page selection comes last; any filter change above went back to page 1
    if let Some(page) = args.page {
        session.catalog.go_to_page(page);
    }

    show_page(session, format);
    Ok(())
}

pub async fn run_filter(
    command: FilterCommands,
    session: &mut Session,
    format: OutputFormat,
) -> Result<()> {
    match command {
        FilterCommands::Set { axis, value } => {
            session.ensure_catalog(false).await;
            session.catalog.toggle_filter(axis.parse()?, &value)?;
        }
        FilterCommands::Clear { axis } => {
            session.ensure_catalog(false).await;
            match axis {
                Some(axis) => session.catalog.clear_filter(axis.parse()?),
                None => session.catalog.clear_filters(),
            }
        }
        FilterCommands::Options => {
            show_options(format);
            return Ok(());
        }
    }

    show_page(session, format);
    Ok(())
}

pub async fn run_page(command: PageCommands, session: &mut Session, format: OutputFormat) -> Result<()> {
    session.ensure_catalog(false).await;

    match command {
        PageCommands::Next => session.catalog.next_page(),
        PageCommands::Prev => session.catalog.previous_page(),
        PageCommands::Go { page } => session.catalog.go_to_page(page),
    }

    show_page(session, format);
    Ok(())
}

fn show_page(session: &Session, format: OutputFormat) {
    let catalog = &session.catalog;
    let pager = catalog.pager();
    let result = BrowseResult {
        found: catalog.found_count(),
        page: pager.current(),
        total_pages: pager.total_pages(),
        window: pager.window(),
        filters: catalog.selection(),
        games: catalog.page_items(),
    };

    print_formatted(&result, format, |r| {
        let mut out = String::new();

        let active = r.filters.active();
        if !active.is_empty() {
            let chips: Vec<String> = active
                .iter()
                .map(|(axis, value)| format!("{}={}", axis.name(), value))
                .collect();
            out.push_str(&format!("Filters: {}\n", chips.join(", ")));
        }
        out.push_str(&format!("{} games found\n", r.found));

        if r.games.is_empty() {
            out.push_str("\nNo games match your filters.");
            if !r.filters.is_empty() {
                out.push_str(" Try `filter clear` to clear all filters.");
            }
            return out;
        }

        out.push('\n');
        for game in r.games {
            out.push_str(&format_game_row(game, session.library.contains(game.id)));
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&format_pager(pager));
        out
    });
}

fn show_options(format: OutputFormat) {
    let options = filter_options();
    let result = OptionsResult {
        categories: &options.categories,
        tags: &options.tags,
        years: &options.years,
        sort_modes: &options.sort_modes,
    };

    print_formatted(&result, format, |r| {
        format!(
            "category: {}\ntag:      {}\nyear:     {}\nsort:     {}",
            r.categories.join(", "),
            r.tags.join(", "),
            r.years.join(", "),
            r.sort_modes.join(", ")
        )
    });
}
