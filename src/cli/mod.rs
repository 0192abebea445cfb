//! CLI module for GameHub
//!
//! Provides one-shot subcommands and an interactive shell over the same handlers.

mod commands;
mod output;
mod session;
mod shell;

use clap::{Parser, Subcommand};

pub use output::{print_error, OutputFormat};
use session::Session;

/// GameHub - browse the RAWG games catalog from the terminal
#[derive(Parser, Debug)]
#[command(name = "gamehub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[command(flatten)]
    pub output: OutputOptions,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output formatting options
#[derive(Parser, Debug, Clone)]
pub struct OutputOptions {
    /// Output in JSON format (for machine parsing)
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl OutputOptions {
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse the catalog, optionally toggling filters
    Browse(commands::browse::BrowseArgs),

    /// Toggle or clear browse filters (they carry over only inside `shell`)
    Filter {
        #[command(subcommand)]
        command: commands::browse::FilterCommands,
    },

    /// Move between pages of the browse listing (the page carries over only inside `shell`)
    Page {
        #[command(subcommand)]
        command: commands::browse::PageCommands,
    },

    /// Search games by name
    Search {
        /// Search text (empty clears the search)
        query: Vec<String>,
    },

    /// Game details and screenshots
    Game {
        #[command(subcommand)]
        command: commands::game::GameCommands,
    },

    /// Saved games library
    Library {
        #[command(subcommand)]
        command: commands::library::LibraryCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommands,
    },

    /// Diagnostics and debugging
    Diag {
        #[command(subcommand)]
        command: commands::diag::DiagCommands,
    },

    /// Start the interactive shell
    Shell,
}

/// Run the CLI with parsed arguments
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let format = cli.output.format();
    let quiet = cli.output.quiet;

    match cli.command {
        Commands::Shell => shell::run().await,
        Commands::Config { command } => commands::config::run(command, format, quiet).await,
        Commands::Diag { command } => commands::diag::run(command, format).await,
        command => {
            let mut session = Session::open()?;
            dispatch(command, &mut session, format, quiet).await
        }
    }
}

/// Run one command against a session
async fn dispatch(
    command: Commands,
    session: &mut Session,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    match command {
        Commands::Browse(args) => commands::browse::run(args, session, format).await,
        Commands::Filter { command } => commands::browse::run_filter(command, session, format).await,
        Commands::Page { command } => commands::browse::run_page(command, session, format).await,
        Commands::Search { query } => commands::search::run(&query.join(" "), session, format).await,
        Commands::Game { command } => commands::game::run(command, session, format, quiet).await,
        Commands::Library { command } => commands::library::run(command, session, format).await,
        Commands::Config { command } => commands::config::run(command, format, quiet).await,
        Commands::Diag { command } => commands::diag::run(command, format).await,
        Commands::Shell => {
            println!("Already in shell mode.");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_browse_filters() {
        let cli = Cli::try_parse_from([
            "gamehub", "browse", "--category", "RPG", "--year", "Before 2015", "--page", "2", "--json",
        ])
        .unwrap();

        assert!(cli.output.json);
        assert!(matches!(cli.command, Commands::Browse(_)));
    }

    #[test]
    fn test_session_commands_mention_shell() {
        use clap::CommandFactory;
        let cli = Cli::command();
        for name in ["filter", "page"] {
            let about = cli
                .find_subcommand(name)
                .and_then(|c| c.get_about())
                .map(|a| a.to_string())
                .unwrap_or_default();
            assert!(about.contains("only inside `shell`"), "{}: {}", name, about);
        }
    }

    #[test]
    fn test_parse_search_words() {
        let cli = Cli::try_parse_from(["gamehub", "search", "dark", "souls"]).unwrap();
        match cli.command {
            Commands::Search { query } => assert_eq!(query.join(" "), "dark souls"),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
