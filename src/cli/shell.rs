//! Interactive shell mode for GameHub CLI
//!
//! Provides a REPL with command history and tab completion. The shell keeps one
//! session for its lifetime, so filters, the current page, the last search and
//! the open game carry over between commands.

use anyhow::Result;
use clap::Parser;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Config, Editor, Helper};

use super::session::Session;
use super::{dispatch, Cli, Commands};
use crate::app_data::filter_options;
use crate::catalog::FilterAxis;

/// Top-level commands and their subcommands
const COMMANDS: &[(&str, &[&str])] = &[
    ("browse", BROWSE_FLAGS),
    ("filter", &["set", "clear", "options"]),
    ("page", &["next", "prev", "go"]),
    ("search", &[]),
    ("game", &["show", "shot", "open", "close"]),
    ("library", &["list", "toggle", "path"]),
    ("config", &["show", "get", "set", "path"]),
    ("diag", &["paths", "check"]),
    ("help", &[]),
    ("exit", &[]),
    ("quit", &[]),
];

const BROWSE_FLAGS: &[&str] = &["--category", "--tag", "--year", "--sort", "--page", "--clear", "--refresh"];

const AXES: &[&str] = &["category", "tag", "year", "sort"];

/// Filter values offered for an axis name or its `browse` flag
fn axis_values(axis: &str) -> &'static [String] {
    let options = filter_options();
    match axis.trim_start_matches("--").parse::<FilterAxis>() {
        Ok(FilterAxis::Category) => options.categories.as_slice(),
        Ok(FilterAxis::Tag) => options.tags.as_slice(),
        Ok(FilterAxis::Year) => options.years.as_slice(),
        Ok(FilterAxis::Sort) => options.sort_modes.as_slice(),
        Err(_) => &[],
    }
}

/// Words that may follow `done`, the words already typed in full
fn next_words(done: &[&str]) -> Vec<String> {
    let words: Vec<&str> = match done {
        [] => COMMANDS.iter().map(|(cmd, _)| *cmd).collect(),
        ["browse", .., flag] if matches!(*flag, "--category" | "--tag" | "--year" | "--sort") => {
            return axis_values(flag).to_vec();
        }
        ["browse", ..] => BROWSE_FLAGS.to_vec(),
        ["filter", "set" | "clear"] => AXES.to_vec(),
        ["filter", "set", axis] => return axis_values(axis).to_vec(),
        ["game", "shot"] => vec!["next", "prev"],
        [cmd] => COMMANDS
            .iter()
            .find(|(c, _)| c == cmd)
            .map(|(_, subs)| subs.to_vec())
            .unwrap_or_default(),
        _ => Vec::new(),
    };
    words.into_iter().map(String::from).collect()
}

/// Completion for the text before the cursor: where the replaced word starts
/// and the candidates for it. Values containing spaces are offered quoted.
fn suggest(line: &str) -> (usize, Vec<String>) {
    let tokens = tokenize(line);
    let (done, start, partial) = match tokens.last() {
        Some(last) if last.open => (&tokens[..tokens.len() - 1], last.start, last.text.as_str()),
        _ => (&tokens[..], line.len(), ""),
    };

    let done: Vec<&str> = done.iter().map(|t| t.text.as_str()).collect();
    let partial = partial.to_lowercase();
    let candidates = next_words(&done)
        .into_iter()
        .filter(|w| w.to_lowercase().starts_with(&partial))
        .map(|w| if w.contains(' ') { format!("\"{}\"", w) } else { w })
        .collect();

    (start, candidates)
}

/// Command completer for the shell
struct ShellCompleter;

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = suggest(&line[..pos]);
        let pairs = words
            .into_iter()
            .map(|w| Pair {
                display: w.trim_matches('"').to_string(),
                replacement: w,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ShellCompleter {
    type Hint = String;
}

impl Highlighter for ShellCompleter {}
impl Validator for ShellCompleter {}
impl Helper for ShellCompleter {}

/// One word of a shell line
#[derive(Debug, PartialEq)]
struct Token {
    /// Unquoted text
    text: String,
    /// Byte offset where the word starts (at its opening quote, if any)
    start: usize,
    /// Whether the line ends inside this word
    open: bool,
}

/// Split a line into words. Single or double quotes group words with spaces.
fn tokenize(line: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut quote: Option<char> = None;
    let mut current: Option<Token> = None;

    for (i, c) in line.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (None, '"' | '\'') => {
                quote = Some(c);
                current.get_or_insert(Token {
                    text: String::new(),
                    start: i,
                    open: true,
                });
            }
            (None, c) if c.is_whitespace() => {
                if let Some(mut token) = current.take() {
                    token.open = false;
                    tokens.push(token);
                }
            }
            (_, c) => current
                .get_or_insert(Token {
                    text: String::new(),
                    start: i,
                    open: true,
                })
                .text
                .push(c),
        }
    }

    tokens.extend(current);
    tokens
}

/// Parse a command line into arguments, handling quotes
fn parse_args(line: &str) -> Vec<String> {
    tokenize(line).into_iter().map(|t| t.text).collect()
}

/// Run a single command in the shell.
/// Returns Ok(true) to continue, Ok(false) to exit gracefully.
async fn run_command(args: Vec<String>, session: &mut Session) -> Result<bool> {
    if args.is_empty() {
        return Ok(true);
    }

    // Handle shell built-in commands
    let cmd = args[0].as_str();
    match cmd {
        "help" => {
            print_help();
            return Ok(true);
        }
        "exit" | "quit" => {
            return Ok(false);
        }
        _ => {}
    }

    // Build a fake argv for clap: ["gamehub", ...args]
    let mut argv: Vec<String> = vec!["gamehub".to_string()];
    argv.extend(args);

    // Parse using clap
    let cli = match Cli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            // Print clap's error message (includes usage hints)
            println!("{}", e);
            return Ok(true);
        }
    };

    // Reject nested shell command
    if matches!(cli.command, Commands::Shell) {
        println!("Already in shell mode.");
        return Ok(true);
    }

    let format = cli.output.format();
    let quiet = cli.output.quiet;

    dispatch(cli.command, session, format, quiet).await?;
    Ok(true)
}

fn print_help() {
    println!(
        r#"GameHub Interactive Shell

Commands:
  browse [--category C] [--tag T] [--year Y] [--sort S] [--page N]
                                 Show the catalog (filter flags toggle)
  browse --clear                 Clear all filters
  browse --refresh               Fetch the listing again

  filter set <axis> <value>      Toggle a filter (category, tag, year, sort)
  filter clear [axis]            Clear one filter, or all
  filter options                 List the available filter values

  page next | page prev          Move between pages
  page go <n>                    Jump to a page

  search <text>                  Search games by name
  search                         Clear the search

  game show <id>                 Show game details and screenshots
  game shot next|prev|<n>        Move through the open game's screenshots
  game open [id]                 Open the game's website
  game close                     Close the open game

  library list                   List saved games
  library toggle <id>            Save or remove a game
  library path                   Show the library file path

  config show                    Show current configuration
  config get <key>               Get a specific setting
  config set <key> <value>       Set a configuration value
  config path                    Show config file path

  diag paths                     Show all data paths
  diag check                     Verify configuration and API access

  help                           Show this help
  exit, quit                     Exit the shell

Flags (can be added to any command):
  --json                         Output in JSON format
  --quiet, -q                    Suppress non-essential output
"#
    );
}

/// Get the history file path
fn history_path() -> Option<std::path::PathBuf> {
    directories::ProjectDirs::from("com", "gamehub", "GameHub")
        .map(|dirs| dirs.data_dir().join("shell_history"))
}

/// Run the interactive shell
pub async fn run() -> Result<()> {
    println!("GameHub Interactive Shell v{}", env!("CARGO_PKG_VERSION"));
    println!("Type 'help' for available commands, 'exit' to quit.\n");

    let mut session = Session::open()?;
    if !session.client.has_api_key() {
        println!("No RAWG API key configured; set one with `config set api.key <key>`.\n");
    }

    let config = Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(ShellCompleter));

    // Load history
    if let Some(path) = history_path() {
        let _ = rl.load_history(&path);
    }

    loop {
        match rl.readline("gamehub> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                rl.add_history_entry(line)?;

                let args = parse_args(line);
                match run_command(args, &mut session).await {
                    Ok(true) => continue,  // Command succeeded, keep running
                    Ok(false) => break,    // Exit requested, break to save history
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("exit");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    // Save history
    if let Some(path) = history_path() {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = rl.save_history(&path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args_quotes() {
        assert_eq!(
            parse_args(r#"browse --sort "Top Rated" --year 'Before 2015'"#),
            vec!["browse", "--sort", "Top Rated", "--year", "Before 2015"]
        );
        assert_eq!(parse_args("  page   next "), vec!["page", "next"]);
        assert!(parse_args("").is_empty());
    }

    #[test]
    fn test_complete_commands_and_subcommands() {
        let (start, words) = suggest("li");
        assert_eq!(start, 0);
        assert_eq!(words, vec!["library"]);

        let (start, words) = suggest("page ");
        assert_eq!(start, 5);
        assert_eq!(words, vec!["next", "prev", "go"]);

        assert_eq!(suggest("game shot p").1, vec!["prev"]);
    }

    #[test]
    fn test_complete_filter_values() {
        assert_eq!(suggest("filter set ").1, vec!["category", "tag", "year", "sort"]);

        let (start, words) = suggest("filter set sort ");
        assert_eq!(start, 16);
        assert_eq!(words, vec!["\"Top Rated\"", "\"Most Played\"", "\"New Releases\""]);

        assert_eq!(suggest("filter set category r").1, vec!["RPG"]);
    }

    #[test]
    fn test_complete_browse_flag_values() {
        assert_eq!(suggest("browse --year 20").1, vec!["2023", "2020-2023"]);

        let (start, words) = suggest("browse --sort \"Top");
        assert_eq!(start, 14);
        assert_eq!(words, vec!["\"Top Rated\""]);

        assert_eq!(suggest("browse --tag Story ").1, BROWSE_FLAGS);
    }
}
