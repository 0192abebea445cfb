//! Diagnostic and debugging commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use crate::cli::output::{print_formatted, OutputFormat};
use crate::config::{Config, API_KEY_ENV};
use crate::library::{FileStore, LibraryStore, LIBRARY_KEY};
use crate::rawg::{CatalogError, RawgClient};

#[derive(Subcommand, Debug)]
pub enum DiagCommands {
    /// Show all data paths (config, library)
    Paths,

    /// Verify configuration and API access
    Check,
}

#[derive(Serialize)]
struct PathsResult {
    config_file: String,
    library_file: String,
}

#[derive(Serialize)]
struct CheckResult {
    config_exists: bool,
    api_key_configured: bool,
    api_reachable: bool,
    api_error: Option<String>,
    library_exists: bool,
    library_count: usize,
}

pub async fn run(command: DiagCommands, format: OutputFormat) -> Result<()> {
    match command {
        DiagCommands::Paths => paths(format).await,
        DiagCommands::Check => check(format).await,
    }
}

fn library_path(config: Option<&Config>) -> Option<std::path::PathBuf> {
    let dir = match config {
        Some(c) => c.data_dir().ok()?,
        None => FileStore::default_dir().ok()?,
    };
    Some(FileStore::new(dir).path_for(LIBRARY_KEY))
}

async fn paths(format: OutputFormat) -> Result<()> {
    let config = Config::load().ok();

    let result = PathsResult {
        config_file: Config::config_path()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|_| "<error>".to_string()),
        library_file: library_path(config.as_ref())
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| "<error>".to_string()),
    };

    print_formatted(&result, format, |r| {
        [
            format!("Config file:   {}", r.config_file),
            format!("Library file:  {}", r.library_file),
        ]
        .join("\n")
    });

    Ok(())
}

async fn check(format: OutputFormat) -> Result<()> {
    // Check config file
    let config_exists = Config::config_path().is_ok_and(|p| p.exists());
    let config = Config::load().unwrap_or_default();

    // Check API access with the smallest possible request
    let api_key_configured = config.api.key.is_some();
    let api_result = match RawgClient::new(&config.api) {
        Ok(client) => client.fetch_games(None, 1).await.map(|_| ()),
        Err(e) => Err(e),
    };
    let api_error = match &api_result {
        Ok(()) => None,
        Err(CatalogError::MissingApiKey) => Some(format!(
            "set api.key with `config set api.key <key>` or the {} environment variable",
            API_KEY_ENV
        )),
        Err(e) => Some(e.to_string()),
    };

    // Check library
    let path = library_path(Some(&config));
    let library_exists = path.as_ref().is_some_and(|p| p.exists());
    let library_count = config
        .data_dir()
        .map(|dir| LibraryStore::load(FileStore::new(dir)).len())
        .unwrap_or(0);

    let result = CheckResult {
        config_exists,
        api_key_configured,
        api_reachable: api_result.is_ok(),
        api_error,
        library_exists,
        library_count,
    };

    print_formatted(&result, format, |r| {
        let mut lines = Vec::new();

        print_status_line(&mut lines, r.config_exists, "Config file exists");
        print_status_line(&mut lines, r.api_key_configured, "API key configured");
        match &r.api_error {
            None => print_status_line(&mut lines, true, "RAWG API reachable"),
            Some(e) => print_status_line(&mut lines, false, &format!("RAWG API reachable ({})", e)),
        }
        print_status_line(
            &mut lines,
            r.library_exists,
            &format!("Library file exists ({} saved games)", r.library_count),
        );

        lines.join("\n")
    });

    Ok(())
}

fn print_status_line(lines: &mut Vec<String>, ok: bool, message: &str) {
    if ok {
        lines.push(format!("[OK] {}", message));
    } else {
        lines.push(format!("[  ] {}", message));
    }
}
