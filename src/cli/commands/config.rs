//! Configuration management commands

use std::path::Path;

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use crate::cli::output::{print_formatted, print_success, OutputFormat};
use crate::config::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Get a specific config value
    Get {
        /// Config key (e.g., "api.key", "search.debounce_ms")
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., "api.key", "search.debounce_ms")
        key: String,

        /// Value to set
        value: String,
    },

    /// Show config file path
    Path,
}

#[derive(Serialize)]
struct ConfigPathResult {
    path: String,
    exists: bool,
}

pub async fn run(command: ConfigCommands, format: OutputFormat, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Show => show(format).await,
        ConfigCommands::Get { key } => get(&key, format).await,
        ConfigCommands::Set { key, value } => set(&key, &value, quiet).await,
        ConfigCommands::Path => path(format).await,
    }
}

async fn show(format: OutputFormat) -> Result<()> {
    let mut config = Config::load()?;
    if config.api.key.is_some() {
        config.api.key = Some(mask_key(config.api.key.as_deref().unwrap_or_default()));
    }

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            let toml = toml::to_string_pretty(&config)?;
            println!("{}", toml);
        }
    }

    Ok(())
}

async fn get(key: &str, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;

    // Parse dotted key path and extract value
    let value = get_config_value(&config, key)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&value)?);
        }
        OutputFormat::Text => {
            println!("{}", value);
        }
    }

    Ok(())
}

/// Show only the last four characters of an API key
fn mask_key(key: &str) -> String {
    let visible: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    if key.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("****{}", visible)
    }
}

fn get_config_value(config: &Config, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["api", "key"] => Ok(config
            .api
            .key
            .as_deref()
            .map(mask_key)
            .unwrap_or_else(|| "<not set>".to_string())),
        ["api", "base_url"] => Ok(config.api.base_url.clone()),
        ["api", "timeout_secs"] => Ok(config.api.timeout_secs.to_string()),
        ["catalog", "fetch_size"] => Ok(config.catalog.fetch_size.to_string()),
        ["search", "debounce_ms"] => Ok(config.search.debounce_ms.to_string()),
        ["search", "result_limit"] => Ok(config.search.result_limit.to_string()),
        ["library", "path"] => Ok(config
            .library
            .path
            .clone()
            .unwrap_or_else(|| "<default>".to_string())),
        _ => anyhow::bail!("Unknown config key: {}", key),
    }
}

async fn set(key: &str, value: &str, quiet: bool) -> Result<()> {
    update_file(&Config::config_path()?, key, value)?;
    print_success(&format!("Set {} = {}", key, value), quiet);
    Ok(())
}

/// Change one value in the config file. Environment overrides are never
/// written back.
fn update_file(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = Config::read_from(path)?;
    set_config_value(&mut config, key, value)?;
    config.write_to(path)
}

fn set_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["api", "key"] => {
            config.api.key = Some(value.to_string()).filter(|v| !v.is_empty());
        }
        ["api", "base_url"] => {
            config.api.base_url = value.to_string();
        }
        ["api", "timeout_secs"] => {
            config.api.timeout_secs = value.parse()?;
        }
        ["catalog", "fetch_size"] => {
            let size: u32 = value.parse()?;
            // RAWG caps page_size at 40
            if !(1..=40).contains(&size) {
                anyhow::bail!("catalog.fetch_size must be between 1 and 40");
            }
            config.catalog.fetch_size = size;
        }
        ["search", "debounce_ms"] => {
            config.search.debounce_ms = value.parse()?;
        }
        ["search", "result_limit"] => {
            config.search.result_limit = value.parse()?;
        }
        ["library", "path"] => {
            config.library.path = Some(value.to_string()).filter(|v| !v.is_empty());
        }
        _ => anyhow::bail!("Unknown or read-only config key: {}", key),
    }

    Ok(())
}

async fn path(format: OutputFormat) -> Result<()> {
    let path = Config::config_path()?;
    let exists = path.exists();

    let result = ConfigPathResult {
        path: path.to_string_lossy().to_string(),
        exists,
    };

    print_formatted(&result, format, |r| {
        format!("{}{}", r.path, if r.exists { "" } else { " (not found)" })
    });

    Ok(())
}
