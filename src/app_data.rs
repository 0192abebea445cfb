//! Application data embedded from TOML files at compile time.
//!
//! This is distinct from `config.rs` which handles user preferences.
//! App data defines the fixed filter options the browser offers, while config
//! defines user choices (API key, debounce delay, fetch sizes).

use serde::Deserialize;
use std::sync::OnceLock;

const FILTERS_TOML: &str = include_str!("../embedded/filters.toml");

/// Filter options shown in the browse view
#[derive(Debug, Deserialize)]
pub struct FilterOptions {
    /// Genre labels offered as categories
    pub categories: Vec<String>,
    /// Tag labels
    pub tags: Vec<String>,
    /// Year bucket names
    pub years: Vec<String>,
    /// Sort mode names
    pub sort_modes: Vec<String>,
}

/// Get the filter options (lazy-loaded)
pub fn filter_options() -> &'static FilterOptions {
    static OPTIONS: OnceLock<FilterOptions> = OnceLock::new();
    OPTIONS.get_or_init(|| {
        toml::from_str(FILTERS_TOML).unwrap_or_else(|e| {
            panic!("Failed to parse filters.toml: {}", e);
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{SortMode, YearBucket};

    #[test]
    fn test_filter_options_parse() {
        let options = filter_options();
        assert_eq!(options.categories, ["Action", "Adventure", "RPG", "Strategy"]);
        assert_eq!(options.tags.len(), 4);
    }

    #[test]
    fn test_embedded_names_are_known() {
        let options = filter_options();
        for year in &options.years {
            assert!(year.parse::<YearBucket>().is_ok(), "unknown year bucket {}", year);
        }
        for mode in &options.sort_modes {
            assert!(mode.parse::<SortMode>().is_ok(), "unknown sort mode {}", mode);
        }
    }
}
