//! Game records as returned by the RAWG games database.
//!
//! This module provides:
//!
//! - `GameSummary`: the minimal record used in listings, search results and the library
//! - `GameDetails`: the extended per-game record fetched on demand
//! - `Screenshot`: one image reference from a game's screenshot gallery
//!
//! Optional fields are modelled explicitly. Each consumer picks its own fallback:
//! sorting treats a missing rating or playtime as 0 and a missing release date as
//! the earliest possible date, while display code shows "N/A" or "TBA".

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::OnceLock;

/// A named reference (genre, tag, developer, publisher, platform)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub name: String,
}

/// Minimal game record used in listings and library entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// Cover image URL
    #[serde(default)]
    pub background_image: Option<String>,
    /// Average user rating (0-5)
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub released: Option<NaiveDate>,
    /// Average playtime in hours
    #[serde(default)]
    pub playtime: Option<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<Label>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<Label>,
}

impl GameSummary {
    /// Year of release, if known
    pub fn release_year(&self) -> Option<i32> {
        self.released.map(|d| d.year())
    }

    /// Rating used for "Top Rated" ordering (missing = 0)
    pub fn sort_rating(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    /// Playtime used for "Most Played" ordering (missing = 0)
    pub fn sort_playtime(&self) -> u32 {
        self.playtime.unwrap_or(0)
    }

    /// Release date used for "New Releases" ordering (missing = earliest)
    pub fn sort_released(&self) -> NaiveDate {
        self.released.unwrap_or(NaiveDate::MIN)
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g.name == genre)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.name == tag)
    }

    /// Rating with one decimal, or "N/A" when unknown.
    /// The API reports unrated games as 0, which is shown as unknown too.
    pub fn rating_display(&self) -> String {
        match self.rating {
            Some(r) if r > 0.0 => format!("{:.1}", r),
            _ => "N/A".to_string(),
        }
    }

    /// Release year, or "N/A" when unknown
    pub fn year_display(&self) -> String {
        self.release_year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// Up to `limit` genre names, in order
    pub fn genre_names(&self, limit: usize) -> Vec<&str> {
        self.genres.iter().take(limit).map(|g| g.name.as_str()).collect()
    }
}

/// PC system requirements (HTML fragments from the API)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default)]
    pub minimum: Option<String>,
    #[serde(default)]
    pub recommended: Option<String>,
}

impl Requirements {
    pub fn is_empty(&self) -> bool {
        self.minimum.as_deref().is_none_or(str::is_empty)
            && self.recommended.as_deref().is_none_or(str::is_empty)
    }
}

/// A platform the game was released on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformEntry {
    pub platform: Label,
    #[serde(default, alias = "requirements_en")]
    pub requirements: Option<Requirements>,
}

/// Store front details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub domain: Option<String>,
}

/// A store selling the game ("Where to Buy")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreEntry {
    #[serde(default)]
    pub url: Option<String>,
    pub store: StoreRef,
}

impl StoreEntry {
    /// Link to the store page, falling back to the store's domain
    pub fn link(&self) -> Option<String> {
        self.url
            .clone()
            .filter(|u| !u.is_empty())
            .or_else(|| self.store.domain.as_ref().map(|d| format!("https://{}", d)))
    }
}

/// Extended per-game record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDetails {
    pub id: u64,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub name: String,
    /// HTML description
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub released: Option<NaiveDate>,
    #[serde(default)]
    pub playtime: Option<u32>,
    #[serde(default)]
    pub metacritic: Option<u32>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<Label>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<Label>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub platforms: Vec<PlatformEntry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub developers: Vec<Label>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub publishers: Vec<Label>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub stores: Vec<StoreEntry>,
}

impl GameDetails {
    /// Reduce to the summary stored in the library
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            id: self.id,
            name: self.name.clone(),
            background_image: self.background_image.clone(),
            rating: self.rating,
            released: self.released,
            playtime: self.playtime,
            genres: self.genres.clone(),
            tags: self.tags.clone(),
        }
    }

    /// Requirements listed for the PC platform, if any
    pub fn pc_requirements(&self) -> Option<&Requirements> {
        self.platforms
            .iter()
            .find(|p| p.platform.name == "PC")
            .and_then(|p| p.requirements.as_ref())
            .filter(|r| !r.is_empty())
    }

    /// Official website, or the RAWG page when the game has none
    pub fn web_page(&self) -> Option<String> {
        self.website
            .clone()
            .filter(|w| !w.is_empty())
            .or_else(|| self.slug.as_ref().map(|s| format!("https://rawg.io/games/{}", s)))
    }

    /// Description as plain text
    pub fn description_text(&self) -> String {
        match self.description.as_deref() {
            Some(html) if !html.trim().is_empty() => strip_html(html),
            _ => "No description available".to_string(),
        }
    }
}

/// A screenshot from a game's gallery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screenshot {
    #[serde(default)]
    pub id: u64,
    pub image: String,
}

/// Format a release date long-form ("January 15, 2024"), or "TBA"
pub fn format_release_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%B %-d, %Y").to_string(),
        None => "TBA".to_string(),
    }
}

/// Convert an HTML fragment to plain text
pub fn strip_html(html: &str) -> String {
    static BREAKS: OnceLock<Regex> = OnceLock::new();
    static TAGS: OnceLock<Regex> = OnceLock::new();
    static BLANK_LINES: OnceLock<Regex> = OnceLock::new();

    let breaks = BREAKS.get_or_init(|| Regex::new(r"(?i)<br\s*/?>|</p>|</li>|</h\d>").unwrap());
    let tags = TAGS.get_or_init(|| Regex::new(r"<[^>]+>").unwrap());
    let blank_lines = BLANK_LINES.get_or_init(|| Regex::new(r"\n\s*\n+").unwrap());

    let text = breaks.replace_all(html, "\n");
    let text = tags.replace_all(&text, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");

    blank_lines.replace_all(text.trim(), "\n\n").to_string()
}

/// Accept `null` where the API normally sends an array
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a `YYYY-MM-DD` date, treating anything else as unknown
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_api_json() {
        let json = r#"{
            "id": 3498,
            "slug": "grand-theft-auto-v",
            "name": "Grand Theft Auto V",
            "released": "2013-09-17",
            "background_image": "https://media.rawg.io/media/games/gta.jpg",
            "rating": 4.47,
            "playtime": 74,
            "genres": [{"id": 4, "name": "Action", "slug": "action"}],
            "tags": [{"id": 31, "name": "Singleplayer"}, {"id": 7, "name": "Multiplayer"}]
        }"#;

        let game: GameSummary = serde_json::from_str(json).unwrap();
        assert_eq!(game.id, 3498);
        assert_eq!(game.release_year(), Some(2013));
        assert!(game.has_genre("Action"));
        assert!(game.has_tag("Multiplayer"));
        assert!(!game.has_tag("Open World"));
        assert_eq!(game.rating_display(), "4.5");
        assert_eq!(game.year_display(), "2013");
    }

    #[test]
    fn test_summary_missing_fields() {
        let json = r#"{"id": 1, "name": "Unknown", "released": null, "tags": null, "rating": null}"#;

        let game: GameSummary = serde_json::from_str(json).unwrap();
        assert!(game.genres.is_empty());
        assert!(game.tags.is_empty());
        assert_eq!(game.rating_display(), "N/A");
        assert_eq!(game.year_display(), "N/A");
        assert_eq!(game.sort_rating(), 0.0);
        assert_eq!(game.sort_playtime(), 0);
        assert_eq!(game.sort_released(), NaiveDate::MIN);
    }

    #[test]
    fn test_malformed_release_date_is_unknown() {
        let json = r#"{"id": 2, "name": "Odd", "released": "sometime"}"#;
        let game: GameSummary = serde_json::from_str(json).unwrap();
        assert_eq!(game.released, None);
    }

    #[test]
    fn test_zero_rating_displays_na() {
        let json = r#"{"id": 3, "name": "Unrated", "rating": 0}"#;
        let game: GameSummary = serde_json::from_str(json).unwrap();
        assert_eq!(game.rating_display(), "N/A");
    }

    #[test]
    fn test_details_pc_requirements() {
        let json = r#"{
            "id": 10,
            "name": "Example",
            "platforms": [
                {"platform": {"id": 18, "name": "PlayStation 4"}, "requirements": null},
                {"platform": {"id": 4, "name": "PC"},
                 "requirements_en": {"minimum": "<p>4 GB RAM</p>", "recommended": null}}
            ],
            "stores": [{"id": 1, "url": "", "store": {"id": 1, "name": "Steam", "domain": "store.steampowered.com"}}]
        }"#;

        let details: GameDetails = serde_json::from_str(json).unwrap();
        let reqs = details.pc_requirements().unwrap();
        assert_eq!(reqs.minimum.as_deref(), Some("<p>4 GB RAM</p>"));
        assert!(reqs.recommended.is_none());
        assert_eq!(
            details.stores[0].link().as_deref(),
            Some("https://store.steampowered.com")
        );
    }

    #[test]
    fn test_details_without_requirements() {
        let json = r#"{"id": 11, "name": "Console Only",
            "platforms": [{"platform": {"name": "PC"}, "requirements": {}}]}"#;
        let details: GameDetails = serde_json::from_str(json).unwrap();
        assert!(details.pc_requirements().is_none());
    }

    #[test]
    fn test_details_summary_keeps_listing_fields() {
        let json = r#"{"id": 12, "name": "Full", "released": "2020-01-01", "rating": 3.9,
            "genres": [{"name": "RPG"}], "description": "<p>Hi</p>"}"#;
        let details: GameDetails = serde_json::from_str(json).unwrap();
        let summary = details.summary();
        assert_eq!(summary.id, 12);
        assert_eq!(summary.release_year(), Some(2020));
        assert!(summary.has_genre("RPG"));
    }

    #[test]
    fn test_web_page_fallback() {
        let json = r#"{"id": 13, "slug": "portal-2", "name": "Portal 2", "website": ""}"#;
        let details: GameDetails = serde_json::from_str(json).unwrap();
        assert_eq!(
            details.web_page().as_deref(),
            Some("https://rawg.io/games/portal-2")
        );
    }

    #[test]
    fn test_strip_html() {
        let html = "<p>Fight &amp; survive.</p>\n<p>Explore<br/>the world.</p>";
        assert_eq!(strip_html(html), "Fight & survive.\n\nExplore\nthe world.");
    }

    #[test]
    fn test_format_release_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15);
        assert_eq!(format_release_date(date), "January 15, 2024");
        assert_eq!(format_release_date(None), "TBA");
    }
}
