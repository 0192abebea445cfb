//! Catalog filter engine.
//!
//! Turns the full game collection plus a `FilterSelection` into the filtered,
//! ordered sequence that feeds pagination. The four axes are independent:
//! category, tag and year bucket combine with logical AND, and the sort mode is
//! always applied last.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::model::GameSummary;

/// Errors from parsing filter values
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unknown filter: {0} (expected category, tag, year or sort)")]
    UnknownAxis(String),

    #[error("Unknown year bucket: {0}")]
    UnknownYear(String),

    #[error("Unknown sort mode: {0}")]
    UnknownSort(String),
}

/// Named release-year range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum YearBucket {
    /// Released in 2023
    Year2023,
    /// Released 2020 through 2023
    Recent,
    /// Released 2015 through 2019
    Late2010s,
    /// Released before 2015
    Before2015,
}

impl YearBucket {
    pub const ALL: [YearBucket; 4] = [
        YearBucket::Year2023,
        YearBucket::Recent,
        YearBucket::Late2010s,
        YearBucket::Before2015,
    ];

    /// Display name, also accepted by `from_str`
    pub fn name(&self) -> &'static str {
        match self {
            YearBucket::Year2023 => "2023",
            YearBucket::Recent => "2020-2023",
            YearBucket::Late2010s => "2015-2019",
            YearBucket::Before2015 => "Before 2015",
        }
    }

    /// Check whether a release year falls in this bucket
    pub fn contains(&self, year: i32) -> bool {
        match self {
            YearBucket::Year2023 => year == 2023,
            YearBucket::Recent => (2020..=2023).contains(&year),
            YearBucket::Late2010s => (2015..=2019).contains(&year),
            YearBucket::Before2015 => year < 2015,
        }
    }
}

impl fmt::Display for YearBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for YearBucket {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        YearBucket::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FilterError::UnknownYear(s.to_string()))
    }
}

/// Ordering applied after filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortMode {
    /// Descending by rating
    TopRated,
    /// Descending by playtime
    MostPlayed,
    /// Descending by release date
    NewReleases,
}

impl SortMode {
    pub const ALL: [SortMode; 3] = [SortMode::TopRated, SortMode::MostPlayed, SortMode::NewReleases];

    pub fn name(&self) -> &'static str {
        match self {
            SortMode::TopRated => "Top Rated",
            SortMode::MostPlayed => "Most Played",
            SortMode::NewReleases => "New Releases",
        }
    }

    fn sort(&self, games: &mut [GameSummary]) {
        match self {
            SortMode::TopRated => {
                games.sort_by(|a, b| b.sort_rating().total_cmp(&a.sort_rating()));
            }
            SortMode::MostPlayed => {
                games.sort_by(|a, b| b.sort_playtime().cmp(&a.sort_playtime()));
            }
            SortMode::NewReleases => {
                games.sort_by(|a, b| b.sort_released().cmp(&a.sort_released()));
            }
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortMode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortMode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FilterError::UnknownSort(s.to_string()))
    }
}

/// One of the four independent filter axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FilterAxis {
    Category,
    Tag,
    Year,
    Sort,
}

impl FilterAxis {
    pub fn name(&self) -> &'static str {
        match self {
            FilterAxis::Category => "category",
            FilterAxis::Tag => "tag",
            FilterAxis::Year => "year",
            FilterAxis::Sort => "sort",
        }
    }
}

impl FromStr for FilterAxis {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "category" | "genre" => Ok(FilterAxis::Category),
            "tag" => Ok(FilterAxis::Tag),
            "year" => Ok(FilterAxis::Year),
            "sort" | "popularity" => Ok(FilterAxis::Sort),
            _ => Err(FilterError::UnknownAxis(s.to_string())),
        }
    }
}

/// Current filter selection. `None` on an axis means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub year: Option<YearBucket>,
    pub sort: Option<SortMode>,
}

impl FilterSelection {
    /// Check whether no axis is set
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.tag.is_none() && self.year.is_none() && self.sort.is_none()
    }

    /// Select `value` on `axis`, or clear the axis if `value` is already selected.
    /// An empty value clears the axis.
    pub fn toggle(&mut self, axis: FilterAxis, value: &str) -> Result<(), FilterError> {
        let value = value.trim();
        if value.is_empty() {
            self.clear(axis);
            return Ok(());
        }

        match axis {
            FilterAxis::Category => toggle_label(&mut self.category, value),
            FilterAxis::Tag => toggle_label(&mut self.tag, value),
            FilterAxis::Year => {
                let bucket: YearBucket = value.parse()?;
                self.year = if self.year == Some(bucket) { None } else { Some(bucket) };
            }
            FilterAxis::Sort => {
                let mode: SortMode = value.parse()?;
                self.sort = if self.sort == Some(mode) { None } else { Some(mode) };
            }
        }
        Ok(())
    }

    /// Clear a single axis
    pub fn clear(&mut self, axis: FilterAxis) {
        match axis {
            FilterAxis::Category => self.category = None,
            FilterAxis::Tag => self.tag = None,
            FilterAxis::Year => self.year = None,
            FilterAxis::Sort => self.sort = None,
        }
    }

    /// Clear every axis
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    /// The axes that are set, with their display values
    pub fn active(&self) -> Vec<(FilterAxis, String)> {
        let mut active = Vec::new();
        if let Some(c) = &self.category {
            active.push((FilterAxis::Category, c.clone()));
        }
        if let Some(t) = &self.tag {
            active.push((FilterAxis::Tag, t.clone()));
        }
        if let Some(y) = self.year {
            active.push((FilterAxis::Year, y.name().to_string()));
        }
        if let Some(s) = self.sort {
            active.push((FilterAxis::Sort, s.name().to_string()));
        }
        active
    }

    /// Check whether a game passes the category, tag and year predicates
    pub fn matches(&self, game: &GameSummary) -> bool {
        if let Some(category) = &self.category
            && !game.has_genre(category)
        {
            return false;
        }
        if let Some(tag) = &self.tag
            && !game.has_tag(tag)
        {
            return false;
        }
        if let Some(bucket) = self.year {
            // Games without a release date never pass a year filter
            return game.release_year().is_some_and(|y| bucket.contains(y));
        }
        true
    }
}

fn toggle_label(slot: &mut Option<String>, value: &str) {
    if slot.as_deref() == Some(value) {
        *slot = None;
    } else {
        *slot = Some(value.to_string());
    }
}

/// Filter and order `games` according to `selection`
pub fn apply(games: &[GameSummary], selection: &FilterSelection) -> Vec<GameSummary> {
    let mut result: Vec<GameSummary> = games
        .iter()
        .filter(|g| selection.matches(g))
        .cloned()
        .collect();

    if let Some(mode) = selection.sort {
        mode.sort(&mut result);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Label;
    use chrono::NaiveDate;

    fn game(id: u64, released: Option<&str>) -> GameSummary {
        GameSummary {
            id,
            name: format!("Game {}", id),
            background_image: None,
            rating: None,
            released: released.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            playtime: None,
            genres: Vec::new(),
            tags: Vec::new(),
        }
    }

    fn label(name: &str) -> Label {
        Label {
            name: name.to_string(),
        }
    }

    fn ids(games: &[GameSummary]) -> Vec<u64> {
        games.iter().map(|g| g.id).collect()
    }

    #[test]
    fn test_empty_selection_is_identity() {
        let games = vec![game(3, None), game(1, Some("2010-05-01")), game(2, Some("2023-02-02"))];
        let result = apply(&games, &FilterSelection::default());
        assert_eq!(result, games);
    }

    #[test]
    fn test_category_and_tag_filters() {
        let mut rpg = game(1, None);
        rpg.genres = vec![label("RPG"), label("Action")];
        rpg.tags = vec![label("Open World")];
        let mut strategy = game(2, None);
        strategy.genres = vec![label("Strategy")];
        strategy.tags = vec![label("Open World")];
        let games = vec![rpg, strategy];

        let mut selection = FilterSelection::default();
        selection.toggle(FilterAxis::Category, "RPG").unwrap();
        let result = apply(&games, &selection);
        assert_eq!(ids(&result), vec![1]);
        assert!(result.iter().all(|g| g.has_genre("RPG")));

        selection.clear(FilterAxis::Category);
        selection.toggle(FilterAxis::Tag, "Open World").unwrap();
        assert_eq!(ids(&apply(&games, &selection)), vec![1, 2]);

        selection.toggle(FilterAxis::Category, "Strategy").unwrap();
        assert_eq!(ids(&apply(&games, &selection)), vec![2]);
    }

    #[test]
    fn test_year_bucket_boundaries() {
        assert!(YearBucket::Year2023.contains(2023));
        assert!(!YearBucket::Year2023.contains(2022));

        assert!(YearBucket::Recent.contains(2020));
        assert!(YearBucket::Recent.contains(2023));
        assert!(!YearBucket::Recent.contains(2019));

        assert!(YearBucket::Late2010s.contains(2015));
        assert!(YearBucket::Late2010s.contains(2019));
        assert!(!YearBucket::Late2010s.contains(2020));
        assert!(!YearBucket::Late2010s.contains(2014));

        assert!(YearBucket::Before2015.contains(2014));
        assert!(!YearBucket::Before2015.contains(2015));
    }

    #[test]
    fn test_year_filter_on_new_year_release() {
        let games = vec![game(1, Some("2020-01-01"))];
        let mut selection = FilterSelection::default();

        selection.year = Some(YearBucket::Recent);
        assert_eq!(apply(&games, &selection).len(), 1);
        selection.year = Some(YearBucket::Late2010s);
        assert!(apply(&games, &selection).is_empty());
        selection.year = Some(YearBucket::Before2015);
        assert!(apply(&games, &selection).is_empty());
    }

    #[test]
    fn test_year_filter_excludes_undated() {
        let games = vec![game(1, None), game(2, Some("2001-07-04"))];
        for bucket in YearBucket::ALL {
            let selection = FilterSelection {
                year: Some(bucket),
                ..Default::default()
            };
            assert!(apply(&games, &selection).iter().all(|g| g.released.is_some()));
        }
    }

    #[test]
    fn test_sort_top_rated_missing_as_zero() {
        let mut a = game(1, None);
        a.rating = Some(3.5);
        let b = game(2, None);
        let mut c = game(3, None);
        c.rating = Some(4.8);
        let selection = FilterSelection {
            sort: Some(SortMode::TopRated),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&[a, b, c], &selection)), vec![3, 1, 2]);
    }

    #[test]
    fn test_sort_most_played() {
        let mut a = game(1, None);
        a.playtime = Some(10);
        let mut b = game(2, None);
        b.playtime = Some(80);
        let c = game(3, None);
        let selection = FilterSelection {
            sort: Some(SortMode::MostPlayed),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&[a, b, c], &selection)), vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_new_releases_undated_last() {
        let games = vec![game(1, None), game(2, Some("2015-03-01")), game(3, Some("2023-11-20"))];
        let selection = FilterSelection {
            sort: Some(SortMode::NewReleases),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&games, &selection)), vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_applies_after_filter() {
        let mut a = game(1, Some("2021-01-01"));
        a.rating = Some(2.0);
        let mut b = game(2, Some("2010-01-01"));
        b.rating = Some(5.0);
        let mut c = game(3, Some("2022-01-01"));
        c.rating = Some(4.0);
        let selection = FilterSelection {
            year: Some(YearBucket::Recent),
            sort: Some(SortMode::TopRated),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&[a, b, c], &selection)), vec![3, 1]);
    }

    #[test]
    fn test_toggle_same_value_clears() {
        let mut selection = FilterSelection::default();
        selection.toggle(FilterAxis::Year, "2015-2019").unwrap();
        assert_eq!(selection.year, Some(YearBucket::Late2010s));
        selection.toggle(FilterAxis::Year, "2015-2019").unwrap();
        assert_eq!(selection.year, None);

        selection.toggle(FilterAxis::Category, "RPG").unwrap();
        selection.toggle(FilterAxis::Category, "Action").unwrap();
        assert_eq!(selection.category.as_deref(), Some("Action"));
    }

    #[test]
    fn test_toggle_rejects_unknown_values() {
        let mut selection = FilterSelection::default();
        assert_eq!(
            selection.toggle(FilterAxis::Sort, "Cheapest"),
            Err(FilterError::UnknownSort("Cheapest".to_string()))
        );
        assert!(selection.is_empty());
        assert!("price".parse::<FilterAxis>().is_err());
    }

    #[test]
    fn test_active_and_clear_all() {
        let mut selection = FilterSelection::default();
        selection.toggle(FilterAxis::Tag, "Story Rich").unwrap();
        selection.toggle(FilterAxis::Sort, "top rated").unwrap();

        let active = selection.active();
        assert_eq!(
            active,
            vec![
                (FilterAxis::Tag, "Story Rich".to_string()),
                (FilterAxis::Sort, "Top Rated".to_string()),
            ]
        );

        selection.clear_all();
        assert!(selection.is_empty());
    }
}
