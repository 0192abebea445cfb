//! Browse view state: the fetched games, the filter selection, and the page.

use crate::catalog::{self, FilterAxis, FilterError, FilterSelection};
use crate::model::GameSummary;
use crate::pagination::Paginator;
use crate::rawg::CatalogSource;

/// Browse-related state
#[derive(Debug, Default)]
pub struct CatalogState {
    /// Games as fetched, in server order
    games: Vec<GameSummary>,
    selection: FilterSelection,
    /// `games` after filtering and sorting
    filtered: Vec<GameSummary>,
    pager: Paginator,
    /// Whether the listing has been fetched at least once
    pub loaded: bool,
}

impl CatalogState {
    /// Fetch the listing and replace the current games
    pub async fn load<C: CatalogSource + ?Sized>(&mut self, client: &C, fetch_size: u32) {
        let games = client.list_games(None, fetch_size).await;
        self.set_games(games);
        self.loaded = true;
    }

    /// Replace the full game list
    pub fn set_games(&mut self, games: Vec<GameSummary>) {
        self.games = games;
        self.refresh();
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Toggle a filter value on one axis
    pub fn toggle_filter(&mut self, axis: FilterAxis, value: &str) -> Result<(), FilterError> {
        self.selection.toggle(axis, value)?;
        self.refresh();
        Ok(())
    }

    pub fn clear_filter(&mut self, axis: FilterAxis) {
        self.selection.clear(axis);
        self.refresh();
    }

    pub fn clear_filters(&mut self) {
        self.selection.clear_all();
        self.refresh();
    }

    /// Recompute the filtered list. Always returns to page 1.
    fn refresh(&mut self) {
        self.filtered = catalog::apply(&self.games, &self.selection);
        self.pager.reset(self.filtered.len());
        tracing::debug!(
            "{} of {} games match {:?}",
            self.filtered.len(),
            self.games.len(),
            self.selection
        );
    }

    /// Number of games passing the filters
    pub fn found_count(&self) -> usize {
        self.filtered.len()
    }

    /// True when the filters exclude everything (show a "no results" state)
    pub fn no_results(&self) -> bool {
        self.filtered.is_empty()
    }

    /// Games on the current page
    pub fn page_items(&self) -> &[GameSummary] {
        self.pager.page(&self.filtered)
    }

    pub fn pager(&self) -> &Paginator {
        &self.pager
    }

    pub fn next_page(&mut self) {
        self.pager.next();
    }

    pub fn previous_page(&mut self) {
        self.pager.previous();
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.pager.go_to(page);
    }

    /// Find a fetched game by id
    pub fn find(&self, id: u64) -> Option<&GameSummary> {
        self.games.iter().find(|g| g.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn games(count: u64) -> Vec<GameSummary> {
        (1..=count)
            .map(|id| {
                let genre = if id % 2 == 0 { "RPG" } else { "Action" };
                serde_json::from_value(serde_json::json!({
                    "id": id,
                    "name": format!("Game {}", id),
                    "released": format!("{}-06-01", 2000 + id),
                    "genres": [{ "name": genre }],
                }))
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_pages_over_filtered_list() {
        let mut state = CatalogState::default();
        state.set_games(games(25));
        assert_eq!(state.found_count(), 25);
        assert_eq!(state.pager().total_pages(), 3);
        assert_eq!(state.page_items().len(), 12);

        state.go_to_page(3);
        assert_eq!(state.page_items().len(), 1);
        assert_eq!(state.page_items()[0].id, 25);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut state = CatalogState::default();
        state.set_games(games(40));
        state.go_to_page(3);
        assert_eq!(state.pager().current(), 3);

        state.toggle_filter(FilterAxis::Category, "RPG").unwrap();
        assert_eq!(state.pager().current(), 1);
        assert_eq!(state.found_count(), 20);

        state.go_to_page(2);
        state.toggle_filter(FilterAxis::Sort, "New Releases").unwrap();
        assert_eq!(state.pager().current(), 1);
        assert_eq!(state.page_items()[0].id, 40);

        state.go_to_page(2);
        state.clear_filters();
        assert_eq!(state.pager().current(), 1);
    }

    #[test]
    fn test_new_data_resets_page() {
        let mut state = CatalogState::default();
        state.set_games(games(40));
        state.go_to_page(4);
        state.set_games(games(13));
        assert_eq!(state.pager().current(), 1);
        assert_eq!(state.pager().total_pages(), 2);
    }

    #[test]
    fn test_all_excluded_is_no_results() {
        let mut state = CatalogState::default();
        state.set_games(games(10));
        state.toggle_filter(FilterAxis::Year, "2023").unwrap();
        assert!(state.no_results());
        assert!(state.page_items().is_empty());
        assert_eq!(state.pager().total_pages(), 1);
    }

    #[test]
    fn test_invalid_filter_leaves_state() {
        let mut state = CatalogState::default();
        state.set_games(games(30));
        state.go_to_page(2);
        assert!(state.toggle_filter(FilterAxis::Year, "1990s").is_err());
        assert_eq!(state.pager().current(), 2);
    }
}
