//! Details view state: the open game, its screenshots, and the carousel.
//!
//! Opening a game records which id is being viewed. A fetch that finishes after
//! the user has moved on to another game is dropped instead of replacing the
//! newer view.

use crate::carousel::Carousel;
use crate::model::{GameDetails, Screenshot};
use crate::rawg::CatalogSource;

/// Result of fetching one game's details and screenshots
#[derive(Debug, Clone)]
pub struct LoadedDetails {
    pub id: u64,
    pub details: Option<GameDetails>,
    pub screenshots: Vec<Screenshot>,
}

/// Fetch details and screenshots for `id` concurrently
pub async fn fetch<C: CatalogSource + ?Sized>(client: &C, id: u64) -> LoadedDetails {
    let (details, screenshots) = futures::join!(client.game_details(id), client.screenshots(id));
    LoadedDetails {
        id,
        details,
        screenshots,
    }
}

/// Details-related state
#[derive(Debug, Default)]
pub struct DetailsState {
    /// Game currently being viewed
    viewing: Option<u64>,
    /// Details of the viewed game, once loaded
    pub details: Option<GameDetails>,
    /// Screenshot carousel of the viewed game
    pub screenshots: Carousel<Screenshot>,
}

impl DetailsState {
    pub fn viewing(&self) -> Option<u64> {
        self.viewing
    }

    /// Start viewing `id`, discarding whatever was shown before
    pub fn begin(&mut self, id: u64) {
        self.viewing = Some(id);
        self.details = None;
        self.screenshots = Carousel::default();
    }

    /// Apply a finished fetch. Returns false if it was for a game no longer viewed.
    pub fn complete(&mut self, loaded: LoadedDetails) -> bool {
        if self.viewing != Some(loaded.id) {
            tracing::debug!("Discarding details for game {} (no longer viewed)", loaded.id);
            return false;
        }

        self.details = loaded.details;
        self.screenshots = Carousel::new(loaded.screenshots);
        true
    }

    /// View `id` and wait for its data
    pub async fn open<C: CatalogSource + ?Sized>(&mut self, client: &C, id: u64) -> bool {
        self.begin(id);
        let loaded = fetch(client, id).await;
        self.complete(loaded)
    }

    /// Stop viewing
    pub fn close(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GameSummary;
    use async_trait::async_trait;

    struct FakeCatalog;

    #[async_trait]
    impl CatalogSource for FakeCatalog {
        async fn list_games(&self, _query: Option<&str>, _page_size: u32) -> Vec<GameSummary> {
            Vec::new()
        }

        async fn game_details(&self, id: u64) -> Option<GameDetails> {
            if id == 404 {
                return None;
            }
            Some(
                serde_json::from_value(serde_json::json!({ "id": id, "name": format!("Game {}", id) }))
                    .unwrap(),
            )
        }

        async fn screenshots(&self, id: u64) -> Vec<Screenshot> {
            if id == 404 {
                return Vec::new();
            }
            (0..id.min(3))
                .map(|i| Screenshot {
                    id: i,
                    image: format!("https://media.example/{}/{}.jpg", id, i),
                })
                .collect()
        }
    }

    #[tokio::test]
    async fn test_open_loads_details_and_carousel() {
        let mut state = DetailsState::default();
        assert!(state.open(&FakeCatalog, 7).await);

        assert_eq!(state.details.as_ref().map(|d| d.id), Some(7));
        assert_eq!(state.screenshots.len(), 3);
        assert_eq!(state.screenshots.index(), 0);
    }

    #[tokio::test]
    async fn test_stale_details_discarded() {
        let mut state = DetailsState::default();
        state.begin(1);
        let first = fetch(&FakeCatalog, 1).await;

        state.begin(2);
        assert!(!state.complete(first));
        assert!(state.details.is_none());

        let second = fetch(&FakeCatalog, 2).await;
        assert!(state.complete(second));
        assert_eq!(state.viewing(), Some(2));
        assert_eq!(state.screenshots.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_empty_view() {
        let mut state = DetailsState::default();
        assert!(state.open(&FakeCatalog, 404).await);
        assert!(state.details.is_none());
        assert!(state.screenshots.is_empty());
    }

    #[test]
    fn test_close_resets() {
        let mut state = DetailsState::default();
        state.begin(3);
        state.close();
        assert_eq!(state.viewing(), None);
    }
}
