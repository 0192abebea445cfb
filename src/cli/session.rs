//! State shared by commands within one CLI invocation or shell session

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::library::{FileStore, LibraryStore};
use crate::model::GameSummary;
use crate::rawg::{CatalogSource, RawgClient};
use crate::search::SearchDebouncer;
use crate::state::{CatalogState, DetailsState};

/// Live state for catalog commands
pub struct Session {
    pub config: Config,
    pub client: Arc<RawgClient>,
    pub catalog: CatalogState,
    pub details: DetailsState,
    pub library: LibraryStore<FileStore>,
    pub search: SearchDebouncer<RawgClient>,
}

impl Session {
    /// Load configuration and the saved library, and set up the API client
    pub fn open() -> Result<Self> {
        let config = Config::load()?;
        let client = Arc::new(RawgClient::new(&config.api).context("Failed to create HTTP client")?);
        let library = LibraryStore::load(FileStore::new(config.data_dir()?));
        let search = SearchDebouncer::new(
            Arc::clone(&client),
            Duration::from_millis(config.search.debounce_ms),
            config.search.result_limit,
        );

        Ok(Self {
            config,
            client,
            catalog: CatalogState::default(),
            details: DetailsState::default(),
            library,
            search,
        })
    }

    /// Fetch the browse listing if it has not been fetched yet (or `refresh`)
    pub async fn ensure_catalog(&mut self, refresh: bool) {
        if refresh || !self.catalog.loaded {
            let fetch_size = self.config.catalog.fetch_size;
            self.catalog.load(self.client.as_ref(), fetch_size).await;
        }
    }

    /// Find a game summary by id among everything already in memory,
    /// falling back to the details endpoint
    pub async fn find_summary(&self, id: u64) -> Option<GameSummary> {
        if let Some(game) = self.catalog.find(id) {
            return Some(game.clone());
        }
        if let Some(game) = self.search.current().games.into_iter().find(|g| g.id == id) {
            return Some(game);
        }
        if let Some(game) = self.library.snapshot().iter().find(|g| g.id == id) {
            return Some(game.clone());
        }
        if let Some(details) = self.details.details.as_ref().filter(|d| d.id == id) {
            return Some(details.summary());
        }

        self.client.game_details(id).await.map(|d| d.summary())
    }
}
