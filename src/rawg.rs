//! RAWG API client for fetching game listings, details and screenshots.
//!
//! This module provides:
//!
//! - `RawgClient`: HTTP client wrapper holding the API key and request timeout
//! - `CatalogSource`: the read-only catalog interface the rest of the crate consumes
//! - `Page`: the paginated envelope the API wraps collections in
//!
//! `RawgClient`'s inherent methods report failures as `CatalogError`. The
//! `CatalogSource` implementation collapses every failure (missing key, network,
//! timeout, bad status, undecodable body) into an empty result and logs it, so
//! callers only ever see "no data".

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::ApiConfig;
use crate::model::{GameDetails, GameSummary, Screenshot};

/// User agent for API requests
const USER_AGENT: &str = concat!("GameHub/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("No RAWG API key configured")]
    MissingApiKey,

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RAWG API error: {0}")]
    Status(reqwest::StatusCode),
}

/// Paginated collection returned by list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Total matches on the server
    #[serde(default)]
    pub count: u64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Read-only access to the remote game catalog.
///
/// Implementations never fail: errors degrade to empty results.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// List games, optionally matching a free-text query
    async fn list_games(&self, query: Option<&str>, page_size: u32) -> Vec<GameSummary>;

    /// Fetch the extended record for one game
    async fn game_details(&self, id: u64) -> Option<GameDetails>;

    /// Fetch the screenshot gallery for one game
    async fn screenshots(&self, id: u64) -> Vec<Screenshot>;
}

/// RAWG API client
#[derive(Clone)]
pub struct RawgClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RawgClient {
    /// Create a new client from API settings
    pub fn new(config: &ApiConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let api_key = config.key.clone().filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("No RAWG API key configured; catalog requests will return nothing");
        }

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// GET `{base}/{path}` with the API key attached and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let key = self.api_key.as_deref().ok_or(CatalogError::MissingApiKey)?;
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(&[("key", key)])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status()));
        }

        Ok(response.json().await?)
    }

    /// Fetch one page of games, optionally filtered by a search term
    pub async fn fetch_games(
        &self,
        query: Option<&str>,
        page_size: u32,
    ) -> Result<Page<GameSummary>, CatalogError> {
        let start = Instant::now();
        let mut params = vec![("page_size", page_size.to_string())];
        if let Some(q) = query {
            params.push(("search", q.to_string()));
        }

        let page: Page<GameSummary> = self.get_json("games", &params).await?;
        tracing::info!(
            "Fetched {} of {} games{} in {:.1}s",
            page.results.len(),
            page.count,
            query.map(|q| format!(" for {:?}", q)).unwrap_or_default(),
            start.elapsed().as_secs_f32()
        );
        Ok(page)
    }

    /// Fetch the details record for a game
    pub async fn fetch_details(&self, id: u64) -> Result<GameDetails, CatalogError> {
        self.get_json(&format!("games/{}", id), &[]).await
    }

    /// Fetch a game's screenshots
    pub async fn fetch_screenshots(&self, id: u64) -> Result<Page<Screenshot>, CatalogError> {
        self.get_json(&format!("games/{}/screenshots", id), &[]).await
    }
}

#[async_trait]
impl CatalogSource for RawgClient {
    async fn list_games(&self, query: Option<&str>, page_size: u32) -> Vec<GameSummary> {
        match self.fetch_games(query, page_size).await {
            Ok(page) => page.results,
            Err(e) => {
                tracing::warn!("Failed to fetch games: {}", e);
                Vec::new()
            }
        }
    }

    async fn game_details(&self, id: u64) -> Option<GameDetails> {
        match self.fetch_details(id).await {
            Ok(details) => Some(details),
            Err(e) => {
                tracing::warn!("Failed to fetch details for game {}: {}", id, e);
                None
            }
        }
    }

    async fn screenshots(&self, id: u64) -> Vec<Screenshot> {
        match self.fetch_screenshots(id).await {
            Ok(page) => page.results,
            Err(e) => {
                tracing::warn!("Failed to fetch screenshots for game {}: {}", id, e);
                Vec::new()
            }
        }
    }
}
