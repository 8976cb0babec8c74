//! Async client for the ECF rating API
//!
//! Only two endpoints are used: player identity and per-category game
//! history. Both return `Result`; callers decide how to degrade.

use std::future::Future;

use reqwest::{Client, StatusCode};

use crate::api::schema::{parse_games, parse_player};
use crate::core::config::SearchConfig;
use crate::core::error::{Result, SeparationError};
use crate::core::types::{GameCategory, GameRecord, PlayerId, PlayerProfile};

/// Source of player identities and game histories
///
/// Implemented over HTTP by [`RatingClient`] and in memory by
/// [`crate::api::memory::InMemoryRatingService`].
pub trait RatingService {
    /// Look up a player's profile
    ///
    /// Errors: `NotFound` when the service has no such player,
    /// `UpstreamUnavailable` on transport or status failure,
    /// `MalformedResponse` when the body does not match the schema.
    fn fetch_player(&self, id: &PlayerId) -> impl Future<Output = Result<PlayerProfile>>;

    /// Fetch up to `limit` most recent games of one category
    fn fetch_games(
        &self,
        id: &PlayerId,
        category: GameCategory,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<GameRecord>>>;
}

/// HTTP implementation of [`RatingService`]
pub struct RatingClient {
    client: Client,
    base_url: String,
}

impl RatingClient {
    /// Create a client with an explicit base URL and default timeouts
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Create a client from search configuration (base URL and timeout)
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SeparationError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn player_url(&self, id: &PlayerId) -> String {
        format!("{}?v2/players/code/{}", self.base_url, id)
    }

    fn games_url(&self, id: &PlayerId, category: GameCategory, limit: u32) -> String {
        format!(
            "{}?v2/games/{}/player/{}/limit/{}",
            self.base_url,
            category.as_path_segment(),
            id,
            limit
        )
    }

    /// GET a URL and return the body of a successful response
    async fn get_body(&self, url: &str) -> Result<String> {
        tracing::trace!("API request: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SeparationError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, url));
        }

        response
            .text()
            .await
            .map_err(|e| SeparationError::UpstreamUnavailable(e.to_string()))
    }
}

impl RatingService for RatingClient {
    async fn fetch_player(&self, id: &PlayerId) -> Result<PlayerProfile> {
        let body = self.get_body(&self.player_url(id)).await?;
        parse_player(&body).map_err(|e| malformed(e, "player", id))
    }

    async fn fetch_games(
        &self,
        id: &PlayerId,
        category: GameCategory,
        limit: u32,
    ) -> Result<Vec<GameRecord>> {
        let body = self.get_body(&self.games_url(id, category, limit)).await?;
        parse_games(&body).map_err(|e| malformed(e, "games", id))
    }
}

/// Map a non-success status onto the error taxonomy
///
/// Client errors other than rate limiting mean the service does not know the
/// player; everything else is treated as the service being unavailable.
fn status_error(status: StatusCode, url: &str) -> SeparationError {
    if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
        SeparationError::NotFound(format!("{} returned {}", url, status))
    } else {
        SeparationError::UpstreamUnavailable(format!("{} returned {}", url, status))
    }
}

fn malformed(err: SeparationError, what: &str, id: &PlayerId) -> SeparationError {
    SeparationError::MalformedResponse(format!("{} response for {}: {}", what, id, err))
}
