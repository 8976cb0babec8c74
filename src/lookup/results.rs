//! Memoized game-history lookups, keyed by (player, category)

use std::sync::Arc;

use ahash::AHashMap;

use crate::api::client::RatingService;
use crate::core::types::{GameCategory, GameRecord, PlayerId};
use crate::lookup::LookupStats;

#[derive(Debug, Default)]
pub struct ResultFetcher {
    games: AHashMap<(PlayerId, GameCategory), Arc<[GameRecord]>>,
    stats: LookupStats,
}

impl ResultFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a player's games in one category
    ///
    /// `limit` is passed upstream only on the first call for a key; later calls
    /// return the cached list whatever limit they ask for. Failures cache an
    /// empty list.
    pub async fn fetch_games<S: RatingService>(
        &mut self,
        service: &S,
        id: &PlayerId,
        category: GameCategory,
        limit: u32,
    ) -> Arc<[GameRecord]> {
        let key = (id.clone(), category);
        if let Some(games) = self.games.get(&key) {
            self.stats.cache_hits += 1;
            tracing::trace!("Using cached {} games for {}", category, id);
            return Arc::clone(games);
        }

        tracing::debug!("Fetching {} games for {}", category, id);
        self.stats.network_calls += 1;

        let games: Arc<[GameRecord]> = match service.fetch_games(id, category, limit).await {
            Ok(games) => {
                tracing::debug!("Found {} {} games for {}", games.len(), category, id);
                games.into()
            }
            Err(e) => {
                tracing::warn!("Error fetching {} games for {}: {}", category, id, e);
                Arc::from(Vec::new())
            }
        };

        self.games.insert(key, Arc::clone(&games));
        games
    }

    /// Number of (player, category) lists cached
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn stats(&self) -> LookupStats {
        self.stats
    }
}
