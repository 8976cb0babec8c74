//! Memoized player identity lookups
//!
//! Every distinct player is looked up upstream at most once per resolver.
//! Failures are cached as `exists = false` profiles and never retried.

use ahash::AHashMap;

use crate::api::client::RatingService;
use crate::core::error::LookupFailure;
use crate::core::types::{PlayerId, PlayerProfile};
use crate::lookup::LookupStats;

#[derive(Debug, Default)]
pub struct IdentityResolver {
    profiles: AHashMap<PlayerId, PlayerProfile>,
    failures: AHashMap<PlayerId, LookupFailure>,
    stats: LookupStats,
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a player's profile, consulting the cache first
    ///
    /// Never fails: upstream errors produce a cached profile with
    /// `exists = false`, whose cause is available from [`Self::failure`].
    pub async fn resolve<S: RatingService>(&mut self, service: &S, id: &PlayerId) -> PlayerProfile {
        if let Some(profile) = self.profiles.get(id) {
            self.stats.cache_hits += 1;
            tracing::trace!("Using cached player info for {}", id);
            return profile.clone();
        }

        tracing::debug!("Fetching player info for {}", id);
        self.stats.network_calls += 1;

        let profile = match service.fetch_player(id).await {
            Ok(profile) => {
                tracing::debug!("Found player: {} (code: {})", profile.display_name, id);
                profile
            }
            Err(e) => {
                let failure = LookupFailure::classify(&e);
                match failure {
                    LookupFailure::NotFound => tracing::debug!("Player {} not found: {}", id, e),
                    _ => tracing::warn!("Error fetching player info for {}: {}", id, e),
                }
                self.failures.insert(id.clone(), failure);
                PlayerProfile::missing(id)
            }
        };

        self.profiles.insert(id.clone(), profile.clone());
        profile
    }

    /// Cached profile, without touching the network
    pub fn cached(&self, id: &PlayerId) -> Option<&PlayerProfile> {
        self.profiles.get(id)
    }

    /// Why the lookup for `id` failed, if it did
    pub fn failure(&self, id: &PlayerId) -> Option<LookupFailure> {
        self.failures.get(id).copied()
    }

    /// Number of distinct players cached (found or not)
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn stats(&self) -> LookupStats {
        self.stats
    }
}
