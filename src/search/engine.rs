//! Breadth-first search over the implicit beat-graph
//!
//! Edges are discovered lazily: a player's beaten opponents are fetched only
//! when that player is dequeued. The queue is strictly FIFO, so depth `d` is
//! exhausted before depth `d + 1` and the first titled player reached is at
//! minimum depth.
//!
//! Reported values follow the "direct win is 0" convention: a titled player
//! beaten by the start gives 0, one reached while expanding a node at depth
//! `d > 0` gives `d + 1`.

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};

use crate::api::client::RatingService;
use crate::core::config::SearchConfig;
use crate::core::error::{LookupFailure, Result, SeparationError};
use crate::core::types::{PlayerId, PlayerProfile};
use crate::lookup::{IdentityResolver, LookupStats, ResultFetcher};
use crate::search::title::{classify, TitleSource};
use crate::search::wins::beaten_opponents;

/// Outcome of a separation search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Separation {
    /// A titled player was reached
    Found {
        hops: u32,
        /// Display names from the start player to the titled player
        path: Vec<String>,
        titled: PlayerId,
    },
    /// No titled player within the depth bound
    NotFound,
}

impl Separation {
    pub fn hops(&self) -> Option<u32> {
        match self {
            Separation::Found { hops, .. } => Some(*hops),
            Separation::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Separation::Found { .. })
    }
}

/// Counters across every search run by one engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub profiles: LookupStats,
    pub games: LookupStats,
    /// Players whose beaten opponents were computed
    pub nodes_expanded: usize,
    /// Searches answered from the separation cache
    pub separation_hits: usize,
    /// Separation results currently cached
    pub separations_cached: usize,
}

/// Queue entry: a player waiting to be expanded
#[derive(Debug)]
struct Frontier {
    id: PlayerId,
    depth: u32,
    path: Vec<String>,
}

/// Value reported for a titled player found while expanding a node at `depth`
fn reported_hops(depth: u32) -> u32 {
    if depth == 0 {
        0
    } else {
        depth + 1
    }
}

/// A finished search and the bound it ran under
#[derive(Debug, Clone)]
struct CachedSeparation {
    max_depth: u32,
    outcome: Separation,
}

impl CachedSeparation {
    /// Answer a search bounded by `max_depth`, if this entry determines it
    ///
    /// A `Found` is minimal, so it answers any bound: itself when within the
    /// bound, `NotFound` otherwise. A `NotFound` only answers bounds no larger
    /// than the one it was computed under.
    fn answer(&self, max_depth: u32) -> Option<Separation> {
        match &self.outcome {
            Separation::Found { hops, .. } if *hops <= max_depth => Some(self.outcome.clone()),
            Separation::Found { .. } => Some(Separation::NotFound),
            Separation::NotFound if self.max_depth >= max_depth => Some(Separation::NotFound),
            Separation::NotFound => None,
        }
    }
}

/// Search session owning the upstream service and all three caches
pub struct SeparationEngine<S> {
    service: S,
    config: SearchConfig,
    identities: IdentityResolver,
    results: ResultFetcher,
    separations: AHashMap<PlayerId, CachedSeparation>,
    nodes_expanded: usize,
    separation_hits: usize,
}

impl<S: RatingService> SeparationEngine<S> {
    pub fn new(service: S, config: SearchConfig) -> Self {
        Self {
            service,
            config,
            identities: IdentityResolver::new(),
            results: ResultFetcher::new(),
            separations: AHashMap::new(),
            nodes_expanded: 0,
            separation_hits: 0,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Profile already in the identity cache, without counting a cache hit
    pub fn cached_profile(&self, id: &PlayerId) -> Option<&PlayerProfile> {
        self.identities.cached(id)
    }

    /// Why the identity lookup for `id` failed, if it did
    pub fn lookup_failure(&self, id: &PlayerId) -> Option<LookupFailure> {
        self.identities.failure(id)
    }

    /// Result of the latest completed search from `start`
    pub fn cached_separation(&self, start: &PlayerId) -> Option<&Separation> {
        self.separations.get(start).map(|cached| &cached.outcome)
    }

    /// Separation using the configured depth bound
    pub async fn run(&mut self, start: &PlayerId) -> Result<Separation> {
        let max_depth = self.config.max_depth;
        self.separation(start, max_depth).await
    }

    /// Minimum separation from `start` to any titled player, bounded by `max_depth`
    ///
    /// Results are cached per start player together with their bound. A cached
    /// `NotFound` from a smaller bound does not answer a larger one; the search
    /// reruns, served mostly from the identity and game caches.
    /// Fails only when `start` itself cannot be resolved; that outcome is not
    /// cached.
    pub async fn separation(&mut self, start: &PlayerId, max_depth: u32) -> Result<Separation> {
        if let Some(answer) = self
            .separations
            .get(start)
            .and_then(|cached| cached.answer(max_depth))
        {
            tracing::debug!("Using cached separation for {} (max depth {})", start, max_depth);
            self.separation_hits += 1;
            return Ok(answer);
        }

        let start_profile = self.identities.resolve(&self.service, start).await;
        if !start_profile.exists {
            let cause = self
                .identities
                .failure(start)
                .unwrap_or(LookupFailure::NotFound);
            tracing::warn!("Cannot start search from {}: {}", start, cause);
            return Err(SeparationError::StartUnresolved {
                id: start.clone(),
                cause,
            });
        }

        let delay = self.config.request_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        tracing::info!(
            "Calculating titled separation for {} (max depth {})",
            start_profile.display_name,
            max_depth
        );

        let outcome = self.search(start, start_profile, max_depth).await;
        match &outcome {
            Separation::Found { hops, path, .. } => {
                tracing::info!("Found path to titled player ({} hops): {}", hops, path.join(" → "))
            }
            Separation::NotFound => {
                tracing::info!("No path found to any titled player within {} hops", max_depth)
            }
        }

        self.separations.insert(
            start.clone(),
            CachedSeparation {
                max_depth,
                outcome: outcome.clone(),
            },
        );
        Ok(outcome)
    }

    async fn search(&mut self, start: &PlayerId, start_profile: PlayerProfile, max_depth: u32) -> Separation {
        let mut queue = VecDeque::new();
        let mut visited = AHashSet::new();

        // Mark before enqueue: every player enters the queue at most once
        visited.insert(start.clone());
        queue.push_back(Frontier {
            id: start.clone(),
            depth: 0,
            path: vec![start_profile.display_name],
        });

        while let Some(current) = queue.pop_front() {
            let hops_if_found = reported_hops(current.depth);
            if hops_if_found > max_depth {
                tracing::trace!("Depth bound reached at {}", current.id);
                continue;
            }

            tracing::debug!(
                "Expanding {} at depth {}",
                current.path.last().map(String::as_str).unwrap_or("?"),
                current.depth
            );
            self.nodes_expanded += 1;

            let beaten = beaten_opponents(
                &mut self.results,
                &self.service,
                &current.id,
                self.config.game_limit,
            )
            .await;

            for opponent in beaten {
                if !visited.insert(opponent.clone()) {
                    continue;
                }

                let profile = self.identities.resolve(&self.service, &opponent).await;
                if !profile.exists {
                    tracing::debug!("  Could not get info for opponent {}, skipping", opponent);
                    continue;
                }

                let mut path = current.path.clone();
                path.push(profile.display_name.clone());

                if let Some(source) = classify(&profile) {
                    match &source {
                        TitleSource::Declared(title) => {
                            tracing::info!("Found titled player: {} ({})", profile.display_name, title)
                        }
                        TitleSource::NamePrefix(prefix) => tracing::info!(
                            "Found titled player by name prefix: {} (starts with {})",
                            profile.display_name,
                            prefix
                        ),
                    }
                    return Separation::Found {
                        hops: hops_if_found,
                        path,
                        titled: opponent,
                    };
                }

                queue.push_back(Frontier {
                    id: opponent,
                    depth: current.depth + 1,
                    path,
                });
            }
        }

        Separation::NotFound
    }

    pub fn stats(&self) -> SearchStats {
        SearchStats {
            profiles: self.identities.stats(),
            games: self.results.stats(),
            nodes_expanded: self.nodes_expanded,
            separation_hits: self.separation_hits,
            separations_cached: self.separations.len(),
        }
    }
}
