//! In-memory rating service
//!
//! Holds a fixed beat-graph and counts every call, so searches can be run
//! offline and their upstream traffic asserted on.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use ahash::AHashMap;

use crate::api::client::RatingService;
use crate::core::error::{LookupFailure, Result, SeparationError};
use crate::core::types::{Colour, GameCategory, GameRecord, GameResult, PlayerId, PlayerProfile};

#[derive(Debug, Default)]
pub struct InMemoryRatingService {
    players: AHashMap<PlayerId, PlayerProfile>,
    player_failures: AHashMap<PlayerId, LookupFailure>,
    games: AHashMap<(PlayerId, GameCategory), Vec<GameRecord>>,
    game_failures: AHashMap<(PlayerId, GameCategory), LookupFailure>,
    player_calls: AtomicUsize,
    game_calls: AtomicUsize,
    calls_by_player: Mutex<AHashMap<PlayerId, usize>>,
}

impl InMemoryRatingService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player. Codes that do not normalize are ignored.
    pub fn with_player(mut self, code: &str, name: &str, title: Option<&str>) -> Self {
        if let Ok(id) = PlayerId::parse(code) {
            self.players
                .insert(id, PlayerProfile::new(name, title.map(str::to_string)));
        }
        self
    }

    /// Make identity lookups for `code` fail
    pub fn with_failing_player(mut self, code: &str, failure: LookupFailure) -> Self {
        if let Ok(id) = PlayerId::parse(code) {
            self.player_failures.insert(id, failure);
        }
        self
    }

    /// Record a win of `winner` over `loser`
    pub fn with_win(self, winner: &str, loser: &str, category: GameCategory) -> Self {
        self.with_game(winner, Some(loser), GameResult::Win, category)
    }

    /// Record an arbitrary game in `owner`'s history
    pub fn with_game(
        mut self,
        owner: &str,
        opponent: Option<&str>,
        result: GameResult,
        category: GameCategory,
    ) -> Self {
        let Ok(owner) = PlayerId::parse(owner) else {
            return self;
        };
        let opponent_id = opponent.and_then(|code| PlayerId::parse(code).ok());
        let opponent_name = opponent_id
            .as_ref()
            .and_then(|id| self.players.get(id))
            .map(|p| p.display_name.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        self.games
            .entry((owner, category))
            .or_default()
            .push(GameRecord {
                opponent_id,
                opponent_name,
                colour: Colour::Unknown,
                result,
                date: String::new(),
            });
        self
    }

    /// Make game lookups for `code` in `category` fail
    pub fn with_failing_games(
        mut self,
        code: &str,
        category: GameCategory,
        failure: LookupFailure,
    ) -> Self {
        if let Ok(id) = PlayerId::parse(code) {
            self.game_failures.insert((id, category), failure);
        }
        self
    }

    /// Identity lookups served so far
    pub fn player_calls(&self) -> usize {
        self.player_calls.load(Ordering::SeqCst)
    }

    /// Game-history lookups served so far
    pub fn game_calls(&self) -> usize {
        self.game_calls.load(Ordering::SeqCst)
    }

    /// Total calls of either kind
    pub fn total_calls(&self) -> usize {
        self.player_calls() + self.game_calls()
    }

    /// Calls of either kind that concerned `id`
    pub fn calls_for(&self, id: &PlayerId) -> usize {
        self.calls_by_player
            .lock()
            .map(|calls| calls.get(id).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn record_call(&self, id: &PlayerId) {
        if let Ok(mut calls) = self.calls_by_player.lock() {
            *calls.entry(id.clone()).or_insert(0) += 1;
        }
    }
}

fn failure_error(failure: LookupFailure, id: &PlayerId) -> SeparationError {
    match failure {
        LookupFailure::NotFound => SeparationError::NotFound(id.to_string()),
        LookupFailure::Unavailable => SeparationError::UpstreamUnavailable(id.to_string()),
        LookupFailure::Malformed => SeparationError::MalformedResponse(id.to_string()),
    }
}

impl RatingService for InMemoryRatingService {
    fn fetch_player(&self, id: &PlayerId) -> impl Future<Output = Result<PlayerProfile>> {
        self.player_calls.fetch_add(1, Ordering::SeqCst);
        self.record_call(id);

        let outcome = if let Some(failure) = self.player_failures.get(id) {
            Err(failure_error(*failure, id))
        } else {
            self.players
                .get(id)
                .cloned()
                .ok_or_else(|| SeparationError::NotFound(id.to_string()))
        };
        std::future::ready(outcome)
    }

    fn fetch_games(
        &self,
        id: &PlayerId,
        category: GameCategory,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<GameRecord>>> {
        self.game_calls.fetch_add(1, Ordering::SeqCst);
        self.record_call(id);

        let key = (id.clone(), category);
        let outcome = if let Some(failure) = self.game_failures.get(&key) {
            Err(failure_error(*failure, id))
        } else {
            Ok(self
                .games
                .get(&key)
                .map(|games| games.iter().take(limit as usize).cloned().collect())
                .unwrap_or_default())
        };
        std::future::ready(outcome)
    }
}
