//! Derive the outgoing beat-edges of one player

use std::collections::BTreeSet;

use crate::api::client::RatingService;
use crate::core::types::{GameCategory, PlayerId};
use crate::lookup::ResultFetcher;

/// Distinct opponents `player` has beaten in any category
///
/// Wins without an opponent code, and wins recorded against the player's own
/// code, contribute no edge. Failed fetches count as no games.
pub async fn beaten_opponents<S: RatingService>(
    fetcher: &mut ResultFetcher,
    service: &S,
    player: &PlayerId,
    limit: u32,
) -> BTreeSet<PlayerId> {
    let mut beaten = BTreeSet::new();

    for category in GameCategory::ALL {
        let games = fetcher.fetch_games(service, player, category, limit).await;
        let mut wins_in_category = 0;

        for game in games.iter().filter(|g| g.is_win()) {
            wins_in_category += 1;
            match &game.opponent_id {
                Some(opponent) if opponent != player => {
                    tracing::trace!(
                        "  Win as {:?} against {} ({}) in {} game on {}",
                        game.colour,
                        game.opponent_name,
                        opponent,
                        category,
                        game.date
                    );
                    beaten.insert(opponent.clone());
                }
                Some(_) => tracing::debug!("  Ignoring {} win recorded against self", category),
                None => tracing::debug!(
                    "  Ignoring {} win against {} with no opponent code",
                    category,
                    game.opponent_name
                ),
            }
        }

        tracing::debug!("  Found {} wins in {} for {}", wins_in_category, category, player);
    }

    tracing::debug!("Total unique opponents beaten by {}: {}", player, beaten.len());
    beaten
}
