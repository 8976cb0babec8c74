//! Wire schema for the ECF rating API
//!
//! The service is loosely typed: codes arrive as strings or numbers, scores
//! as numbers or numeric strings, and most fields may be missing. These
//! structs accept that shape and the parse step turns it into domain types.

use serde::Deserialize;
use serde_json::Value;

use crate::core::error::{Result, SeparationError};
use crate::core::types::{Colour, GameRecord, GameResult, PlayerId, PlayerProfile};

/// `v2/players/code/{code}` response
#[derive(Debug, Deserialize)]
pub struct ApiPlayer {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl From<ApiPlayer> for PlayerProfile {
    fn from(player: ApiPlayer) -> Self {
        let display_name = player
            .full_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        PlayerProfile::new(display_name, player.title)
    }
}

/// `v2/games/{category}/player/{code}/limit/{n}` response
#[derive(Debug, Deserialize)]
pub struct ApiGameList {
    #[serde(default)]
    pub games: Vec<Value>,
}

/// One entry of `games`, before validation
#[derive(Debug, Deserialize)]
pub struct ApiGame {
    #[serde(default)]
    pub opponent_no: Option<Value>,
    #[serde(default)]
    pub opponent_name: Option<String>,
    #[serde(default)]
    pub colour: Option<String>,
    #[serde(default)]
    pub score: Option<Value>,
    #[serde(default)]
    pub game_date: Option<String>,
}

impl TryFrom<ApiGame> for GameRecord {
    type Error = SeparationError;

    fn try_from(game: ApiGame) -> Result<Self> {
        let score = game
            .score
            .as_ref()
            .and_then(value_as_f64)
            .ok_or_else(|| SeparationError::MalformedResponse(format!("bad score: {:?}", game.score)))?;
        let result = GameResult::from_score(score)
            .ok_or_else(|| SeparationError::MalformedResponse(format!("unknown score: {}", score)))?;

        Ok(GameRecord {
            opponent_id: game.opponent_no.as_ref().and_then(value_as_player_id),
            opponent_name: game.opponent_name.unwrap_or_else(|| "Unknown".to_string()),
            colour: game
                .colour
                .as_deref()
                .map(Colour::from_code)
                .unwrap_or(Colour::Unknown),
            result,
            date: game.game_date.unwrap_or_default(),
        })
    }
}

/// Parse an identity response body
pub fn parse_player(body: &str) -> Result<PlayerProfile> {
    let player: ApiPlayer = serde_json::from_str(body)?;
    Ok(player.into())
}

/// Parse a game-history response body
///
/// A body that is not a game list is an error. Individual entries that do
/// not validate are dropped so one bad row does not hide the rest.
pub fn parse_games(body: &str) -> Result<Vec<GameRecord>> {
    let list: ApiGameList = serde_json::from_str(body)?;
    let total = list.games.len();

    let games: Vec<GameRecord> = list
        .games
        .into_iter()
        .filter_map(|raw| {
            let parsed = serde_json::from_value::<ApiGame>(raw)
                .map_err(SeparationError::from)
                .and_then(GameRecord::try_from);
            match parsed {
                Ok(game) => Some(game),
                Err(e) => {
                    tracing::debug!("Dropping unparseable game entry: {}", e);
                    None
                }
            }
        })
        .collect();

    if games.len() < total {
        tracing::debug!("Kept {} of {} game entries", games.len(), total);
    }
    Ok(games)
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_player_id(value: &Value) -> Option<PlayerId> {
    match value {
        Value::String(s) => PlayerId::parse(s).ok(),
        Value::Number(n) => n.as_u64().and_then(|code| PlayerId::parse(&code.to_string()).ok()),
        _ => None,
    }
}
