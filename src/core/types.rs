//! Core type definitions used throughout the codebase

use std::fmt;

use crate::core::error::{Result, SeparationError};

/// Normalized player identifier (ECF code with the check-letter suffix removed)
///
/// Construct through [`PlayerId::parse`] so every cache key and visited-set
/// entry shares the same normal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(String);

impl PlayerId {
    /// Normalize a raw player code
    ///
    /// Trims whitespace, strips the trailing letter suffix (`123456J` -> `123456`)
    /// and uppercases the rest. Fails if nothing remains.
    pub fn parse(raw: &str) -> Result<Self> {
        let stripped = raw
            .trim()
            .trim_end_matches(|c: char| c.is_ascii_alphabetic());
        if stripped.is_empty() {
            return Err(SeparationError::InvalidPlayerId(raw.to_string()));
        }
        Ok(Self(stripped.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolved identity of a player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    pub display_name: String,
    /// Declared title, if the service provides one (may be blank)
    pub title: Option<String>,
    /// False when the lookup failed or the player is unknown
    pub exists: bool,
}

impl PlayerProfile {
    pub fn new(display_name: impl Into<String>, title: Option<String>) -> Self {
        Self {
            display_name: display_name.into(),
            title,
            exists: true,
        }
    }

    /// Sentinel for a failed lookup, named after the code so paths stay readable
    pub fn missing(id: &PlayerId) -> Self {
        Self {
            display_name: id.to_string(),
            title: None,
            exists: false,
        }
    }

    /// Declared title with surrounding whitespace removed, `None` if absent or blank
    pub fn declared_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Colour the owning player had in a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Colour {
    White,
    Black,
    Unknown,
}

impl Colour {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "W" | "w" => Colour::White,
            "B" | "b" => Colour::Black,
            _ => Colour::Unknown,
        }
    }
}

/// Result from the owning player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    Win,
    Draw,
    Loss,
}

impl GameResult {
    /// Map an ECF score (1, 0.5, 0) to a result
    pub fn from_score(score: f64) -> Option<Self> {
        if score == 1.0 {
            Some(GameResult::Win)
        } else if score == 0.5 {
            Some(GameResult::Draw)
        } else if score == 0.0 {
            Some(GameResult::Loss)
        } else {
            None
        }
    }
}

/// One recorded game in a player's history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    /// Missing when the service omits or garbles the opponent code
    pub opponent_id: Option<PlayerId>,
    pub opponent_name: String,
    pub colour: Colour,
    pub result: GameResult,
    pub date: String,
}

impl GameRecord {
    pub fn is_win(&self) -> bool {
        self.result == GameResult::Win
    }
}

/// Time-control class under which games are rated separately
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameCategory {
    Standard,
    Rapid,
    Blitz,
}

impl GameCategory {
    /// Scan order used when deriving beaten opponents
    pub const ALL: [GameCategory; 3] = [
        GameCategory::Standard,
        GameCategory::Rapid,
        GameCategory::Blitz,
    ];

    /// Path segment the rating API expects
    pub fn as_path_segment(&self) -> &'static str {
        match self {
            GameCategory::Standard => "Standard",
            GameCategory::Rapid => "Rapid",
            GameCategory::Blitz => "Blitz",
        }
    }
}

impl fmt::Display for GameCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path_segment())
    }
}
