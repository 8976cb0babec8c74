pub mod config;
pub mod error;
pub mod types;

pub use config::SearchConfig;
pub use error::{LookupFailure, Result, SeparationError};
pub use types::{Colour, GameCategory, GameRecord, GameResult, PlayerId, PlayerProfile};
