//! Titled Separation - shortest beat-chain from a player to a titled player

pub mod api;
pub mod core;
pub mod lookup;
pub mod search;
