//! Upstream rating service access

pub mod client;
pub mod memory;
pub mod schema;

pub use client::{RatingClient, RatingService};
pub use memory::InMemoryRatingService;
