//! Memoized lookups against the rating service
//!
//! Both lookups absorb upstream errors into sentinel values (a missing
//! profile, an empty game list), so the search never handles transport
//! failures directly.

pub mod identity;
pub mod results;

pub use identity::IdentityResolver;
pub use results::ResultFetcher;

/// Traffic counters for one memoized lookup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupStats {
    /// Requests actually sent upstream
    pub network_calls: usize,
    /// Requests answered from the cache
    pub cache_hits: usize,
}
