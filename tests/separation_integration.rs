//! Integration tests for the separation search
//!
//! These tests drive the full engine (identity cache, game cache, win
//! extraction, title classification and BFS) against in-memory beat-graphs:
//! - Shortest path is found even when longer paths exist
//! - The depth bound is respected
//! - Cycles and dead ends terminate
//! - Upstream failures degrade edges instead of aborting
//! - Repeated searches are served from the caches

use titled_separation::api::{InMemoryRatingService, RatingService};
use titled_separation::core::config::SearchConfig;
use titled_separation::core::error::{LookupFailure, SeparationError};
use titled_separation::core::types::{GameCategory, PlayerId};
use titled_separation::search::{Separation, SeparationEngine};

fn id(code: &str) -> PlayerId {
    PlayerId::parse(code).unwrap()
}

fn quiet_config() -> SearchConfig {
    SearchConfig {
        request_delay_ms: 0,
        ..SearchConfig::default()
    }
}

/// Chain of untitled players `prefix0 -> prefix1 -> ... -> prefix{len-1}`,
/// each beating the next in Standard play. Returns the service and the codes.
fn with_chain(
    mut service: InMemoryRatingService,
    prefix: u32,
    len: u32,
) -> (InMemoryRatingService, Vec<String>) {
    let codes: Vec<String> = (0..len).map(|i| format!("{}{:02}", prefix, i)).collect();
    for code in &codes {
        service = service.with_player(code, &format!("Player {}", code), None);
    }
    for pair in codes.windows(2) {
        service = service.with_win(&pair[0], &pair[1], GameCategory::Standard);
    }
    (service, codes)
}

// ============================================================================
// Minimality
// ============================================================================

/// Integration test: shortest path wins over a longer alternative
///
/// Graph: start -> A1 -> A2 -> GM (separation 3)
///        start -> B1 -> B2 -> B3 -> B4 -> GM (separation 5)
/// The longer branch is listed first in code order, so a depth-first walk
/// would find it first.
#[tokio::test]
async fn test_shortest_path_beats_longer_alternative() {
    let service = InMemoryRatingService::new()
        .with_player("100", "Start Player", None)
        .with_player("900", "Titled Player", Some("GM"));

    // Long branch: 100 -> 201 -> 202 -> 203 -> 204 -> 900
    let (service, long) = with_chain(service, 2, 5);
    // Short branch: 100 -> 301 -> 302 -> 900
    let (service, short) = with_chain(service, 3, 3);

    let service = service
        .with_win("100", &long[1], GameCategory::Standard)
        .with_win(&long[4], "900", GameCategory::Rapid)
        .with_win("100", &short[1], GameCategory::Blitz)
        .with_win(&short[2], "900", GameCategory::Rapid);

    let mut engine = SeparationEngine::new(service, quiet_config());
    let result = engine.separation(&id("100"), 5).await.unwrap();

    match result {
        Separation::Found { hops, path, titled } => {
            assert_eq!(hops, 3);
            assert_eq!(titled, id("900"));
            assert_eq!(
                path,
                vec!["Start Player", "Player 301", "Player 302", "Titled Player"]
            );
        }
        Separation::NotFound => panic!("expected separation 3"),
    }
}

/// Integration test: the k-hop answer is exact for a range of k
#[tokio::test]
async fn test_separation_is_exact_for_chain_lengths() {
    for k in 2..=5u32 {
        // Chain 100..1{k-1}: start plus k-1 untitled players, then the titled one
        let (service, codes) = with_chain(InMemoryRatingService::new(), 1, k);
        let last = codes.last().unwrap().clone();
        let service = service
            .with_player("999", "Titled", Some("IM"))
            .with_win(&last, "999", GameCategory::Standard);

        let mut engine = SeparationEngine::new(service, quiet_config());
        let result = engine.separation(&id(&codes[0]), 5).await.unwrap();
        assert_eq!(result.hops(), Some(k), "chain of {} hops", k);
    }
}

// ============================================================================
// Depth bound
// ============================================================================

/// Integration test: a titled player beyond the bound is not reported
#[tokio::test]
async fn test_depth_bound_respected() {
    // Separation 4: start -> p1 -> p2 -> p3 -> titled
    let (service, codes) = with_chain(InMemoryRatingService::new(), 1, 4);
    let service = service
        .with_player("999", "Titled", Some("FM"))
        .with_win(&codes[3], "999", GameCategory::Standard);

    let mut engine = SeparationEngine::new(service, quiet_config());
    let result = engine.separation(&id(&codes[0]), 3).await.unwrap();
    assert_eq!(result, Separation::NotFound);
}

/// Integration test: the bound is inclusive
#[tokio::test]
async fn test_depth_bound_inclusive() {
    let (service, codes) = with_chain(InMemoryRatingService::new(), 1, 4);
    let service = service
        .with_player("999", "Titled", Some("FM"))
        .with_win(&codes[3], "999", GameCategory::Standard);

    let mut engine = SeparationEngine::new(service, quiet_config());
    let result = engine.separation(&id(&codes[0]), 4).await.unwrap();
    assert_eq!(result.hops(), Some(4));
}

// ============================================================================
// Direct wins and termination
// ============================================================================

/// Integration test: beating a titled player directly is separation 0
#[tokio::test]
async fn test_direct_win_over_name_prefixed_title() {
    let service = InMemoryRatingService::new()
        .with_player("100", "Alice Example", None)
        .with_player("200", "WIM Carol Example", Some(""))
        .with_win("100", "200", GameCategory::Blitz);

    let mut engine = SeparationEngine::new(service, quiet_config());
    assert_eq!(engine.separation(&id("100"), 5).await.unwrap().hops(), Some(0));
}

/// Integration test: a cyclic graph with no titled player terminates
///
/// 100 -> 101 -> 102 -> 100, plus 101 -> 100
#[tokio::test]
async fn test_cycle_without_title_terminates() {
    let service = InMemoryRatingService::new()
        .with_player("100", "A", None)
        .with_player("101", "B", None)
        .with_player("102", "C", None)
        .with_win("100", "101", GameCategory::Standard)
        .with_win("101", "102", GameCategory::Standard)
        .with_win("102", "100", GameCategory::Standard)
        .with_win("101", "100", GameCategory::Rapid);

    let mut engine = SeparationEngine::new(service, quiet_config());
    let result = engine.separation(&id("100"), 50).await.unwrap();

    assert_eq!(result, Separation::NotFound);
    // Each player expanded exactly once: three categories each
    assert_eq!(engine.service().game_calls(), 9);
    assert_eq!(engine.stats().nodes_expanded, 3);
}

/// Integration test: a player with no wins at all
#[tokio::test]
async fn test_isolated_player_not_found() {
    let service = InMemoryRatingService::new().with_player("100", "Lonely", None);

    let mut engine = SeparationEngine::new(service, quiet_config());
    assert_eq!(
        engine.separation(&id("100"), 5).await.unwrap(),
        Separation::NotFound
    );
}

// ============================================================================
// Failure handling
// ============================================================================

/// Integration test: total upstream outage for game history is not fatal
#[tokio::test]
async fn test_game_outage_degrades_to_not_found() {
    let mut service = InMemoryRatingService::new()
        .with_player("100", "Alice", None)
        .with_player("200", "GM Bob", None)
        .with_win("100", "200", GameCategory::Standard);
    for category in GameCategory::ALL {
        service = service.with_failing_games("100", category, LookupFailure::Unavailable);
    }

    let mut engine = SeparationEngine::new(service, quiet_config());
    assert_eq!(
        engine.separation(&id("100"), 5).await.unwrap(),
        Separation::NotFound
    );
}

/// Integration test: only the start player's resolution is fatal
#[tokio::test]
async fn test_start_failure_is_distinguishable() {
    let service = InMemoryRatingService::new()
        .with_failing_player("100", LookupFailure::Malformed);

    let mut engine = SeparationEngine::new(service, quiet_config());
    let err = engine.separation(&id("100"), 5).await.unwrap_err();

    match err {
        SeparationError::StartUnresolved { id: failed, cause } => {
            assert_eq!(failed, id("100"));
            assert_eq!(cause, LookupFailure::Malformed);
        }
        other => panic!("unexpected error: {}", other),
    }
}

/// Integration test: a titled opponent whose lookup fails is never reported
#[tokio::test]
async fn test_failed_titled_opponent_is_skipped() {
    let service = InMemoryRatingService::new()
        .with_player("100", "Alice", None)
        .with_player("200", "GM Bob", None)
        .with_failing_player("200", LookupFailure::Unavailable)
        .with_win("100", "200", GameCategory::Standard);

    let mut engine = SeparationEngine::new(service, quiet_config());
    assert_eq!(
        engine.separation(&id("100"), 5).await.unwrap(),
        Separation::NotFound
    );
}

// ============================================================================
// Memoization
// ============================================================================

/// Integration test: re-invocation is answered from the cache
#[tokio::test]
async fn test_reinvocation_makes_no_network_calls() {
    let (service, codes) = with_chain(InMemoryRatingService::new(), 1, 3);
    let service = service
        .with_player("999", "Titled", Some("CM"))
        .with_win(&codes[2], "999", GameCategory::Standard);

    let mut engine = SeparationEngine::new(service, quiet_config());
    let first = engine.separation(&id(&codes[0]), 5).await.unwrap();
    let calls_after_first = engine.service().total_calls();

    let second = engine.separation(&id(&codes[0]), 5).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(engine.service().total_calls(), calls_after_first);
    assert_eq!(engine.stats().separation_hits, 1);
}

/// Integration test: a second start reuses identities and games from the first
#[tokio::test]
async fn test_shared_caches_across_starts() {
    let (service, codes) = with_chain(InMemoryRatingService::new(), 1, 3);
    let service = service
        .with_player("999", "Titled", Some("GM"))
        .with_win(&codes[2], "999", GameCategory::Standard);

    let mut engine = SeparationEngine::new(service, quiet_config());
    engine.separation(&id(&codes[0]), 5).await.unwrap();
    let calls_after_first = engine.service().total_calls();

    // codes[1] was already resolved and expanded during the first search
    let result = engine.separation(&id(&codes[1]), 5).await.unwrap();

    assert_eq!(result.hops(), Some(2));
    assert_eq!(engine.service().total_calls(), calls_after_first);
}

/// Integration test: suffixed and plain codes share one cache entry
#[tokio::test]
async fn test_suffixed_start_code_shares_cache() {
    let service = InMemoryRatingService::new()
        .with_player("120787", "Alice", None)
        .with_player("200", "Bob", Some("GM"))
        .with_win("120787", "200", GameCategory::Standard);

    let mut engine = SeparationEngine::new(service, quiet_config());
    engine.separation(&id("120787J"), 5).await.unwrap();
    let calls = engine.service().total_calls();
    engine.separation(&id("120787"), 5).await.unwrap();

    assert_eq!(engine.service().total_calls(), calls);
}

/// Integration test: the in-memory service behaves like the HTTP trait contract
#[tokio::test]
async fn test_service_reports_not_found_for_unknown_codes() {
    let service = InMemoryRatingService::new();
    let err = service.fetch_player(&id("555")).await.unwrap_err();
    assert!(matches!(err, SeparationError::NotFound(_)));
    assert!(service
        .fetch_games(&id("555"), GameCategory::Standard, 10)
        .await
        .unwrap()
        .is_empty());
}
