//! Titled Separation - Entry Point
//!
//! Resolves a player code (from the command line or an interactive prompt),
//! runs the separation search against the ECF rating API and prints a summary.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use titled_separation::api::RatingClient;
use titled_separation::core::config::SearchConfig;
use titled_separation::core::error::{LookupFailure, Result, SeparationError};
use titled_separation::core::types::PlayerId;
use titled_separation::search::{Separation, SeparationEngine};

/// Titled Separation - how many wins away from a titled player?
#[derive(Parser, Debug)]
#[command(name = "titled-separation")]
#[command(about = "Find the shortest chain of wins from an ECF player to a titled player")]
struct Args {
    /// ECF player code (e.g. 120787 or 120787J); prompted for if omitted
    player_code: Option<String>,

    /// Largest separation to search for
    #[arg(long)]
    max_depth: Option<u32>,

    /// Games fetched per player per category
    #[arg(long)]
    limit: Option<u32>,

    /// Pause before searching, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Rating API endpoint
    #[arg(long)]
    base_url: Option<String>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log detail (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            println!("An error occurred: {}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("titled_separation={}", level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Merge config file, environment and flags
fn build_config(args: &Args) -> Result<SearchConfig> {
    let mut config = match &args.config {
        Some(path) => SearchConfig::load(path)?,
        None => SearchConfig::default(),
    }
    .with_env_overrides();

    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    if let Some(limit) = args.limit {
        config.game_limit = limit;
    }
    if let Some(delay_ms) = args.delay_ms {
        config.request_delay_ms = delay_ms;
    }
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }

    config.validate()?;
    Ok(config)
}

fn read_player_code(args: &Args) -> Result<String> {
    if let Some(code) = &args.player_code {
        return Ok(code.clone());
    }

    print!("Enter the ECF player code (e.g., 120787): ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input)
}

fn run(args: &Args) -> Result<ExitCode> {
    let config = build_config(args)?;
    let player = PlayerId::parse(&read_player_code(args)?)?;

    println!("{}", "=".repeat(60));
    println!("Titled Separation Calculator");
    println!("{}", "=".repeat(60));

    let rt = Runtime::new()?;
    let client = RatingClient::from_config(&config)?;
    let mut engine = SeparationEngine::new(client, config);

    let started = Instant::now();
    let outcome = rt.block_on(engine.run(&player));
    let elapsed = started.elapsed();

    let player_name = engine
        .cached_profile(&player)
        .map(|profile| profile.display_name.clone())
        .unwrap_or_else(|| player.to_string());

    println!();
    println!("{}", "=".repeat(60));
    println!("RESULTS:");

    let exit = match outcome {
        Ok(Separation::Found { hops: 0, path, .. }) => {
            println!("✓ {}'s Titled Separation is 0 (directly beat a titled player)", player_name);
            println!("  {}", path.join(" → "));
            ExitCode::SUCCESS
        }
        Ok(Separation::Found { hops, path, .. }) => {
            println!("✓ {}'s Titled Separation is {}", player_name, hops);
            println!("  {}", path.join(" → "));
            ExitCode::SUCCESS
        }
        Ok(Separation::NotFound) => {
            println!(
                "✗ No path found from {} to a titled player within {} steps",
                player_name,
                engine.config().max_depth
            );
            ExitCode::SUCCESS
        }
        Err(SeparationError::StartUnresolved { id, cause }) => {
            println!("✗ Could not start search from {}: {}", id, cause);
            match cause {
                LookupFailure::NotFound => ExitCode::from(1),
                LookupFailure::Unavailable | LookupFailure::Malformed => ExitCode::from(2),
            }
        }
        Err(e) => {
            println!("An error occurred: {}", e);
            ExitCode::from(2)
        }
    };

    let stats = engine.stats();
    println!();
    println!("Search completed in {:.2} seconds", elapsed.as_secs_f64());
    println!(
        "API calls: {} player lookups ({} cache hits), {} game lookups ({} cache hits)",
        stats.profiles.network_calls,
        stats.profiles.cache_hits,
        stats.games.network_calls,
        stats.games.cache_hits
    );
    println!("Players expanded: {}", stats.nodes_expanded);
    println!("{}", "=".repeat(60));

    Ok(exit)
}
