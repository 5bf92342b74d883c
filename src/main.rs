//! hiercache replay tool
//!
//! Builds a three-level cache from configuration, replays a YAML workload
//! against it and prints the resulting hierarchy.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hiercache::{Cache, CacheConfig, EvictionPolicy, Workload};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Replay cache workloads against a three-level LRU/MRU content cache
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(long, env = "HIERCACHE_CONFIG")]
    config: Option<PathBuf>,

    /// Per-level capacity (overrides the configuration file)
    #[arg(long, env = "HIERCACHE_CAPACITY")]
    capacity: Option<u64>,

    /// Default eviction policy (lru, mru)
    #[arg(long, env = "HIERCACHE_POLICY")]
    policy: Option<EvictionPolicy>,

    /// YAML workload to replay
    #[arg(long, env = "HIERCACHE_WORKLOAD")]
    workload: PathBuf,

    /// Print level statistics as JSON after replay
    #[arg(long)]
    stats_json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(&args);

    let mut config = match &args.config {
        Some(path) => CacheConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => CacheConfig::default(),
    };
    if let Some(capacity) = args.capacity {
        config.level_capacity = capacity;
    }
    if let Some(policy) = args.policy {
        config.default_policy = policy;
    }
    config.validate()?;

    info!("Starting hiercache replay");
    info!("  Level capacity: {}", config.level_capacity);
    info!("  Default policy: {}", config.default_policy);

    let workload = Workload::from_file(&args.workload)
        .with_context(|| format!("loading workload from {}", args.workload.display()))?;

    let mut cache = Cache::with_config(&config);
    let reports = workload.replay(&mut cache, config.default_policy);

    let mut failures = 0;
    for report in &reports {
        if report.success {
            info!("{}", report);
        } else {
            failures += 1;
            warn!("{}", report);
        }
    }
    info!(
        "Replayed {} operations ({} rejected or missed)",
        reports.len(),
        failures
    );

    println!("{}", cache);

    if args.stats_json {
        println!("{}", serde_json::to_string_pretty(&cache.stats())?);
    }

    Ok(())
}

// =============================================================================
// Logging
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
