//! orphansweep - deletes org repositories whose npm package is gone.
//!
//! CLI entry point.

use clap::Parser;
use orphansweep::{Config, GitHubClient, IgnoreFilter, NpmRegistry, Sweeper};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Registry lookups for the same package name are reused for this long.
const REGISTRY_CACHE_TTL_SECS: u64 = 3600;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Set up logging
    let filter = if config.verbose {
        EnvFilter::new("orphansweep=debug,info")
    } else {
        EnvFilter::new("orphansweep=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let organizations = config.org_list();
    if organizations.is_empty() {
        error!("No organizations specified.");
        return ExitCode::FAILURE;
    }

    if config.token.trim().is_empty() {
        error!("Empty token. Set GITHUB_TOKEN or pass --token.");
        return ExitCode::FAILURE;
    }

    let http_config = config.http_config();

    let hosting = match GitHubClient::new(
        &config.token,
        &config.api_url,
        &config.raw_url,
        &http_config,
        config.rate_limit,
    ) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create hosting client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let registry = match NpmRegistry::new(
        &config.registry_url,
        &http_config,
        config.rate_limit,
        REGISTRY_CACHE_TTL_SECS,
    ) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create registry client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let ignore = IgnoreFilter::new(config.ignore.iter().cloned(), config.current_repo.as_deref());

    let sweeper = Sweeper::new(hosting, registry, ignore, config.sweep_options());
    sweeper.run(&organizations).await;

    ExitCode::SUCCESS
}
