//! Configuration handling for the sweeper.

use crate::sweeper::SweepOptions;
use crate::types::HttpConfig;
use clap::Parser;

/// Deletes organization repositories whose npm package is no longer published.
#[derive(Parser, Debug, Clone)]
#[command(name = "orphansweep")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Organizations to sweep (whitespace or comma separated tokens)
    #[arg(required = true)]
    pub organizations: Vec<String>,

    /// Bearer token for the hosting service
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Repository or package names exempt from deletion (repeatable)
    #[arg(short = 'i', long = "ignore", value_name = "NAME")]
    pub ignore: Vec<String>,

    /// Repository running this sweep, in org/name form
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub current_repo: Option<String>,

    /// Maximum concurrently in-flight requests per external service
    #[arg(long, default_value = "10")]
    pub max_in_flight: usize,

    /// Rate limit per service (requests per second)
    #[arg(long, default_value = "10")]
    pub rate_limit: u32,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Report candidates without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode: only show output when something would be deleted
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Hosting service API base URL
    #[arg(long, default_value = "https://api.github.com")]
    pub api_url: String,

    /// Hosting service raw-file base URL
    #[arg(long, default_value = "https://raw.githubusercontent.com")]
    pub raw_url: String,

    /// Package registry base URL
    #[arg(long, default_value = "https://registry.npmjs.org")]
    pub registry_url: String,

    /// Custom User-Agent string
    #[arg(long)]
    pub user_agent: Option<String>,
}

impl Config {
    /// Organization tokens, split on whitespace and commas, trimmed,
    /// empties dropped.
    pub fn org_list(&self) -> Vec<String> {
        self.organizations
            .iter()
            .flat_map(|arg| arg.split(|c: char| c.is_whitespace() || c == ','))
            .map(|org| org.trim().to_string())
            .filter(|org| !org.is_empty())
            .collect()
    }

    /// Get HTTP configuration from the CLI flags.
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            timeout_secs: self.timeout,
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| "orphansweep/0.1".to_string()),
        }
    }

    /// Get sweep tuning options from the CLI flags.
    pub fn sweep_options(&self) -> SweepOptions {
        SweepOptions {
            max_in_flight: self.max_in_flight,
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_orgs(orgs: &[&str]) -> Config {
        Config {
            organizations: orgs.iter().map(|s| s.to_string()).collect(),
            token: "t".to_string(),
            ignore: Vec::new(),
            current_repo: None,
            max_in_flight: 10,
            rate_limit: 10,
            timeout: 30,
            dry_run: false,
            verbose: false,
            quiet: false,
            api_url: "https://api.github.com".to_string(),
            raw_url: "https://raw.githubusercontent.com".to_string(),
            registry_url: "https://registry.npmjs.org".to_string(),
            user_agent: None,
        }
    }

    #[test]
    fn test_org_list_splits_on_whitespace_and_commas() {
        let config = config_with_orgs(&["acme, globex", "initech\nhooli"]);
        assert_eq!(config.org_list(), vec!["acme", "globex", "initech", "hooli"]);
    }

    #[test]
    fn test_org_list_drops_empty_tokens() {
        let config = config_with_orgs(&["acme,,  ,globex", ""]);
        assert_eq!(config.org_list(), vec!["acme", "globex"]);
    }

    #[test]
    fn test_org_list_preserves_input_order() {
        let config = config_with_orgs(&["zeta alpha"]);
        assert_eq!(config.org_list(), vec!["zeta", "alpha"]);
    }
}
