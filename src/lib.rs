//! orphansweep - janitor for organization repositories whose npm package
//! is no longer published.
//!
//! This library implements a two-phase pipeline:
//! - Enumerate every repository of the configured organizations, fetch each
//!   one's package manifest, and classify it by registry presence.
//! - Delete the repositories whose declared package is gone from the
//!   registry, as one batch, once the full candidate list is known.
//!
//! Both external services are accessed under bounded concurrency through
//! independent limiters, so hosting-service throttling and registry
//! throttling cannot starve each other.
//!
//! # Example
//!
//! ```no_run
//! use orphansweep::{GitHubClient, IgnoreFilter, NpmRegistry, Sweeper, SweepOptions};
//! use orphansweep::types::HttpConfig;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let http = HttpConfig::default();
//!     let hosting = Arc::new(
//!         GitHubClient::new(
//!             "token",
//!             "https://api.github.com",
//!             "https://raw.githubusercontent.com",
//!             &http,
//!             10,
//!         )
//!         .unwrap(),
//!     );
//!     let registry =
//!         Arc::new(NpmRegistry::new("https://registry.npmjs.org", &http, 10, 3600).unwrap());
//!     let ignore = IgnoreFilter::new(std::iter::empty(), Some("acme/sweeper"));
//!
//!     let sweeper = Sweeper::new(hosting, registry, ignore, SweepOptions::default());
//!     let report = sweeper.run(&["acme".to_string()]).await;
//!     println!("{} repositories deleted", report.deletions.len());
//! }
//! ```

pub mod classifier;
pub mod config;
pub mod console;
pub mod hosting;
pub mod ignore;
pub mod limiter;
pub mod registry;
pub mod sweeper;
pub mod types;

pub use config::Config;
pub use hosting::{GitHubClient, HostingService};
pub use ignore::IgnoreFilter;
pub use limiter::InFlightLimiter;
pub use registry::{NpmRegistry, PackageRegistry};
pub use sweeper::{SweepOptions, Sweeper};
pub use types::{
    Classification, DeletionOutcome, RegistryPresence, RepoDescriptor, RepoOutcome, Result,
    SkipReason, SweepError, SweepReport,
};
