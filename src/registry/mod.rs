//! Package registry checking module.
//!
//! Verifies if packages are still published on the registry and caches
//! results to avoid duplicate API calls within a run.

mod cache;
pub mod npm;

pub use npm::NpmRegistry;

use crate::types::RegistryPresence;
use async_trait::async_trait;

/// Existence lookup by exact package name.
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Check whether a package is published. Lookup failures are folded
    /// into [`RegistryPresence::Error`]; this call never escalates.
    async fn check_package(&self, name: &str) -> RegistryPresence;
}
