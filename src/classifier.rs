//! Manifest classification: from repository descriptor to verdict.

use crate::hosting::HostingService;
use crate::ignore::IgnoreFilter;
use crate::limiter::InFlightLimiter;
use crate::registry::PackageRegistry;
use crate::types::{Classification, RegistryPresence, RepoDescriptor, SkipReason};
use std::sync::Arc;
use tracing::{debug, warn};

/// Classifies a single repository by manifest and registry presence.
///
/// The manifest fetch counts against the hosting-service limiter via the
/// coordinator, which admits the whole classification task through it; the
/// registry lookup is admitted separately here so a saturated registry
/// never blocks hosting-side work submitted elsewhere.
pub struct Classifier<H, R> {
    hosting: Arc<H>,
    registry: Arc<R>,
    registry_limiter: InFlightLimiter,
    ignore: Arc<IgnoreFilter>,
}

impl<H: HostingService, R: PackageRegistry> Classifier<H, R> {
    pub fn new(
        hosting: Arc<H>,
        registry: Arc<R>,
        registry_limiter: InFlightLimiter,
        ignore: Arc<IgnoreFilter>,
    ) -> Self {
        Self {
            hosting,
            registry,
            registry_limiter,
            ignore,
        }
    }

    /// Classify one repository. Never escalates: every failure mode folds
    /// into a verdict, and only an unambiguous registry 404 can produce a
    /// deletion candidate.
    pub async fn classify(&self, repo: &RepoDescriptor) -> Classification {
        let manifest = match self.hosting.fetch_manifest(repo).await {
            Ok(manifest) => manifest,
            Err(e) => {
                // Not a package (or the manifest is unreadable); not an error.
                debug!("No manifest for {}: {}", repo.full_name, e);
                return Classification::Skipped {
                    reason: SkipReason::NoManifest,
                };
            }
        };

        let Some(package) = manifest.name.filter(|n| !n.trim().is_empty()) else {
            return Classification::Skipped {
                reason: SkipReason::UnnamedManifest,
            };
        };

        if self.ignore.ignores_package(&package) {
            return Classification::Skipped {
                reason: SkipReason::IgnoredPackage(package),
            };
        }

        let presence = self
            .registry_limiter
            .run(self.registry.check_package(&package))
            .await;

        match presence {
            RegistryPresence::Present {
                latest_version, ..
            } => Classification::Registered {
                package,
                latest_version,
            },
            RegistryPresence::Absent { .. } => Classification::Unregistered { package },
            RegistryPresence::Error { error, .. } => {
                warn!(
                    "Registry lookup for '{}' ({}) failed: {}",
                    package, repo.full_name, error
                );
                Classification::Indeterminate { package, error }
            }
        }
    }
}
