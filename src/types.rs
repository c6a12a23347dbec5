//! Core types and errors for the repository sweeper.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during a sweep.
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, SweepError>;

/// A repository as listed by the hosting service.
///
/// Immutable once produced by the enumerator; downstream stages only read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoDescriptor {
    /// Full name in `org/name` form.
    pub full_name: String,
    /// Branch the manifest is fetched from.
    #[serde(default = "default_branch")]
    pub default_branch: String,
}

fn default_branch() -> String {
    "main".to_string()
}

impl RepoDescriptor {
    /// The bare repository name (the part after the slash).
    pub fn name(&self) -> &str {
        self.full_name
            .rsplit('/')
            .next()
            .unwrap_or(&self.full_name)
    }
}

/// Parsed package manifest. Only the declared name matters for
/// classification; everything else in the file is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Result of checking a package against the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RegistryPresence {
    /// Package is published.
    Present {
        name: String,
        latest_version: Option<String>,
    },
    /// Package does not exist (404).
    Absent { name: String },
    /// Lookup failed with something other than not-found.
    Error { name: String, error: String },
}

/// Why a repository was skipped without a registry verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Repository name is on the ignore list.
    IgnoredRepo,
    /// Repository is the one currently running the sweep.
    SelfRepo,
    /// Manifest missing or unreadable.
    NoManifest,
    /// Manifest exists but declares no package name.
    UnnamedManifest,
    /// Declared package name is on the ignore list.
    IgnoredPackage(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::IgnoredRepo => write!(f, "repository is on the ignore list"),
            SkipReason::SelfRepo => write!(f, "repository is running this sweep"),
            SkipReason::NoManifest => write!(f, "no readable package manifest"),
            SkipReason::UnnamedManifest => write!(f, "manifest declares no package name"),
            SkipReason::IgnoredPackage(name) => {
                write!(f, "package '{}' is on the ignore list", name)
            }
        }
    }
}

/// Classification verdict for a single repository.
///
/// Only `Unregistered` turns into a deletion candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Classification {
    /// Package is still published; repository is kept.
    Registered {
        package: String,
        latest_version: Option<String>,
    },
    /// Package is gone from the registry; repository becomes a candidate.
    Unregistered { package: String },
    /// Registry answered with an ambiguous error; never delete on that.
    Indeterminate { package: String, error: String },
    /// Repository never reached a registry verdict.
    Skipped { reason: SkipReason },
}

/// A classified repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoOutcome {
    pub repo: RepoDescriptor,
    pub classification: Classification,
}

/// Result of one deletion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionOutcome {
    /// Full name of the deleted (or not) repository.
    pub full_name: String,
    /// Failure cause, if the deletion failed.
    pub error: Option<String>,
}

impl DeletionOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Complete result of one sweep run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    /// Organizations that were processed, in input order.
    pub organizations: Vec<String>,
    /// Repositories seen by the enumerator.
    pub processed: usize,
    /// Repositories skipped without a registry verdict.
    pub skipped: usize,
    /// Repositories whose package is still published.
    pub registered: usize,
    /// Repositories whose package is gone.
    pub unregistered: usize,
    /// Repositories with an ambiguous registry answer.
    pub indeterminate: usize,
    /// Deletion candidates, in classification order.
    pub candidates: Vec<String>,
    /// Per-candidate deletion results (empty in dry-run mode).
    pub deletions: Vec<DeletionOutcome>,
    /// Enumeration failures, one entry per affected organization.
    pub errors: Vec<String>,
    /// Sweep duration in seconds.
    pub duration_secs: f64,
}

/// Configuration for HTTP requests.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "orphansweep/0.1".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_name_component() {
        let repo = RepoDescriptor {
            full_name: "acme/widget".to_string(),
            default_branch: "main".to_string(),
        };
        assert_eq!(repo.name(), "widget");
    }

    #[test]
    fn test_manifest_without_name_deserializes() {
        let manifest: PackageManifest =
            serde_json::from_str(r#"{"version": "1.0.0", "private": true}"#).unwrap();
        assert!(manifest.name.is_none());
    }

    #[test]
    fn test_descriptor_default_branch_fallback() {
        let repo: RepoDescriptor = serde_json::from_str(r#"{"full_name": "acme/a"}"#).unwrap();
        assert_eq!(repo.default_branch, "main");
    }
}
