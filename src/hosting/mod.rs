//! Hosting-service access.
//!
//! Lists an organization's repositories page by page, retrieves raw
//! manifest files from the default branch, and deletes repositories.

mod enumerator;
mod github;

pub use enumerator::{org_repos, PAGE_SIZE};
pub use github::GitHubClient;

use crate::types::{PackageManifest, RepoDescriptor, Result};
use async_trait::async_trait;

/// Operations the pipeline needs from the repository-hosting service.
#[async_trait]
pub trait HostingService: Send + Sync {
    /// Fetch one page of an organization's repositories. Pages are numbered
    /// from 1; a page shorter than `per_page` is the last one.
    async fn list_repos_page(
        &self,
        org: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepoDescriptor>>;

    /// Fetch and parse the package manifest on the repository's default
    /// branch. Any failure, including not-found, is an error here; the
    /// classifier decides what that means.
    async fn fetch_manifest(&self, repo: &RepoDescriptor) -> Result<PackageManifest>;

    /// Delete a repository.
    async fn delete_repo(&self, full_name: &str) -> Result<()>;
}
