//! Lazy page-by-page enumeration of an organization's repositories.

use crate::hosting::HostingService;
use crate::limiter::InFlightLimiter;
use crate::types::{RepoDescriptor, Result};
use futures::stream::{self, Stream};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// Repositories requested per page. A page shorter than this terminates
/// enumeration.
pub const PAGE_SIZE: u32 = 100;

struct PageCursor<H> {
    hosting: Arc<H>,
    limiter: InFlightLimiter,
    org: String,
    page: u32,
    buffered: VecDeque<RepoDescriptor>,
    exhausted: bool,
}

/// Stream an organization's repositories, fetching pages on demand through
/// the hosting-service limiter.
///
/// The stream is finite and not restartable: a fresh call re-pages from
/// page 1. Page N+1 is never requested before page N's response has been
/// consumed. A failed page request ends the stream with that error.
pub fn org_repos<H: HostingService>(
    hosting: Arc<H>,
    limiter: InFlightLimiter,
    org: &str,
) -> impl Stream<Item = Result<RepoDescriptor>> {
    let cursor = PageCursor {
        hosting,
        limiter,
        org: org.to_string(),
        page: 1,
        buffered: VecDeque::new(),
        exhausted: false,
    };

    stream::try_unfold(cursor, |mut cursor| async move {
        loop {
            if let Some(repo) = cursor.buffered.pop_front() {
                return Ok(Some((repo, cursor)));
            }
            if cursor.exhausted {
                return Ok(None);
            }

            let page = cursor.page;
            let repos = cursor
                .limiter
                .run(cursor.hosting.list_repos_page(&cursor.org, page, PAGE_SIZE))
                .await?;

            cursor.exhausted = (repos.len() as u32) < PAGE_SIZE;
            cursor.page += 1;
            if cursor.exhausted {
                debug!(
                    "Enumeration of {} finished at page {} ({} repos on final page)",
                    cursor.org,
                    page,
                    repos.len()
                );
            }
            cursor.buffered.extend(repos);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PackageManifest, SweepError};
    use async_trait::async_trait;
    use futures::TryStreamExt;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Serves `total` repositories across as many pages as needed, counting
    /// page requests.
    struct PagedHosting {
        total: u32,
        requests: AtomicU32,
    }

    impl PagedHosting {
        fn new(total: u32) -> Self {
            Self {
                total,
                requests: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl HostingService for PagedHosting {
        async fn list_repos_page(
            &self,
            org: &str,
            page: u32,
            per_page: u32,
        ) -> Result<Vec<RepoDescriptor>> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            let start = (page - 1) * per_page;
            let end = self.total.min(start + per_page);
            Ok((start..end)
                .map(|i| RepoDescriptor {
                    full_name: format!("{}/repo-{}", org, i),
                    default_branch: "main".to_string(),
                })
                .collect())
        }

        async fn fetch_manifest(&self, _repo: &RepoDescriptor) -> Result<PackageManifest> {
            unreachable!("enumeration never fetches manifests")
        }

        async fn delete_repo(&self, _full_name: &str) -> Result<()> {
            unreachable!("enumeration never deletes")
        }
    }

    struct FailingHosting;

    #[async_trait]
    impl HostingService for FailingHosting {
        async fn list_repos_page(
            &self,
            _org: &str,
            _page: u32,
            _per_page: u32,
        ) -> Result<Vec<RepoDescriptor>> {
            Err(SweepError::ConfigError("listing unavailable".to_string()))
        }

        async fn fetch_manifest(&self, _repo: &RepoDescriptor) -> Result<PackageManifest> {
            unreachable!()
        }

        async fn delete_repo(&self, _full_name: &str) -> Result<()> {
            unreachable!()
        }
    }

    async fn enumerate(total: u32) -> (Vec<RepoDescriptor>, u32) {
        let hosting = Arc::new(PagedHosting::new(total));
        let limiter = InFlightLimiter::new(10);
        let repos: Vec<_> = org_repos(Arc::clone(&hosting), limiter, "acme")
            .try_collect()
            .await
            .unwrap();
        let requests = hosting.requests.load(Ordering::SeqCst);
        (repos, requests)
    }

    #[tokio::test]
    async fn test_short_final_page_terminates() {
        let (repos, requests) = enumerate(250).await;
        assert_eq!(repos.len(), 250);
        assert_eq!(requests, 3);
    }

    #[tokio::test]
    async fn test_full_final_page_costs_one_extra_request() {
        let (repos, requests) = enumerate(200).await;
        assert_eq!(repos.len(), 200);
        // Page 3 is empty and only exists to observe termination.
        assert_eq!(requests, 3);
    }

    #[tokio::test]
    async fn test_empty_org_is_one_request() {
        let (repos, requests) = enumerate(0).await;
        assert!(repos.is_empty());
        assert_eq!(requests, 1);
    }

    #[tokio::test]
    async fn test_single_short_page() {
        let (repos, requests) = enumerate(42).await;
        assert_eq!(repos.len(), 42);
        assert_eq!(requests, 1);
    }

    #[tokio::test]
    async fn test_page_failure_surfaces() {
        let limiter = InFlightLimiter::new(10);
        let result: Result<Vec<_>> = org_repos(Arc::new(FailingHosting), limiter, "acme")
            .try_collect()
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_repos_yield_in_page_order() {
        let (repos, _) = enumerate(150).await;
        let names: Vec<_> = repos.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names[0], "acme/repo-0");
        assert_eq!(names[99], "acme/repo-99");
        assert_eq!(names[100], "acme/repo-100");
        assert_eq!(names[149], "acme/repo-149");
    }
}
