//! GitHub API client with per-second request pacing.

use crate::hosting::HostingService;
use crate::types::{HttpConfig, PackageManifest, RepoDescriptor, Result};
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::Client;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

/// Client for the repository-hosting API and its raw-file endpoint.
pub struct GitHubClient {
    client: Client,
    token: String,
    api_base: Url,
    raw_base: Url,
    rate_limiter: Arc<
        RateLimiter<
            governor::state::NotKeyed,
            governor::state::InMemoryState,
            governor::clock::DefaultClock,
        >,
    >,
}

impl GitHubClient {
    /// Create a new client. `rate_limit` is requests per second across all
    /// hosting-service endpoints.
    pub fn new(token: &str, api_url: &str, raw_url: &str, config: &HttpConfig, rate_limit: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .http1_only() // Force HTTP/1.1 to avoid HTTP/2 stream limit issues
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;

        let quota =
            Quota::per_second(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::new(10).unwrap()));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            client,
            token: token.to_string(),
            api_base: Url::parse(api_url)?,
            raw_base: Url::parse(raw_url)?,
            rate_limiter,
        })
    }

    fn endpoint(&self, base: &Url, path: &str) -> Result<Url> {
        Ok(base.join(path)?)
    }
}

#[async_trait]
impl HostingService for GitHubClient {
    async fn list_repos_page(
        &self,
        org: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepoDescriptor>> {
        self.rate_limiter.until_ready().await;

        let mut url = self.endpoint(
            &self.api_base,
            &format!("orgs/{}/repos", urlencoding::encode(org)),
        )?;
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());
        trace!("Listing repos: {}", url);

        let repos = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<RepoDescriptor>>()
            .await?;

        debug!("Fetched page {} for {} ({} repos)", page, org, repos.len());
        Ok(repos)
    }

    async fn fetch_manifest(&self, repo: &RepoDescriptor) -> Result<PackageManifest> {
        self.rate_limiter.until_ready().await;

        let url = self.endpoint(
            &self.raw_base,
            &format!("{}/{}/package.json", repo.full_name, repo.default_branch),
        )?;
        trace!("Fetching manifest: {}", url);

        let manifest = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json::<PackageManifest>()
            .await?;

        Ok(manifest)
    }

    async fn delete_repo(&self, full_name: &str) -> Result<()> {
        self.rate_limiter.until_ready().await;

        let url = self.endpoint(&self.api_base, &format!("repos/{}", full_name))?;
        debug!("Deleting repo: {}", full_name);

        self.client
            .delete(url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_base_url() {
        let result = GitHubClient::new(
            "token",
            "not a url",
            "https://raw.githubusercontent.com",
            &HttpConfig::default(),
            10,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_endpoint_join() {
        let client = GitHubClient::new(
            "token",
            "https://api.github.com",
            "https://raw.githubusercontent.com",
            &HttpConfig::default(),
            10,
        )
        .unwrap();

        let url = client
            .endpoint(&client.raw_base, "acme/widget/main/package.json")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://raw.githubusercontent.com/acme/widget/main/package.json"
        );
    }
}
