//! npm registry checker for verifying package existence.

use crate::registry::cache::RegistryCache;
use crate::registry::PackageRegistry;
use crate::types::{HttpConfig, RegistryPresence, Result};
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// npm registry API response for package info.
#[derive(Debug, Deserialize)]
struct NpmPackageInfo {
    #[allow(dead_code)]
    name: String,
    #[serde(rename = "dist-tags")]
    dist_tags: Option<DistTags>,
}

#[derive(Debug, Deserialize)]
struct DistTags {
    latest: Option<String>,
}

/// Checker for verifying packages against the npm registry.
///
/// Lookups are unauthenticated; 200 means published, 404 means gone,
/// anything else is an indeterminate error the caller must not act on.
pub struct NpmRegistry {
    client: Client,
    cache: RegistryCache,
    rate_limiter: Arc<
        RateLimiter<
            governor::state::NotKeyed,
            governor::state::InMemoryState,
            governor::clock::DefaultClock,
        >,
    >,
    registry_url: String,
}

impl NpmRegistry {
    /// Create a new registry checker. `rate_limit` is requests per second.
    pub fn new(
        registry_url: &str,
        config: &HttpConfig,
        rate_limit: u32,
        cache_ttl_secs: u64,
    ) -> Result<Self> {
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
            cache: RegistryCache::new(cache_ttl_secs),
            rate_limiter,
            registry_url: registry_url.trim_end_matches('/').to_string(),
        })
    }

    /// Perform the actual registry lookup.
    async fn do_check(&self, package_name: &str) -> RegistryPresence {
        let url = format!("{}/{}", self.registry_url, urlencoding::encode(package_name));
        trace!("Checking registry: {}", url);

        match self.client.get(&url).send().await {
            Ok(response) => {
                if response.status().is_success() {
                    // Package exists
                    match response.json::<NpmPackageInfo>().await {
                        Ok(info) => {
                            debug!("Package published: {}", package_name);
                            RegistryPresence::Present {
                                name: package_name.to_string(),
                                latest_version: info.dist_tags.and_then(|dt| dt.latest),
                            }
                        }
                        Err(e) => {
                            warn!("Failed to parse registry response for {}: {}", package_name, e);
                            RegistryPresence::Present {
                                name: package_name.to_string(),
                                latest_version: None,
                            }
                        }
                    }
                } else if response.status().as_u16() == 404 {
                    debug!("Package NOT FOUND: {}", package_name);
                    RegistryPresence::Absent {
                        name: package_name.to_string(),
                    }
                } else {
                    RegistryPresence::Error {
                        name: package_name.to_string(),
                        error: format!("HTTP {}", response.status()),
                    }
                }
            }
            Err(e) => RegistryPresence::Error {
                name: package_name.to_string(),
                error: e.to_string(),
            },
        }
    }
}

#[async_trait]
impl PackageRegistry for NpmRegistry {
    async fn check_package(&self, name: &str) -> RegistryPresence {
        // Check cache first
        if let Some(cached) = self.cache.get(name) {
            trace!("Cache hit for {}", name);
            return cached;
        }

        // Rate limit
        self.rate_limiter.until_ready().await;

        let result = self.do_check(name).await;

        // Cache the result
        self.cache.set(name, result.clone());

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_normalized() {
        let registry = NpmRegistry::new(
            "https://registry.npmjs.org/",
            &HttpConfig::default(),
            10,
            60,
        )
        .unwrap();
        assert_eq!(registry.registry_url, "https://registry.npmjs.org");
    }

    #[test]
    fn test_scoped_name_is_encoded() {
        let encoded = urlencoding::encode("@acme/widget");
        assert_eq!(encoded, "%40acme%2Fwidget");
    }
}
