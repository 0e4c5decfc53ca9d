//! # Client Module
//!
//! [`ApiClient`] is the application-facing entry point. It owns the pieces
//! every service method composes:
//! - the [`RequestExecutor`] wrapping the shared HTTP client
//! - one [`TtlCache`] shared by all service handles
//! - the [`Notifier`] seam for critical-failure notifications
//!
//! Construct one per application instance and hand out clones; the cache
//! is explicit state owned by the client, not a module-level global, so
//! tests can build isolated instances freely.

pub mod executor;
pub mod notify;

use crate::caching::{CacheStats, TtlCache};
use crate::client::executor::RequestExecutor;
use crate::client::notify::{LogNotifier, Notifier};
use crate::core::config::ClientConfig;
use crate::core::error::ApiResult;
use crate::debounce::DebounceGate;
use crate::services::{CommentsService, FollowsService, SearchService};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Shared state behind every service handle
pub(crate) struct ClientInner {
    pub(crate) config: ClientConfig,
    pub(crate) executor: RequestExecutor,
    pub(crate) cache: Arc<TtlCache>,
    sweeper: Option<JoinHandle<()>>,
}

impl ClientInner {
    /// Fresh cached payload for `key`, decoded into `T`
    ///
    /// An entry that no longer decodes (a payload shape change) is dropped
    /// and treated as a miss.
    pub(crate) fn cached<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let payload = self.cache.get(key)?;
        match serde_json::from_value((*payload).clone()) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, error = %err, "dropping undecodable cache entry");
                self.cache.invalidate(|k| k == key);
                None
            }
        }
    }

    /// Store `value` under `key` with the default TTL
    pub(crate) fn store<T: serde::Serialize>(&self, key: String, value: &T) {
        match serde_json::to_value(value) {
            Ok(payload) => self.cache.set(key, payload),
            Err(err) => tracing::warn!(key, error = %err, "failed to serialize cache payload"),
        }
    }
}

impl Drop for ClientInner {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.take() {
            handle.abort();
        }
    }
}

/// Cache-aware client for the marketplace backend
///
/// Cloning is cheap and shares the cache, executor and notifier.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    /// Create a client with the default (logging) notifier
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Self::with_notifier(config, Arc::new(LogNotifier))
    }

    /// Create a client delivering critical-failure notifications to
    /// `notifier`
    pub fn with_notifier(config: ClientConfig, notifier: Arc<dyn Notifier>) -> ApiResult<Self> {
        config.validate()?;

        let executor = RequestExecutor::new(&config, notifier)?;
        let cache = Arc::new(TtlCache::new(config.cache));

        // The sweeper is an optimization; reads evict lazily either way.
        // Outside a runtime (sync unit tests) the client works without it.
        let sweeper = tokio::runtime::Handle::try_current().ok().map(|handle| {
            let cache = cache.clone();
            let interval = config.cache.sweep_interval;
            handle.spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    cache.purge_expired();
                }
            })
        });

        info!(base_url = %config.base_url, "marketplace client ready");

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                executor,
                cache,
                sweeper,
            }),
        })
    }

    /// Comment operations for feed posts
    pub fn comments(&self) -> CommentsService {
        CommentsService::new(self.inner.clone())
    }

    /// Follow/connection operations
    pub fn follows(&self) -> FollowsService {
        FollowsService::new(self.inner.clone())
    }

    /// Search and typeahead operations
    ///
    /// Each handle owns its own debounce channel: one handle per search box.
    pub fn search(&self) -> SearchService {
        SearchService::new(
            self.inner.clone(),
            Arc::new(DebounceGate::new(self.inner.config.debounce)),
        )
    }

    /// Snapshot of the shared cache's counters
    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.stats()
    }

    /// Drop every cached entry
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_construction_validates_config() {
        let bad = ClientConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(ApiClient::new(bad).is_err());

        let good = ClientConfig::default();
        assert!(ApiClient::new(good).is_ok());
    }

    #[test]
    fn test_client_works_without_a_runtime() {
        // No sweeper gets spawned, construction still succeeds.
        let client = ApiClient::new(ClientConfig::default()).unwrap();
        assert_eq!(client.cache_stats().entries, 0);
    }
}
