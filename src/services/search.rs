//! # Search Service
//!
//! Full search, debounced typeahead suggestions, and the trending widget.
//!
//! Each service handle owns one debounce channel; create one handle per
//! search box so bursts in different boxes don't displace each other.
//! Clones of a handle share its channel.

use crate::caching::CacheKey;
use crate::client::executor::{RequestSpec, TimeoutClass};
use crate::client::ClientInner;
use crate::core::error::ApiResult;
use crate::core::types::{SearchRequest, SearchResults, SearchSuggestion, TrendingHashtag};
use crate::debounce::DebounceGate;
use crate::services::keys;
use std::sync::Arc;

/// Shown when the trending endpoint is unreachable; the widget renders
/// something sensible instead of disappearing.
fn fallback_trending() -> Vec<TrendingHashtag> {
    ["hiring", "opentowork", "freelance", "remotework", "tenders"]
        .into_iter()
        .map(|tag| TrendingHashtag {
            tag: tag.to_string(),
            count: 0,
        })
        .collect()
}

/// Search operations, obtained from [`ApiClient::search`](crate::ApiClient::search)
#[derive(Clone)]
pub struct SearchService {
    inner: Arc<ClientInner>,
    gate: Arc<DebounceGate>,
}

impl SearchService {
    pub(crate) fn new(inner: Arc<ClientInner>, gate: Arc<DebounceGate>) -> Self {
        Self { inner, gate }
    }

    /// Full search across jobs, tenders, posts, people and companies
    ///
    /// Cached read with the listing timeout.
    pub async fn search(&self, request: &SearchRequest) -> ApiResult<SearchResults> {
        let key = CacheKey::for_operation(keys::search_results())
            .param("q", &request.query)
            .opt_param("kind", request.kind)
            .opt_param("location", request.location.as_deref())
            .opt_param("page", request.page)
            .opt_param("limit", request.limit)
            .build();

        if let Some(results) = self.inner.cached::<SearchResults>(&key) {
            return Ok(results);
        }

        let spec = RequestSpec::get("search")
            .with_query("q", &request.query)
            .with_opt_query("kind", request.kind)
            .with_opt_query("location", request.location.as_deref())
            .with_opt_query("page", request.page)
            .with_opt_query("limit", request.limit);

        let results = self
            .inner
            .executor
            .run_critical::<SearchResults>("Search", spec)
            .await?;

        self.inner.store(key, &results);
        Ok(results)
    }

    /// Typeahead suggestions for `query`
    ///
    /// Debounced: bursts collapse to one fetch for the final query, and a
    /// superseded or too-short call resolves to an empty list. Best-effort:
    /// network failures also resolve to an empty list.
    pub async fn suggestions(&self, query: &str) -> Vec<SearchSuggestion> {
        let inner = self.inner.clone();
        self.gate
            .run(query, move |q| async move {
                let spec = RequestSpec::get("search/suggestions")
                    .with_query("q", q)
                    .with_timeout_class(TimeoutClass::Suggestion);
                inner
                    .executor
                    .run_best_effort("Search suggestions", spec, Vec::new())
                    .await
            })
            .await
            .unwrap_or_default()
    }

    /// Trending hashtags for the feed sidebar
    ///
    /// Cached; best-effort with a fixed fallback list on failure.
    pub async fn trending_hashtags(&self) -> Vec<TrendingHashtag> {
        let key = CacheKey::for_operation(keys::trending()).build();

        if let Some(trending) = self.inner.cached::<Vec<TrendingHashtag>>(&key) {
            return trending;
        }

        let spec = RequestSpec::get("hashtags/trending");
        match self
            .inner
            .executor
            .execute::<Vec<TrendingHashtag>>(spec)
            .await
        {
            Ok(trending) => {
                self.inner.store(key, &trending);
                trending
            }
            Err(err) => self
                .inner
                .executor
                .best_effort_fallback("Trending hashtags", err, fallback_trending()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_trending_is_nonempty_with_zero_counts() {
        let fallback = fallback_trending();
        assert!(!fallback.is_empty());
        assert!(fallback.iter().all(|t| t.count == 0));
    }
}
