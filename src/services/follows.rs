//! # Follows Service
//!
//! Follow/connection operations. The follow status and the two listing
//! views are cached per target user; a toggle invalidates everything
//! tagged with that user.

use crate::caching::CacheKey;
use crate::client::executor::RequestSpec;
use crate::client::ClientInner;
use crate::core::error::ApiResult;
use crate::core::types::{FollowOptions, FollowStatus, ListParams, Page, UserSummary};
use crate::services::keys;
use serde::Deserialize;
use std::sync::Arc;

/// Payload shape of the mutual-connection count endpoint
#[derive(Debug, Clone, Copy, Default, Deserialize, serde::Serialize)]
struct MutualConnections {
    count: u64,
}

/// Follow operations, obtained from [`ApiClient::follows`](crate::ApiClient::follows)
#[derive(Clone)]
pub struct FollowsService {
    inner: Arc<ClientInner>,
}

impl FollowsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// The viewer's follow relationship with `user_id` (cached read)
    pub async fn status(&self, user_id: &str) -> ApiResult<FollowStatus> {
        let key = CacheKey::for_operation(keys::follow_status(user_id)).build();

        if let Some(status) = self.inner.cached::<FollowStatus>(&key) {
            return Ok(status);
        }

        let spec = RequestSpec::get(format!("users/{}/follow", user_id));
        let status = self
            .inner
            .executor
            .run_critical::<FollowStatus>("Load follow status", spec)
            .await?;

        self.inner.store(key, &status);
        Ok(status)
    }

    /// Follow or unfollow `user_id`
    ///
    /// Critical write: bypasses the cache, then evicts every cached read
    /// tagged with the user (status, follower/following pages, mutual
    /// count).
    pub async fn toggle(&self, user_id: &str, options: &FollowOptions) -> ApiResult<FollowStatus> {
        let spec = RequestSpec::post(
            format!("users/{}/follow/toggle", user_id),
            serde_json::to_value(options).unwrap_or_default(),
        );

        let status = self
            .inner
            .executor
            .run_critical::<FollowStatus>("Update follow", spec)
            .await?;

        let tag = keys::user_tag(user_id);
        self.inner.cache.invalidate(|key| key.contains(&tag));
        Ok(status)
    }

    /// Followers of `user_id` (cached read)
    pub async fn followers(&self, user_id: &str, params: &ListParams) -> ApiResult<Page<UserSummary>> {
        self.user_page(keys::followers(user_id), format!("users/{}/followers", user_id), "Load followers", params)
            .await
    }

    /// Users `user_id` follows (cached read)
    pub async fn following(&self, user_id: &str, params: &ListParams) -> ApiResult<Page<UserSummary>> {
        self.user_page(keys::following(user_id), format!("users/{}/following", user_id), "Load following", params)
            .await
    }

    /// Connections the viewer shares with `user_id`
    ///
    /// Best-effort: failures yield `0` so profile widgets degrade quietly.
    pub async fn mutual_count(&self, user_id: &str) -> u64 {
        let key = CacheKey::for_operation(keys::mutual_count(user_id)).build();

        if let Some(mutual) = self.inner.cached::<MutualConnections>(&key) {
            return mutual.count;
        }

        let spec = RequestSpec::get(format!("users/{}/connections/mutual", user_id));
        match self.inner.executor.execute::<MutualConnections>(spec).await {
            Ok(mutual) => {
                self.inner.store(key, &mutual);
                mutual.count
            }
            Err(err) => self
                .inner
                .executor
                .best_effort_fallback("Mutual connections", err, MutualConnections::default())
                .count,
        }
    }

    async fn user_page(
        &self,
        operation: String,
        path: String,
        label: &str,
        params: &ListParams,
    ) -> ApiResult<Page<UserSummary>> {
        let key = CacheKey::for_operation(operation)
            .opt_param("page", params.page)
            .opt_param("limit", params.limit)
            .build();

        if let Some(page) = self.inner.cached::<Page<UserSummary>>(&key) {
            return Ok(page);
        }

        let spec = RequestSpec::get(path)
            .with_opt_query("page", params.page)
            .with_opt_query("limit", params.limit);

        let page = self
            .inner
            .executor
            .run_critical_page::<UserSummary>(label, spec)
            .await?;

        self.inner.store(key, &page);
        Ok(page)
    }
}
