//! # Comments Service
//!
//! Cache-aware comment operations for feed posts. Reads go through the
//! shared TTL cache; mutations bypass it and invalidate every key tagged
//! with the affected post (and comment, for edits of existing comments).

use crate::caching::CacheKey;
use crate::client::executor::RequestSpec;
use crate::client::ClientInner;
use crate::core::error::ApiResult;
use crate::core::types::{Comment, CommentStats, LikeStatus, ListParams, NewComment, Page};
use crate::services::keys;
use serde_json::json;
use std::sync::Arc;

/// Comment operations, obtained from [`ApiClient::comments`](crate::ApiClient::comments)
#[derive(Clone)]
pub struct CommentsService {
    inner: Arc<ClientInner>,
}

impl CommentsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Comments on a post, newest page first by default
    ///
    /// Cached read: repeated unexpired calls with the same parameters
    /// perform no network request.
    pub async fn list(&self, post_id: &str, params: &ListParams) -> ApiResult<Page<Comment>> {
        let key = CacheKey::for_operation(keys::comments_list(post_id))
            .opt_param("page", params.page)
            .opt_param("limit", params.limit)
            .opt_param("sort", params.sort.as_deref())
            .build();

        if let Some(page) = self.inner.cached::<Page<Comment>>(&key) {
            return Ok(page);
        }

        let spec = RequestSpec::get(format!("posts/{}/comments", post_id))
            .with_opt_query("page", params.page)
            .with_opt_query("limit", params.limit)
            .with_opt_query("sort", params.sort.as_deref());

        let page = self
            .inner
            .executor
            .run_critical_page::<Comment>("Load comments", spec)
            .await?;

        self.inner.store(key, &page);
        Ok(page)
    }

    /// Replies to a comment
    pub async fn replies(&self, comment_id: &str, params: &ListParams) -> ApiResult<Page<Comment>> {
        let key = CacheKey::for_operation(keys::comment_replies(comment_id))
            .opt_param("page", params.page)
            .opt_param("limit", params.limit)
            .build();

        if let Some(page) = self.inner.cached::<Page<Comment>>(&key) {
            return Ok(page);
        }

        let spec = RequestSpec::get(format!("comments/{}/replies", comment_id))
            .with_opt_query("page", params.page)
            .with_opt_query("limit", params.limit);

        let page = self
            .inner
            .executor
            .run_critical_page::<Comment>("Load replies", spec)
            .await?;

        self.inner.store(key, &page);
        Ok(page)
    }

    /// Post a comment (or a reply, when `comment.parent_id` is set)
    ///
    /// Critical write: bypasses the cache, then evicts every cached page
    /// for the post so the next read refetches.
    pub async fn add(&self, post_id: &str, comment: &NewComment) -> ApiResult<Comment> {
        let spec = RequestSpec::post(
            format!("posts/{}/comments", post_id),
            serde_json::to_value(comment).unwrap_or_default(),
        );

        let created = self
            .inner
            .executor
            .run_critical::<Comment>("Add comment", spec)
            .await?;

        self.invalidate_post(post_id);
        if let Some(parent_id) = &comment.parent_id {
            self.invalidate_comment(parent_id);
        }
        Ok(created)
    }

    /// Edit a comment's content
    pub async fn update(&self, post_id: &str, comment_id: &str, content: &str) -> ApiResult<Comment> {
        let spec = RequestSpec::put(
            format!("comments/{}", comment_id),
            json!({ "content": content }),
        );

        let updated = self
            .inner
            .executor
            .run_critical::<Comment>("Update comment", spec)
            .await?;

        self.invalidate_post(post_id);
        self.invalidate_comment(comment_id);
        Ok(updated)
    }

    /// Delete a comment
    pub async fn delete(&self, post_id: &str, comment_id: &str) -> ApiResult<()> {
        let spec = RequestSpec::delete(format!("comments/{}", comment_id));

        self.inner
            .executor
            .run_critical_no_content("Delete comment", spec)
            .await?;

        self.invalidate_post(post_id);
        self.invalidate_comment(comment_id);
        Ok(())
    }

    /// Toggle the viewer's like on a comment
    pub async fn toggle_like(&self, post_id: &str, comment_id: &str) -> ApiResult<LikeStatus> {
        let spec = RequestSpec::post(format!("comments/{}/like", comment_id), json!({}));

        let status = self
            .inner
            .executor
            .run_critical::<LikeStatus>("Like comment", spec)
            .await?;

        self.invalidate_post(post_id);
        self.invalidate_comment(comment_id);
        Ok(status)
    }

    /// Aggregate comment statistics for a post
    ///
    /// Best-effort: a failure yields zeroed stats so secondary widgets
    /// cannot break the page.
    pub async fn stats(&self, post_id: &str) -> CommentStats {
        let key = CacheKey::for_operation(keys::comment_stats(post_id)).build();

        if let Some(stats) = self.inner.cached::<CommentStats>(&key) {
            return stats;
        }

        let spec = RequestSpec::get(format!("posts/{}/comments/stats", post_id));
        match self.inner.executor.execute::<CommentStats>(spec).await {
            Ok(stats) => {
                self.inner.store(key, &stats);
                stats
            }
            Err(err) => {
                self.inner
                    .executor
                    .best_effort_fallback("Comment stats", err, CommentStats::default())
            }
        }
    }

    fn invalidate_post(&self, post_id: &str) {
        let tag = keys::post_tag(post_id);
        self.inner.cache.invalidate(|key| key.contains(&tag));
    }

    fn invalidate_comment(&self, comment_id: &str) {
        let tag = keys::comment_tag(comment_id);
        self.inner.cache.invalidate(|key| key.contains(&tag));
    }
}
