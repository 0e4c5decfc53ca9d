//! # Core Types Module
//!
//! Shared request/response types: the backend response envelope, pagination,
//! and the domain entities the service methods return. Every backend
//! response is an [`ApiEnvelope`] wrapping the payload type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard response envelope returned by every backend endpoint
///
/// The executor unwraps this: `success == true` yields `data`, anything else
/// is classified into an error from `message`/`errors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the operation succeeded
    pub success: bool,

    /// Payload, present on success
    pub data: Option<T>,

    /// Human-readable message, usually present on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Field-level validation errors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,

    /// Pagination metadata for list responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field
    pub field: String,

    /// Why the field was rejected
    pub message: String,
}

/// Pagination metadata as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page, 1-based
    pub page: u32,

    /// Page size
    pub limit: u32,

    /// Total matching items
    pub total: u64,

    /// Total pages at this page size
    pub total_pages: u32,
}

/// A page of items together with its pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,

    /// Pagination metadata when the backend reported it
    pub pagination: Option<Pagination>,
}

/// Common listing parameters accepted by paged read endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    /// Requested page, 1-based
    pub page: Option<u32>,

    /// Requested page size
    pub limit: Option<u32>,

    /// Sort order, e.g. "newest" or "top"
    pub sort: Option<String>,
}

impl ListParams {
    /// Set the requested page
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the requested page size
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the sort order
    pub fn with_sort<S: Into<String>>(mut self, sort: S) -> Self {
        self.sort = Some(sort.into());
        self
    }
}

/// A comment on a feed post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment identifier
    pub id: String,

    /// Post this comment belongs to
    pub post_id: String,

    /// Parent comment when this is a reply
    pub parent_id: Option<String>,

    /// Author summary
    pub author: CommentAuthor,

    /// Comment body
    pub content: String,

    /// Like count
    pub likes: u64,

    /// Whether the current viewer has liked this comment
    #[serde(default)]
    pub liked_by_viewer: bool,

    /// Number of replies
    #[serde(default)]
    pub reply_count: u64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last edit timestamp
    pub updated_at: Option<DateTime<Utc>>,
}

/// Minimal author info attached to a comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentAuthor {
    /// User identifier
    pub id: String,

    /// Display name
    pub display_name: String,

    /// Avatar image URL
    pub avatar_url: Option<String>,

    /// Marketplace role: candidate, freelancer, company, organization
    pub role: Option<String>,
}

/// Payload for creating a comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    /// Comment body
    pub content: String,

    /// Parent comment id when replying
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl NewComment {
    /// Create a top-level comment
    pub fn new<S: Into<String>>(content: S) -> Self {
        Self {
            content: content.into(),
            parent_id: None,
        }
    }

    /// Create a reply to an existing comment
    pub fn reply<S: Into<String>, P: Into<String>>(content: S, parent_id: P) -> Self {
        Self {
            content: content.into(),
            parent_id: Some(parent_id.into()),
        }
    }
}

/// Aggregate comment statistics for a post
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentStats {
    /// Total comments including replies
    pub total: u64,

    /// Distinct commenters
    pub participants: u64,
}

/// Result of toggling a like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeStatus {
    /// Whether the viewer now likes the item
    pub liked: bool,

    /// Updated like count
    pub likes: u64,
}

/// Follow relationship between the viewer and another user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowStatus {
    /// Viewer follows the target
    pub following: bool,

    /// Target follows the viewer
    pub followed_by: bool,

    /// Connections the two share
    #[serde(default)]
    pub mutual_connections: u64,
}

/// Options for a follow toggle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowOptions {
    /// Subscribe to notifications from the target
    #[serde(default)]
    pub notify: bool,
}

/// Minimal user card used in follower/following listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User identifier
    pub id: String,

    /// Display name
    pub display_name: String,

    /// Profile headline
    pub headline: Option<String>,

    /// Avatar image URL
    pub avatar_url: Option<String>,
}

/// Kind of entity a search hit refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchHitKind {
    Job,
    Tender,
    Post,
    User,
    Company,
}

impl std::fmt::Display for SearchHitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Job => "job",
            Self::Tender => "tender",
            Self::Post => "post",
            Self::User => "user",
            Self::Company => "company",
        };
        f.write_str(s)
    }
}

/// Full search request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query
    pub query: String,

    /// Restrict to one entity kind
    pub kind: Option<SearchHitKind>,

    /// Location filter
    pub location: Option<String>,

    /// Requested page, 1-based
    pub page: Option<u32>,

    /// Requested page size
    pub limit: Option<u32>,
}

impl SearchRequest {
    /// Create a request for a free-text query
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

/// One search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Entity identifier
    pub id: String,

    /// Entity kind
    pub kind: SearchHitKind,

    /// Display title (job title, user name, post excerpt)
    pub title: String,

    /// Optional snippet with match context
    pub snippet: Option<String>,
}

/// Search response payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Matching entities
    #[serde(default)]
    pub hits: Vec<SearchHit>,

    /// Total matches across all pages
    #[serde(default)]
    pub total: u64,
}

/// A typeahead suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSuggestion {
    /// Suggested query text
    pub text: String,

    /// Entity kind the suggestion points at, when known
    pub kind: Option<SearchHitKind>,
}

/// A trending hashtag with its usage count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingHashtag {
    /// Hashtag without the leading '#'
    pub tag: String,

    /// Posts using the tag in the trending window
    pub count: u64,
}
