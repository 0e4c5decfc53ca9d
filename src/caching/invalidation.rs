//! # Cache Invalidation Rules
//!
//! After a mutation, every cached read that could now be stale must go.
//! Affected reads are found by matching stored keys against a rule; tags
//! (post id, comment id, user id) are embedded in the operation segment of
//! each key by [`services::keys`](crate::services::keys), so substring
//! matching reaches all related pages at once.
//!
//! Matching is best-effort and synchronous; there are no multi-key
//! transactional guarantees.

use serde::{Deserialize, Serialize};

/// How to select cache keys for removal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidationRule {
    /// Remove one exact key
    Key(String),

    /// Remove keys starting with a prefix
    Prefix(String),

    /// Remove keys containing a fragment (tag-based invalidation)
    Contains(String),

    /// Remove every key
    Any,
}

impl InvalidationRule {
    /// Whether `key` is selected by this rule
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::Key(exact) => key == exact,
            Self::Prefix(prefix) => key.starts_with(prefix.as_str()),
            Self::Contains(fragment) => key.contains(fragment.as_str()),
            Self::Any => true,
        }
    }

    /// Tag-based rule for a fragment such as `post:P1`
    pub fn tag<S: Into<String>>(fragment: S) -> Self {
        Self::Contains(fragment.into())
    }
}
