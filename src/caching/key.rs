//! # Cache Key Builder
//!
//! Deterministic cache keys from an operation name and a parameter set.
//!
//! Two logically identical requests must map to the same key regardless of
//! the order parameters were supplied in, and regardless of parameters that
//! were left unset. The builder therefore:
//! - keeps parameters in a sorted map, serializing in canonical order
//! - drops `None` and empty-string values before serialization
//! - percent-encodes values so delimiter characters cannot alias keys
//! - hashes over-length keys to a fixed-size digest form

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Default maximum key length before hash truncation kicks in
pub const DEFAULT_MAX_KEY_LENGTH: usize = 250;

/// Builder for canonical cache keys
///
/// ```
/// use marketplace_client::caching::CacheKey;
///
/// let key = CacheKey::for_operation("comments:post:P1:list")
///     .param("page", 1)
///     .opt_param("sort", None::<&str>)
///     .build();
/// assert_eq!(key, "comments:post:P1:list?page=1");
/// ```
#[derive(Debug, Clone)]
pub struct CacheKey {
    operation: String,
    params: BTreeMap<String, String>,
    max_length: usize,
}

impl CacheKey {
    /// Start a key for the given operation identifier
    pub fn for_operation<S: Into<String>>(operation: S) -> Self {
        Self {
            operation: operation.into(),
            params: BTreeMap::new(),
            max_length: DEFAULT_MAX_KEY_LENGTH,
        }
    }

    /// Override the maximum length before hash truncation
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Add a parameter; an empty rendered value is dropped
    pub fn param<V: Display>(mut self, name: &str, value: V) -> Self {
        let rendered = value.to_string();
        if !rendered.is_empty() {
            self.params.insert(name.to_string(), rendered);
        }
        self
    }

    /// Add an optional parameter; `None` is dropped
    pub fn opt_param<V: Display>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.param(name, v),
            None => self,
        }
    }

    /// Serialize into the final key string
    pub fn build(self) -> String {
        let key = if self.params.is_empty() {
            self.operation
        } else {
            let query: Vec<String> = self
                .params
                .iter()
                .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value)))
                .collect();
            format!("{}?{}", self.operation, query.join("&"))
        };

        if key.len() <= self.max_length {
            key
        } else {
            // Hash long keys to a consistent length; the operation prefix is
            // preserved so substring invalidation still matches.
            let (operation, _) = key.split_once('?').unwrap_or((key.as_str(), ""));
            let mut hasher = Sha256::new();
            hasher.update(&key);
            let hash = hasher.finalize();
            format!("{}#sha256:{:x}", operation, hash)
        }
    }
}
