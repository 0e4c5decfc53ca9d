//! # Marketplace Client Library
//!
//! Cache-aware REST client for the marketplace backend (job postings,
//! tenders, the social feed). The crate packages the request layer the
//! frontend's service modules share: canonical cache keys, an in-memory
//! TTL cache with tag-based invalidation, a debounced fetch gate for
//! typeahead, and a request executor that classifies failures and applies
//! a consistent critical / best-effort policy.
//!
//! ## Usage Example
//! ```no_run
//! use marketplace_client::{ApiClient, ClientConfig};
//! use marketplace_client::core::types::{ListParams, NewComment};
//!
//! # async fn example() -> marketplace_client::ApiResult<()> {
//! let client = ApiClient::new(ClientConfig::default())?;
//!
//! // Cached read: the second identical call is served from memory.
//! let comments = client.comments();
//! let page = comments.list("P1", &ListParams::default().with_page(1)).await?;
//!
//! // Critical write: invalidates every cached page for the post.
//! comments.add("P1", &NewComment::new("Great opportunity!")).await?;
//! # Ok(())
//! # }
//! ```

/// Core functionality: error taxonomy, configuration, and shared types
pub mod core;

/// Canonical cache keys, the TTL store, and invalidation rules
pub mod caching;

/// Debounced fetch gate for typeahead-style lookups
pub mod debounce;

/// The API client, request executor, and notification seam
pub mod client;

/// Cache-aware service methods (comments, follows, search)
pub mod services;

/// Main error type used throughout the client
pub use crate::core::error::{ApiError, ApiResult, ErrorKind};

/// Main configuration structure for the client
pub use crate::core::config::ClientConfig;

/// Primary entry point for using this library
pub use crate::client::ApiClient;

/// Notification seam for critical failures
pub use crate::client::notify::{LogNotifier, Notification, Notifier};

/// Debounce primitives, re-exported for standalone use
pub use crate::debounce::{DebounceGate, DebounceOutcome};
