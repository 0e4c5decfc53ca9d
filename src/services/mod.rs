//! # Services Module
//!
//! The cache-aware methods applications actually call, one service per
//! backend domain. Every service composes the same pieces: build a
//! canonical key, check the shared TTL cache, execute through the request
//! executor on a miss, store the result, and invalidate by tag after
//! mutations.

pub mod comments;
pub mod follows;
pub mod keys;
pub mod search;

pub use comments::CommentsService;
pub use follows::FollowsService;
pub use search::SearchService;
