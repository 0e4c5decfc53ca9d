//! # Debounced Fetch Gate
//!
//! Coalesces a rapid sequence of typeahead calls into at most one fetch per
//! quiet period. The gate is an explicit state machine (a generation
//! counter plus a cancellation token slot), so "last call wins" is
//! observable behavior rather than a side effect of captured timer handles.
//!
//! Semantics per call:
//! - the predecessor's token is cancelled, covering both its pending
//!   quiet-period timer and its in-flight fetch
//! - the caller sleeps out the quiet period; if superseded meanwhile it
//!   resolves [`DebounceOutcome::Superseded`]
//! - queries shorter than the configured minimum resolve
//!   [`DebounceOutcome::BelowMinLength`] immediately, without scheduling
//!   any work (and still displace a pending predecessor)
//!
//! A superseded fetch may still complete server-side; its result is
//! discarded client-side. Superseded calls never observe a newer call's
//! data and never produce an error.

use crate::core::config::DebounceConfig;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Result of a gated call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceOutcome<T> {
    /// This call survived the quiet period and its fetch completed
    Resolved(T),

    /// A newer call displaced this one before or during its fetch
    Superseded,

    /// The query was too short to be worth a fetch
    BelowMinLength,
}

impl<T> DebounceOutcome<T> {
    /// The fetched value, if this call was the one honored
    pub fn resolved(self) -> Option<T> {
        match self {
            Self::Resolved(value) => Some(value),
            _ => None,
        }
    }

    /// The fetched value, or `default` for displaced and short-query calls
    pub fn unwrap_or(self, default: T) -> T {
        self.resolved().unwrap_or(default)
    }
}

impl<T: Default> DebounceOutcome<T> {
    /// The fetched value, or `T::default()` otherwise
    pub fn unwrap_or_default(self) -> T {
        self.resolved().unwrap_or_default()
    }
}

/// One debounce channel (e.g. one search box)
///
/// All calls through the same gate displace each other; independent input
/// surfaces should each own their own gate.
pub struct DebounceGate {
    config: DebounceConfig,
    generation: AtomicU64,
    current: Mutex<Option<CancellationToken>>,
}

impl DebounceGate {
    /// Create a gate with the given quiet period and minimum query length
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            generation: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    /// Number of calls admitted so far (short queries included)
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Run `fetch` for `query` under debounce semantics
    ///
    /// `fetch` receives the trimmed query and is only invoked if this call
    /// is still the latest one once the quiet period has elapsed.
    pub async fn run<T, F, Fut>(&self, query: &str, fetch: F) -> DebounceOutcome<T>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = T>,
    {
        let query = query.trim().to_string();

        // Even a too-short query displaces the pending call: clearing the
        // input must not leave an older fetch running.
        let my_generation = self.supersede_predecessor();

        if query.chars().count() < self.config.min_query_len {
            debug!(query = %query, "query below minimum length, skipping fetch");
            return DebounceOutcome::BelowMinLength;
        }

        let token = {
            let token = CancellationToken::new();
            *self.current.lock() = Some(token.clone());
            token
        };

        tokio::select! {
            _ = token.cancelled() => return DebounceOutcome::Superseded,
            _ = sleep(self.config.quiet_period) => {}
        }

        // The timer and a successor's cancel can race; the generation check
        // settles it.
        if self.generation.load(Ordering::SeqCst) != my_generation {
            return DebounceOutcome::Superseded;
        }

        let result = tokio::select! {
            _ = token.cancelled() => return DebounceOutcome::Superseded,
            result = fetch(query) => result,
        };

        // A result that arrives after a successor was admitted is discarded.
        if self.generation.load(Ordering::SeqCst) != my_generation {
            return DebounceOutcome::Superseded;
        }
        DebounceOutcome::Resolved(result)
    }

    /// Bump the generation and cancel whatever call currently owns the slot
    fn supersede_predecessor(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = self.current.lock().take() {
            previous.cancel();
        }
        generation
    }
}
