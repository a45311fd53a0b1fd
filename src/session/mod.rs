//! Session-scoped pagination state.
//!
//! Each search key (an authenticated user id, or a per-browser session token)
//! maps to the last search's query text, embedding, and served offset so a
//! follow-up request can page through the same ranked candidate list without
//! re-embedding the query.
//!
//! Entries are soft state: process-local, bounded by a TTL, and lost on
//! restart. There is no background sweeper — expired entries are dropped on
//! the next write and are never returned by `get` in the meantime. The store
//! is injected into the orchestrator behind this interface so a deployment
//! spanning multiple instances can swap in a shared TTL cache instead.


use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Default session lifetime in seconds (one hour).
pub const DEFAULT_SESSION_TTL_SECS: i64 = 3600;

/// Pagination state for one search key.
#[derive(Debug, Clone)]
pub struct SearchSession {
    /// Last search text.
    pub query: String,
    /// Embedding produced for `query`; reused verbatim by follow-ups.
    pub embedding: Vec<f32>,
    /// Offset already served for this embedding.
    pub last_offset: usize,
    /// Write timestamp used for expiry.
    pub updated_at: DateTime<Utc>,
}

/// In-process TTL-bounded map from search key to [`SearchSession`].
///
/// Reads and writes are lock-guarded so concurrent requests sharing a key
/// cannot corrupt the map; overlapping writes are last-write-wins. Two
/// concurrent follow-ups for the same key may both read the same offset and
/// serve a duplicate page — an accepted limitation of the soft state, not a
/// consistency bug.
pub struct SessionStore {
    ttl: Duration,
    entries: RwLock<HashMap<String, SearchSession>>,
}

impl SessionStore {
    /// Creates a store whose entries expire `ttl` after their last write.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a store with the default one-hour TTL.
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::seconds(DEFAULT_SESSION_TTL_SECS))
    }

    /// Returns the live session for `key`, or `None` if absent or expired.
    ///
    /// An entry past its TTL is treated as absent even if the lazy sweep has
    /// not removed it yet.
    pub fn get(&self, key: &str, now: DateTime<Utc>) -> Option<SearchSession> {
        self.entries
            .read()
            .get(key)
            .filter(|session| !self.is_expired(session, now))
            .cloned()
    }

    /// Upserts the session for `key` (last write wins), then sweeps expired
    /// entries using the session's own timestamp as the clock.
    pub fn put(&self, key: &str, session: SearchSession) {
        let now = session.updated_at;
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), session);
        Self::sweep(&mut entries, self.ttl, now);
    }

    /// Removes every entry whose last write is more than the TTL before
    /// `now`. Returns the number of removed entries.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write();
        Self::sweep(&mut entries, self.ttl, now)
    }

    /// Returns the number of stored sessions, including not-yet-swept ones.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if no sessions are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn is_expired(&self, session: &SearchSession, now: DateTime<Utc>) -> bool {
        now - session.updated_at > self.ttl
    }

    fn sweep(
        entries: &mut HashMap<String, SearchSession>,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> usize {
        let before = entries.len();
        entries.retain(|_, session| now - session.updated_at <= ttl);
        before - entries.len()
    }
}
