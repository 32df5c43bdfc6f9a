//! In-memory store backing authorization codes and access tokens.
//!
//! Two independent mappings, each from an opaque string key to a
//! `{client_id, expires_at}` entry. All operations are non-blocking and safe
//! under concurrent access from request handlers and the expiry sweeper; the
//! sharded map keeps per-key mutation atomic with respect to concurrent
//! lookups, and a full sweep only ever locks one shard at a time.
//!
//! There is no persistence: a process restart clears every outstanding code
//! and token regardless of its recorded expiry.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// A stored credential entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    /// Client the credential was issued to.
    pub client_id: String,

    /// Instant after which the entry is no longer valid.
    pub expires_at: DateTime<Utc>,
}

impl StoreEntry {
    /// Create an entry for `client_id` expiring `lifetime` from now.
    #[must_use]
    pub fn new(client_id: impl Into<String>, lifetime: std::time::Duration) -> Self {
        Self { client_id: client_id.into(), expires_at: Utc::now() + lifetime }
    }

    /// Check whether the entry's validity window has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// Concurrency-safe store for authorization codes and access tokens.
#[derive(Debug, Default)]
pub struct TokenStore {
    auth_codes: DashMap<String, StoreEntry>,
    access_tokens: DashMap<String, StoreEntry>,
}

impl TokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Authorization codes ─────────────────────────────────────────────

    /// Insert an authorization code entry.
    pub fn insert_code(&self, code: String, entry: StoreEntry) {
        self.auth_codes.insert(code, entry);
    }

    /// Look up an authorization code. Returns a copy of the entry so no
    /// shard lock is held by the caller.
    #[must_use]
    pub fn get_code(&self, code: &str) -> Option<StoreEntry> {
        self.auth_codes.get(code).map(|entry| entry.clone())
    }

    /// Delete an authorization code unconditionally.
    pub fn remove_code(&self, code: &str) {
        self.auth_codes.remove(code);
    }

    /// Delete an authorization code only if the stored entry still satisfies
    /// `predicate`, atomically with respect to concurrent removals for the
    /// same key. Returns the removed entry on success.
    ///
    /// This is the consume-on-success primitive: of N concurrent callers
    /// passing the same predicate for the same code, exactly one observes
    /// `Some`.
    pub fn remove_code_if(
        &self,
        code: &str,
        predicate: impl FnOnce(&StoreEntry) -> bool,
    ) -> Option<StoreEntry> {
        self.auth_codes.remove_if(code, |_, entry| predicate(entry)).map(|(_, entry)| entry)
    }

    /// Number of stored authorization codes.
    #[must_use]
    pub fn code_count(&self) -> usize {
        self.auth_codes.len()
    }

    // ─── Access tokens ───────────────────────────────────────────────────

    /// Insert an access token mirror entry.
    pub fn insert_token(&self, token: String, entry: StoreEntry) {
        self.access_tokens.insert(token, entry);
    }

    /// Look up an access token mirror entry.
    #[must_use]
    pub fn get_token(&self, token: &str) -> Option<StoreEntry> {
        self.access_tokens.get(token).map(|entry| entry.clone())
    }

    /// Delete an access token mirror entry.
    pub fn remove_token(&self, token: &str) {
        self.access_tokens.remove(token);
    }

    /// Number of stored access tokens.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.access_tokens.len()
    }

    // ─── Sweep ───────────────────────────────────────────────────────────

    /// Remove every expired entry from both mappings. Returns the number of
    /// codes and tokens removed.
    ///
    /// Retention walks the map shard by shard, so request-path operations on
    /// other shards proceed while a shard is being pruned.
    pub fn sweep_expired(&self) -> (usize, usize) {
        let codes_before = self.auth_codes.len();
        self.auth_codes.retain(|_, entry| !entry.is_expired());
        let codes_removed = codes_before.saturating_sub(self.auth_codes.len());

        let tokens_before = self.access_tokens.len();
        self.access_tokens.retain(|_, entry| !entry.is_expired());
        let tokens_removed = tokens_before.saturating_sub(self.access_tokens.len());

        (codes_removed, tokens_removed)
    }
}
