//! Authorization code issuance and one-time consumption.

use std::sync::Arc;
use std::time::Duration;

use super::store::{StoreEntry, TokenStore};

/// Issues one-time authorization codes and consumes them on redemption.
#[derive(Debug, Clone)]
pub struct AuthCodeService {
    store: Arc<TokenStore>,
    lifetime: Duration,
}

impl AuthCodeService {
    /// Create a service writing codes with the given validity window into
    /// `store`.
    #[must_use]
    pub fn new(store: Arc<TokenStore>, lifetime: Duration) -> Self {
        Self { store, lifetime }
    }

    /// Issue a fresh authorization code bound to `client_id`.
    ///
    /// The code is a random opaque string (two concatenated UUIDv4s, well
    /// over 128 bits of entropy) with no relation to the client identity.
    #[must_use]
    pub fn issue(&self, client_id: &str) -> String {
        let code = generate_opaque();
        self.store.insert_code(code.clone(), StoreEntry::new(client_id, self.lifetime));
        tracing::debug!(client_id = %client_id, "Issued authorization code");
        code
    }

    /// Verify an authorization code for `client_id` and consume it on
    /// success.
    ///
    /// Outcomes:
    /// - unknown code → `false`, no side effect;
    /// - expired code → removed eagerly, `false`;
    /// - code issued to a different client → `false` and the code is left
    ///   intact, so a third party guessing with the wrong identity cannot
    ///   burn a code the rightful client could still redeem;
    /// - match → the code is deleted and the call returns `true`.
    ///
    /// The final check-then-delete is a single atomic operation on the store
    /// key: when two exchanges race on the same valid code, exactly one of
    /// them consumes it.
    #[must_use]
    pub fn verify_and_consume(&self, code: &str, client_id: &str) -> bool {
        let Some(entry) = self.store.get_code(code) else {
            return false;
        };

        if entry.is_expired() {
            self.store.remove_code(code);
            return false;
        }

        if entry.client_id != client_id {
            return false;
        }

        self.store
            .remove_code_if(code, |current| {
                current.client_id == client_id && !current.is_expired()
            })
            .is_some()
    }
}

/// Generate a random opaque credential string (two UUIDv4s, 256 bits).
fn generate_opaque() -> String {
    format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn service() -> AuthCodeService {
        AuthCodeService::new(Arc::new(TokenStore::new()), Duration::from_secs(600))
    }

    #[test]
    fn test_issue_then_consume_once() {
        let codes = service();
        let code = codes.issue("client-a");

        assert!(codes.verify_and_consume(&code, "client-a"));
        // One-time use: the second attempt fails.
        assert!(!codes.verify_and_consume(&code, "client-a"));
    }

    #[test]
    fn test_codes_are_unique_and_opaque() {
        let codes = service();
        let first = codes.issue("client-a");
        let second = codes.issue("client-a");
        assert_ne!(first, second);
        assert!(!first.contains("client-a"));
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_unknown_code_fails_without_side_effect() {
        let codes = service();
        assert!(!codes.verify_and_consume("no-such-code", "client-a"));
    }

    #[test]
    fn test_wrong_client_does_not_burn_code() {
        let store = Arc::new(TokenStore::new());
        let codes = AuthCodeService::new(Arc::clone(&store), Duration::from_secs(600));
        let code = codes.issue("client-a");

        assert!(!codes.verify_and_consume(&code, "client-b"));
        assert!(store.get_code(&code).is_some());

        // The rightful client can still redeem it afterwards.
        assert!(codes.verify_and_consume(&code, "client-a"));
    }

    #[test]
    fn test_expired_code_is_purged_on_touch() {
        let store = Arc::new(TokenStore::new());
        let codes = AuthCodeService::new(Arc::clone(&store), Duration::from_secs(600));

        store.insert_code(
            "stale".into(),
            StoreEntry {
                client_id: "client-a".into(),
                expires_at: Utc::now() - chrono::Duration::minutes(1),
            },
        );

        assert!(!codes.verify_and_consume("stale", "client-a"));
        assert!(store.get_code("stale").is_none());
        // Still fails afterwards, now as an unknown code.
        assert!(!codes.verify_and_consume("stale", "client-a"));
    }

    #[tokio::test]
    async fn test_concurrent_double_exchange_single_winner() {
        let codes = Arc::new(service());
        let code = codes.issue("client-a");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let codes = Arc::clone(&codes);
            let code = code.clone();
            handles.push(tokio::spawn(async move {
                codes.verify_and_consume(&code, "client-a")
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
    }
}
