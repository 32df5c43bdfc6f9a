//! Static client credential validation.

use subtle::ConstantTimeEq;

/// The single configured client identity/secret pair, loaded once at
/// process start and immutable at runtime.
#[derive(Clone)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), client_secret: client_secret.into() }
    }

    /// Check a supplied identity/secret pair against the configured one.
    ///
    /// Both fields are compared in constant time and the two outcomes are
    /// combined without short-circuiting, so response timing does not reveal
    /// how much of either value matched.
    #[must_use]
    pub fn verify(&self, client_id: &str, client_secret: &str) -> bool {
        let id_ok = ct_eq(&self.client_id, client_id);
        let secret_ok = ct_eq(&self.client_secret, client_secret);
        bool::from(id_ok & secret_ok)
    }

    /// The configured client identity (safe to log; the secret is not).
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials").field("client_id", &self.client_id).finish()
    }
}

fn ct_eq(expected: &str, supplied: &str) -> subtle::Choice {
    expected.as_bytes().ct_eq(supplied.as_bytes())
}
