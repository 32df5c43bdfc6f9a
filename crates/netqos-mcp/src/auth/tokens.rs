//! Access token issuance and verification.
//!
//! Tokens are HS256-signed JWTs whose claims carry the client identity and a
//! 24-hour expiry. Every issued token is also mirrored into the store with an
//! independently computed expiry: verification requires the signature, the
//! embedded expiry, AND the store entry to all check out, so a token purged
//! from server-side state is rejected even while its claims still decode.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::store::{StoreEntry, TokenStore};

/// Claim type tag carried by every access token.
const TOKEN_TYPE: &str = "access_token";

/// Signed claims embedded in an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Client the token was issued to.
    pub client_id: String,

    /// Fixed type tag distinguishing access tokens from other signed blobs.
    #[serde(rename = "type")]
    pub token_type: String,

    /// Issue time (Unix seconds).
    pub iat: i64,

    /// Expiry (Unix seconds), enforced during signature validation.
    pub exp: i64,
}

/// Outcome of access token verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenVerification {
    /// Whether the token passed both the cryptographic and the store check.
    pub valid: bool,

    /// Client identity from the decoded claims, present only when valid.
    pub client_id: Option<String>,
}

impl TokenVerification {
    fn invalid() -> Self {
        Self { valid: false, client_id: None }
    }
}

/// Issues signed bearer tokens and verifies them against both the signature
/// and the server-side store.
#[derive(Clone)]
pub struct AccessTokenService {
    store: Arc<TokenStore>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl AccessTokenService {
    /// Create a service signing with `secret` and mirroring tokens into
    /// `store` with the given validity window.
    #[must_use]
    pub fn new(store: Arc<TokenStore>, secret: &str, lifetime: Duration) -> Self {
        Self {
            store,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    /// Mint a signed access token for `client_id`.
    ///
    /// The embedded expiry claim and the store entry's expiry are computed
    /// from the same configured lifetime but tick independently from here on.
    ///
    /// # Errors
    ///
    /// Returns an error when claim serialization or signing fails.
    pub fn issue(&self, client_id: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = AccessClaims {
            client_id: client_id.to_string(),
            token_type: TOKEN_TYPE.to_string(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        self.store.insert_token(token.clone(), StoreEntry::new(client_id, self.lifetime));

        tracing::debug!(client_id = %client_id, "Issued access token");
        Ok(token)
    }

    /// Verify a bearer token.
    ///
    /// Fails closed on any parse, signature, type-tag, or expiry problem,
    /// then requires a live store entry: a cryptographically sound token
    /// that has been purged from the store is invalid. Store-expired entries
    /// are removed eagerly on touch. On success the reported `client_id`
    /// comes from the decoded claims, not the store record.
    #[must_use]
    pub fn verify(&self, token: &str) -> TokenVerification {
        // Both clocks live in this process, so no leeway for skew.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let Ok(data) = decode::<AccessClaims>(token, &self.decoding_key, &validation) else {
            return TokenVerification::invalid();
        };
        if data.claims.token_type != TOKEN_TYPE {
            return TokenVerification::invalid();
        }

        let Some(entry) = self.store.get_token(token) else {
            return TokenVerification::invalid();
        };
        if entry.is_expired() {
            self.store.remove_token(token);
            return TokenVerification::invalid();
        }

        TokenVerification { valid: true, client_id: Some(data.claims.client_id) }
    }
}

impl std::fmt::Debug for AccessTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenService").field("lifetime", &self.lifetime).finish()
    }
}
