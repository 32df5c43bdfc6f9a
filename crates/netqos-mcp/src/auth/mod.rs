//! OAuth 2.0 credential lifecycle subsystem.
//!
//! Issues and consumes one-time authorization codes, mints and verifies
//! signed bearer access tokens, validates the static client credential pair,
//! and sweeps expired state. The store is an owned, injectable object shared
//! by the issuer/verifier services; the surrounding HTTP layer only ever
//! talks to the contracts exposed here and never sees the map internals.

pub mod codes;
pub mod credentials;
pub mod store;
pub mod sweeper;
pub mod tokens;

use std::sync::Arc;

use crate::config::OAuthConfig;

pub use codes::AuthCodeService;
pub use credentials::ClientCredentials;
pub use store::{StoreEntry, TokenStore};
pub use sweeper::{Sweeper, SweeperHandle};
pub use tokens::{AccessTokenService, TokenVerification};

/// The assembled credential subsystem, handed to the HTTP layer as one
/// injectable unit.
#[derive(Debug, Clone)]
pub struct AuthService {
    /// Shared code/token store.
    pub store: Arc<TokenStore>,

    /// Authorization code issuer/verifier.
    pub codes: AuthCodeService,

    /// Access token issuer/verifier.
    pub tokens: AccessTokenService,

    /// Static client credential validator.
    pub credentials: ClientCredentials,

    token_lifetime: std::time::Duration,
    sweep_interval: std::time::Duration,
}

impl AuthService {
    /// Assemble the subsystem from configuration over a fresh store.
    ///
    /// # Errors
    ///
    /// Returns an error when the signing secret is missing or a placeholder;
    /// starting up with a known default secret is the one fatal
    /// misconfiguration.
    pub fn new(config: &OAuthConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let store = Arc::new(TokenStore::new());
        Ok(Self {
            codes: AuthCodeService::new(Arc::clone(&store), config.code_lifetime),
            tokens: AccessTokenService::new(
                Arc::clone(&store),
                &config.jwt_secret,
                config.token_lifetime,
            ),
            credentials: ClientCredentials::new(&config.client_id, &config.client_secret),
            token_lifetime: config.token_lifetime,
            sweep_interval: config.sweep_interval,
            store,
        })
    }

    /// Access token validity window, as advertised in token responses.
    #[must_use]
    pub fn token_lifetime(&self) -> std::time::Duration {
        self.token_lifetime
    }

    /// Start the background expiry sweeper for this service's store.
    #[must_use]
    pub fn start_sweeper(&self) -> SweeperHandle {
        Sweeper::new(Arc::clone(&self.store), self.sweep_interval).start()
    }
}
