//! Background purge of expired store entries.
//!
//! The sweeper is hygiene only: both verification paths already expire
//! entries on touch, so correctness never depends on a sweep having run. Its
//! job is to bound memory growth from abandoned codes and tokens.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::store::TokenStore;

/// Periodic expiry sweeper over both store mappings.
#[derive(Debug, Clone)]
pub struct Sweeper {
    store: Arc<TokenStore>,
    interval: Duration,
}

impl Sweeper {
    #[must_use]
    pub fn new(store: Arc<TokenStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Run a single sweep pass synchronously. Returns the number of codes
    /// and tokens removed. Tests call this directly instead of waiting on
    /// the wall-clock interval.
    pub fn sweep(&self) -> (usize, usize) {
        let (codes, tokens) = self.store.sweep_expired();
        if codes > 0 || tokens > 0 {
            tracing::debug!(codes, tokens, "Swept expired credentials");
        }
        (codes, tokens)
    }

    /// Spawn the background sweep loop and hand ownership of its lifetime to
    /// the caller.
    #[must_use]
    pub fn start(self) -> SweeperHandle {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            loop {
                interval.tick().await;
                self.sweep();
            }
        });
        SweeperHandle { handle }
    }
}

/// Handle to a running sweeper task. Dropping the handle leaves the task
/// running; call [`SweeperHandle::stop`] to terminate it.
#[derive(Debug)]
pub struct SweeperHandle {
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop the background task.
    pub fn stop(&self) {
        self.handle.abort();
    }

    /// Whether the task has terminated.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
