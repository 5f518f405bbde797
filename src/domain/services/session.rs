#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::sync::Arc;
use std::sync::RwLock;

use crate::infrastructure::storage::TokenStore;

/// Single source of truth for the bearer token. Cloning hands out another
/// handle to the same token; the HTTP client holds one for reading, the
/// session manager is the only writer.
#[derive(Clone)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
    store: Arc<dyn TokenStore>,
}

impl Session {
    /// Restores whatever token survived the last run. An unreadable store is
    /// treated as logged out.
    pub fn init(store: Arc<dyn TokenStore>) -> Session {
        let token = match store.load() {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(err = ?err, "Failed to read persisted session, starting logged out");
                None
            }
        };

        tracing::debug!(authenticated = token.is_some(), "Session initialized");

        return Session {
            token: Arc::new(RwLock::new(token)),
            store,
        };
    }

    pub fn token(&self) -> Option<String> {
        let token = self
            .token
            .read()
            .unwrap_or_else(|poisoned| return poisoned.into_inner());
        return token.clone();
    }

    pub fn is_authenticated(&self) -> bool {
        return self
            .token()
            .map(|token| return !token.is_empty())
            .unwrap_or(false);
    }

    /// Swaps in a new token and persists it. The in-memory token stays
    /// authoritative for this run even when persisting fails.
    pub(super) fn replace(&self, token: &str) {
        {
            let mut current = self
                .token
                .write()
                .unwrap_or_else(|poisoned| return poisoned.into_inner());
            *current = Some(token.to_string());
        }

        if let Err(err) = self.store.save(token) {
            tracing::error!(err = ?err, "Failed to persist session token");
        }
    }

    pub(super) fn clear(&self) {
        {
            let mut current = self
                .token
                .write()
                .unwrap_or_else(|poisoned| return poisoned.into_inner());
            *current = None;
        }

        if let Err(err) = self.store.clear() {
            tracing::warn!(err = ?err, "Failed to remove persisted session token");
        }
    }
}
