//! Durable credential slot.
//!
//! A [`TokenStore`] holds at most one bearer token. Saving a new token
//! replaces the previous one. Implementations swallow and log their own I/O
//! failures: the session manager treats an unreadable slot the same as an
//! empty one.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};

/// A single key-value slot holding the bearer token.
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if any.
    fn load(&self) -> impl Future<Output = Option<SecretString>> + Send;

    /// Persist `token`, superseding whatever was stored before.
    fn save(&self, token: &SecretString) -> impl Future<Output = ()> + Send;

    /// Remove the persisted token. Clearing an empty slot is a no-op.
    fn clear(&self) -> impl Future<Output = ()> + Send;
}

/// In-process token slot.
///
/// Clones share the same slot, so a test can keep one handle while the
/// session manager owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot that already holds `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token.into()))),
        }
    }

    /// Raw contents of the slot.
    #[must_use]
    pub fn peek(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, value: Option<String>) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Option<SecretString> {
        self.peek().map(SecretString::from)
    }

    async fn save(&self, token: &SecretString) {
        self.set(Some(token.expose_secret().to_owned()));
    }

    async fn clear(&self) {
        self.set(None);
    }
}
