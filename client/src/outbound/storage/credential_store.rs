//! Credential store over a key/value store.
//!
//! The token and the cached user record live under two keys that are
//! written and cleared together under one lock.

use std::sync::Mutex;

use tracing::warn;

use crate::domain::ports::{CredentialStore, KeyValueStore, StoredCredential};
use crate::domain::{AccessToken, Error, User};

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Key holding the JSON-encoded user record.
pub const USER_KEY: &str = "user";

/// [`CredentialStore`] adapter persisting through any [`KeyValueStore`].
///
/// # Examples
/// ```
/// use client::domain::ports::CredentialStore;
/// use client::outbound::storage::{KeyValueCredentialStore, MemoryKeyValueStore};
///
/// let store = KeyValueCredentialStore::new(MemoryKeyValueStore::default());
/// assert!(store.load().unwrap().is_none());
/// store.clear().unwrap();
/// ```
#[derive(Debug)]
pub struct KeyValueCredentialStore<K> {
    store: K,
    guard: Mutex<()>,
}

impl<K> KeyValueCredentialStore<K> {
    /// Wrap a key/value store.
    pub fn new(store: K) -> Self {
        Self {
            store,
            guard: Mutex::new(()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, Error> {
        self.guard
            .lock()
            .map_err(|_| Error::storage("credential store lock poisoned"))
    }
}

impl<K: KeyValueStore> KeyValueCredentialStore<K> {
    fn remove_both(&self) -> Result<(), Error> {
        let token = self.store.remove(TOKEN_KEY);
        let user = self.store.remove(USER_KEY);
        token?;
        user?;
        Ok(())
    }
}

impl<K: KeyValueStore> CredentialStore for KeyValueCredentialStore<K> {
    fn save(&self, token: &AccessToken, user: &User) -> Result<(), Error> {
        let encoded = serde_json::to_string(user)
            .map_err(|error| Error::storage(format!("failed to encode user record: {error}")))?;
        let _held = self.lock()?;
        self.store.set(TOKEN_KEY, token.expose())?;
        if let Err(error) = self.store.set(USER_KEY, &encoded) {
            if let Err(cleanup) = self.store.remove(TOKEN_KEY) {
                warn!(error = %cleanup, "failed to remove token after partial save");
            }
            return Err(error.into());
        }
        Ok(())
    }

    fn load(&self) -> Result<Option<StoredCredential>, Error> {
        let _held = self.lock()?;
        let token = self.store.get(TOKEN_KEY)?;
        let user = self.store.get(USER_KEY)?;
        let (token, user) = match (token, user) {
            (Some(token), Some(user)) => (token, user),
            (None, None) => return Ok(None),
            _ => {
                warn!("credential half missing; clearing leftover entry");
                self.remove_both()?;
                return Ok(None);
            }
        };
        match serde_json::from_str::<User>(&user) {
            Ok(user) => Ok(Some(StoredCredential {
                token: AccessToken::new(token),
                user,
            })),
            Err(error) => {
                warn!(error = %error, "cached user record unreadable; clearing credential");
                self.remove_both()?;
                Ok(None)
            }
        }
    }

    fn token(&self) -> Result<Option<AccessToken>, Error> {
        let _held = self.lock()?;
        Ok(self.store.get(TOKEN_KEY)?.map(AccessToken::new))
    }

    fn clear(&self) -> Result<(), Error> {
        let _held = self.lock()?;
        self.remove_both()
    }
}
