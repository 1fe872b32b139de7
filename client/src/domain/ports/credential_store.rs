//! Port owning the persisted bearer token and cached user record.
//!
//! The credential store is the only component allowed to persist the token.
//! `save` and `clear` always touch both halves together; `load` yields
//! nothing unless both halves are present and readable.

use crate::domain::{AccessToken, Error, User};

/// Token and user record restored from durable storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCredential {
    /// Bearer token presented on each request.
    pub token: AccessToken,
    /// Cached user record written alongside the token.
    pub user: User,
}

/// Persistence port for the session credential.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    /// Persist the token and user record together.
    fn save(&self, token: &AccessToken, user: &User) -> Result<(), Error>;

    /// Restore the token and user record, if both are present.
    fn load(&self) -> Result<Option<StoredCredential>, Error>;

    /// Read only the token.
    fn token(&self) -> Result<Option<AccessToken>, Error>;

    /// Remove both halves. Safe to call when nothing is stored.
    fn clear(&self) -> Result<(), Error>;
}
