//! Application context.
//!
//! Bundles the session, catalog, watchlist and playback components around
//! one gateway and one credential store, and carries them through the
//! lifecycle `new -> bootstrap -> ... -> dispose`. Front-ends hold a context
//! instead of reaching for global state.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{ApiGateway, CredentialStore};
use crate::domain::{
    ContentCache, ContentId, Error, Liveness, PlaybackTracker, ProfileUpdate, RemoteApi,
    SessionManager, SessionState, User, WatchlistSynchronizer,
};

/// Injectable bundle of client components.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use client::domain::{AppContext, SessionState};
/// use client::outbound::http::{HttpApiGateway, HttpGatewayConfig};
/// use client::outbound::storage::{KeyValueCredentialStore, MemoryKeyValueStore};
///
/// let store = Arc::new(KeyValueCredentialStore::new(MemoryKeyValueStore::default()));
/// let config = HttpGatewayConfig::new("http://localhost:8001".parse().unwrap());
/// let gateway = Arc::new(HttpApiGateway::new(config, Arc::clone(&store)).unwrap());
/// let context = AppContext::new(gateway, store);
/// assert_eq!(context.session().state(), SessionState::Authenticating);
/// context.dispose();
/// assert!(context.is_disposed());
/// ```
pub struct AppContext<G, S> {
    liveness: Liveness,
    session: SessionManager<G, S>,
    content: ContentCache<G>,
    watchlist: WatchlistSynchronizer<G>,
    playback: PlaybackTracker<G>,
}

impl<G, S> AppContext<G, S> {
    /// Wire every component around the shared gateway and store.
    pub fn new(gateway: Arc<G>, store: Arc<S>) -> Self {
        let liveness = Liveness::new();
        let api = RemoteApi::new(gateway);
        Self {
            session: SessionManager::new(api.clone(), store, liveness.clone()),
            content: ContentCache::new(api.clone(), liveness.clone()),
            watchlist: WatchlistSynchronizer::new(api.clone(), liveness.clone()),
            playback: PlaybackTracker::new(api),
            liveness,
        }
    }

    /// Session state owner.
    pub fn session(&self) -> &SessionManager<G, S> {
        &self.session
    }

    /// Catalog cache.
    pub fn content(&self) -> &ContentCache<G> {
        &self.content
    }

    /// Watchlist state.
    pub fn watchlist(&self) -> &WatchlistSynchronizer<G> {
        &self.watchlist
    }

    /// Watch history.
    pub fn playback(&self) -> &PlaybackTracker<G> {
        &self.playback
    }

    /// Stop applying responses that arrive from now on.
    pub fn dispose(&self) {
        debug!("disposing application context");
        self.liveness.dispose();
    }

    /// Whether [`Self::dispose`] has been called.
    pub fn is_disposed(&self) -> bool {
        !self.liveness.is_alive()
    }

    fn seed_watchlist(&self, user: &User) {
        self.watchlist.reset(user.watchlist_ids.iter().copied());
    }
}

impl<G, S> AppContext<G, S>
where
    G: ApiGateway,
    S: CredentialStore,
{
    /// Restore the session and seed the watchlist from it.
    pub async fn bootstrap(&self) -> SessionState {
        let state = self.session.bootstrap().await;
        match state.user() {
            Some(user) => self.seed_watchlist(user),
            None => self.watchlist.reset([]),
        }
        state
    }

    /// Sign in, then seed the watchlist from the returned user.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, Error> {
        let user = self.session.login(email, password).await?;
        self.seed_watchlist(&user);
        Ok(user)
    }

    /// Create an account, then seed the watchlist from it.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User, Error> {
        let user = self.session.signup(name, email, password).await?;
        self.seed_watchlist(&user);
        Ok(user)
    }

    /// Forget the session and drop per-user state.
    pub fn sign_out(&self) {
        self.session.sign_out();
        self.watchlist.reset([]);
        self.content.clear();
    }

    /// Toggle a watchlist entry for the signed-in user.
    ///
    /// # Errors
    ///
    /// `Validation` when nobody is signed in; otherwise as
    /// [`WatchlistSynchronizer::toggle`].
    pub async fn toggle_watchlist(&self, id: ContentId) -> Result<bool, Error> {
        if !self.session.state().is_authenticated() {
            return Err(Error::validation("sign in to change the watchlist"));
        }
        self.watchlist.toggle(id).await
    }

    /// Update profile fields. The watchlist is left to the synchronizer.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, Error> {
        self.session.update_profile(update).await
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
