//! Session manager.
//!
//! Owns the `Anonymous / Authenticating / Authenticated` state and is the
//! only component that writes the credential store. State changes are
//! published on a `watch` channel so views re-render from a single source.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::ports::{ApiGateway, CredentialStore};
use crate::domain::{
    AuthSession, Error, Liveness, LoginCredentials, ProfileUpdate, RemoteApi, SignupForm, User,
};

/// Authentication state of the current session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No credential, or the stored one was rejected.
    Anonymous,
    /// A stored credential is being validated. Also the state before the
    /// first bootstrap has settled.
    Authenticating,
    /// Validated session for `User`.
    Authenticated(User),
}

impl SessionState {
    /// User of an authenticated session.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Anonymous | Self::Authenticating => None,
        }
    }

    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Session lifecycle over the remote API and credential store.
pub struct SessionManager<G, S> {
    api: RemoteApi<G>,
    store: Arc<S>,
    liveness: Liveness,
    state: watch::Sender<SessionState>,
}

impl<G, S> SessionManager<G, S> {
    /// Create a manager whose bootstrap is still pending.
    pub fn new(api: RemoteApi<G>, store: Arc<S>, liveness: Liveness) -> Self {
        let (state, _) = watch::channel(SessionState::Authenticating);
        Self {
            api,
            store,
            liveness,
            state,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Signed-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn publish(&self, next: SessionState) {
        if !self.liveness.is_alive() {
            debug!("session disposed; dropping state transition");
            return;
        }
        self.state.send_replace(next);
    }
}

impl<G, S> SessionManager<G, S>
where
    G: ApiGateway,
    S: CredentialStore,
{
    /// Restore the session from the credential store.
    ///
    /// Never fails: a missing or rejected credential ends in
    /// [`SessionState::Anonymous`] with the store cleared.
    pub async fn bootstrap(&self) -> SessionState {
        let stored = match self.store.load() {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                self.publish(SessionState::Anonymous);
                return self.state();
            }
            Err(error) => {
                warn!(error = %error, "credential store unreadable; starting anonymous");
                self.clear_store();
                self.publish(SessionState::Anonymous);
                return self.state();
            }
        };

        self.publish(SessionState::Authenticating);
        match self.api.current_user().await {
            Ok(user) => {
                if let Err(error) = self.store.save(&stored.token, &user) {
                    warn!(error = %error, "failed to refresh cached user record");
                }
                info!(user_id = %user.id, "session restored");
                self.publish(SessionState::Authenticated(user));
            }
            Err(error) => {
                info!(kind = %error.kind(), error = %error, "stored session rejected");
                self.clear_store();
                self.publish(SessionState::Anonymous);
            }
        }
        self.state()
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// `Validation` for blank input (nothing is sent); otherwise the
    /// gateway error verbatim, leaving the state unchanged.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, Error> {
        let credentials = LoginCredentials::try_from_parts(email, password)
            .map_err(|error| Error::validation(error.to_string()))?;
        let session = self.api.login(&credentials).await?;
        self.establish(session)
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// `Validation` when the form breaks the signup policy (nothing is
    /// sent); otherwise the gateway error verbatim.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User, Error> {
        let form = SignupForm::try_from_parts(name, email, password)
            .map_err(|error| Error::validation(error.to_string()))?;
        let session = self.api.signup(&form).await?;
        self.establish(session)
    }

    fn establish(&self, session: AuthSession) -> Result<User, Error> {
        self.store.save(&session.token, &session.user)?;
        info!(user_id = %session.user.id, "signed in");
        self.publish(SessionState::Authenticated(session.user.clone()));
        Ok(session.user)
    }

    /// Forget the credential locally. No network call; always succeeds.
    pub fn sign_out(&self) {
        self.clear_store();
        info!("signed out");
        self.publish(SessionState::Anonymous);
    }

    fn clear_store(&self) {
        if let Err(error) = self.store.clear() {
            warn!(error = %error, "failed to clear credential store");
        }
    }

    /// Update profile fields on the server and adopt the returned user.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty or blank update, or when nobody is signed
    /// in; otherwise the gateway error, leaving the user unchanged.
    /// `Storage` when the updated record cannot be persisted; the displayed
    /// user then stays the stored one.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, Error> {
        update
            .validate()
            .map_err(|error| Error::validation(error.to_string()))?;
        let Some(before) = self.current_user() else {
            return Err(Error::validation("sign in to update the profile"));
        };

        let user = self.api.update_profile(update).await?;
        let still_current = self
            .current_user()
            .is_some_and(|current| current.id == before.id);
        if !still_current {
            debug!("session changed during profile update; not applying");
            return Ok(user);
        }

        let token = self
            .store
            .token()?
            .ok_or_else(|| Error::storage("stored credential missing; sign in again"))?;
        self.store.save(&token, &user)?;
        self.publish(SessionState::Authenticated(user.clone()));
        Ok(user)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
