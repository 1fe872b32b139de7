//! Screen selection from session state.
//!
//! Presentation only: the router never triggers network calls or mutates
//! the session.

use crate::domain::SessionState;

/// Top-level screens of the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Shown while the session is being restored.
    Splash,
    /// Catalog browser for a signed-in user.
    Home,
    /// Sign-in form.
    Login,
    /// Account creation form.
    Signup,
}

impl Screen {
    /// Screen to render for `state`.
    ///
    /// `wants_signup` only matters for anonymous sessions. Authenticated
    /// screens are never selected while bootstrap is pending.
    ///
    /// # Examples
    /// ```
    /// use client::domain::SessionState;
    /// use client::router::Screen;
    ///
    /// assert_eq!(Screen::for_state(&SessionState::Authenticating, false), Screen::Splash);
    /// assert_eq!(Screen::for_state(&SessionState::Anonymous, true), Screen::Signup);
    /// ```
    pub fn for_state(state: &SessionState, wants_signup: bool) -> Self {
        match state {
            SessionState::Authenticating => Self::Splash,
            SessionState::Authenticated(_) => Self::Home,
            SessionState::Anonymous if wants_signup => Self::Signup,
            SessionState::Anonymous => Self::Login,
        }
    }

    /// Whether the screen needs a signed-in user.
    pub fn requires_session(self) -> bool {
        matches!(self, Self::Home)
    }
}
