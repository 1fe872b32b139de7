//! Domain primitives, services and ports.
//!
//! Purpose: define the strongly typed records the client works with and the
//! services that keep them consistent with the remote API. Services reach
//! the outside world only through the traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorKind: the single failure type every component returns.
//! - User, ContentItem, ContentCategoryMap, WatchHistoryEntry: records
//!   decoded from the server.
//! - SessionManager, ContentCache, WatchlistSynchronizer, PlaybackTracker:
//!   state owners, wired together by [`AppContext`].

pub mod auth;
pub mod content;
pub mod content_cache;
pub mod context;
pub mod error;
pub mod liveness;
pub mod playback;
pub mod ports;
pub mod remote_api;
pub mod session;
pub mod user;
pub mod watch_history;
pub mod watchlist;

pub use self::auth::{
    AccessToken, CredentialsValidationError, LoginCredentials, PASSWORD_MIN_LEN, SignupForm,
    check_password_policy,
};
pub use self::content::{
    ContentCategoryMap, ContentId, ContentItem, GenreListing, Genres, ImageRefs, MediaKind,
    Popular, SearchResults, Trending,
};
pub use self::content_cache::{CatalogLoad, ContentCache};
pub use self::context::AppContext;
pub use self::error::{Error, ErrorKind, GENERIC_REMOTE_MESSAGE};
pub use self::liveness::Liveness;
pub use self::playback::PlaybackTracker;
pub use self::remote_api::{AuthSession, RemoteApi, WatchlistAction};
pub use self::session::{SessionManager, SessionState};
pub use self::user::{
    Profile, ProfileUpdate, Subscription, SubscriptionKind, User, UserId, UserValidationError,
};
pub use self::watch_history::{MAX_PROGRESS, WatchHistoryEntry};
pub use self::watchlist::{MembershipStatus, WatchlistSnapshot, WatchlistSynchronizer};

/// Convenient client result alias.
///
/// # Examples
/// ```
/// use client::domain::{ClientResult, Error};
///
/// fn lookup() -> ClientResult<u32> {
///     Err(Error::validation("search query must not be blank"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ClientResult<T> = Result<T, Error>;
