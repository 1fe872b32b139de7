//! Playback progress tracking.

use tracing::debug;

use crate::domain::ports::ApiGateway;
use crate::domain::{ContentId, Error, MAX_PROGRESS, RemoteApi, WatchHistoryEntry};

/// Records and reads watch history.
pub struct PlaybackTracker<G> {
    api: RemoteApi<G>,
}

impl<G> PlaybackTracker<G> {
    /// Create a tracker over the remote API.
    pub fn new(api: RemoteApi<G>) -> Self {
        Self { api }
    }
}

impl<G: ApiGateway> PlaybackTracker<G> {
    /// Record how far playback of `id` got.
    ///
    /// # Errors
    ///
    /// `Validation` when `progress` exceeds 100, without a network call.
    pub async fn record_progress(
        &self,
        id: ContentId,
        progress: u8,
        completed: bool,
    ) -> Result<(), Error> {
        if progress > MAX_PROGRESS {
            return Err(Error::validation(format!(
                "progress must be between 0 and {MAX_PROGRESS}, got {progress}"
            )));
        }
        debug!(%id, progress, completed, "recording playback progress");
        self.api.record_progress(id, progress, completed).await
    }

    /// Watch history as stored on the server.
    pub async fn history(&self) -> Result<Vec<WatchHistoryEntry>, Error> {
        self.api.watch_history().await
    }
}
