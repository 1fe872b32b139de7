//! Playback progress records.

use chrono::{DateTime, Utc};

use super::{ContentId, ContentItem};

/// Highest accepted progress percentage.
pub const MAX_PROGRESS: u8 = 100;

/// One playback progress record.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchHistoryEntry {
    /// Item that was played.
    pub content_id: ContentId,
    /// Percentage watched, `0..=100`.
    pub progress: u8,
    /// Whether playback reached the end.
    pub completed: bool,
    /// When the progress was recorded.
    pub watched_at: Option<DateTime<Utc>>,
    /// Item details, when the server could resolve them.
    pub details: Option<ContentItem>,
}
