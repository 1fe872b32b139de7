//! DTOs for decoding remote API JSON responses.
//!
//! Responses decode into these transport DTOs first, then map into domain
//! records in one pass. Any mismatch becomes a message string that the
//! caller wraps as a remote error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::domain::{
    ContentId, ContentItem, Genres, ImageRefs, MediaKind, Profile, Subscription,
    SubscriptionKind, User, UserId, WatchHistoryEntry,
};

const DEFAULT_LANGUAGE: &str = "es";
const DEFAULT_COUNTRY: &str = "ES";

/// Aggregate catalog categories populated from tv endpoints on the server.
const SERIES_CATEGORIES: &[&str] = &["popular_series", "tv_drama", "tv_comedy", "crime"];

/// Media kind assumed for items of `category` that carry no `media_type`.
pub(super) fn category_media_kind(category: &str) -> MediaKind {
    if SERIES_CATEGORIES.contains(&category) {
        MediaKind::Series
    } else {
        MediaKind::Movie
    }
}

/// Parse server timestamps, which may or may not carry an offset.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|error| format!("invalid timestamp {raw:?}: {error}"))
}

fn parse_optional_timestamp(raw: Option<String>) -> Result<Option<DateTime<Utc>>, String> {
    raw.filter(|value| !value.trim().is_empty())
        .map(|value| parse_timestamp(&value))
        .transpose()
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthResponseDto {
    pub(super) access_token: String,
    pub(super) user: UserDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    id: String,
    name: String,
    email: String,
    avatar: Option<String>,
    subscription: SubscriptionDto,
    #[serde(default)]
    my_list: Vec<u64>,
    profile: Option<ProfileDto>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionDto {
    #[serde(rename = "type")]
    kind: SubscriptionKind,
    #[serde(default)]
    days_remaining: i64,
    start_date: Option<String>,
    end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileDto {
    language: Option<String>,
    country: Option<String>,
}

impl UserDto {
    pub(super) fn into_domain(self) -> Result<User, String> {
        let id = UserId::new(&self.id).map_err(|error| format!("user {:?}: {error}", self.id))?;
        let subscription = self.subscription;
        let days_remaining = u32::try_from(subscription.days_remaining.max(0)).unwrap_or(u32::MAX);
        let profile = self.profile.unwrap_or(ProfileDto {
            language: None,
            country: None,
        });

        Ok(User {
            id,
            name: self.name,
            email: self.email,
            avatar: self.avatar,
            subscription: Subscription {
                kind: subscription.kind,
                days_remaining,
                started_at: parse_optional_timestamp(subscription.start_date)?,
                ends_at: parse_optional_timestamp(subscription.end_date)?,
            },
            profile: Profile {
                language: profile
                    .language
                    .unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned()),
                country: profile.country.unwrap_or_else(|| DEFAULT_COUNTRY.to_owned()),
            },
            watchlist_ids: self.my_list.into_iter().map(ContentId::new).collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ContentItemDto {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    backdrop_path: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
    #[serde(default)]
    genre_ids: Vec<u32>,
    #[serde(default)]
    adult: bool,
    runtime: Option<u32>,
    video_key: Option<String>,
    media_type: Option<MediaKind>,
}

impl ContentItemDto {
    pub(super) fn into_domain(self, fallback_kind: MediaKind) -> Result<ContentItem, String> {
        let rating = self.vote_average.unwrap_or(0.0);
        if !rating.is_finite() || !(0.0..=10.0).contains(&rating) {
            return Err(format!("item {} has rating {rating} outside [0, 10]", self.id));
        }
        let release_date = self
            .release_date
            .or(self.first_air_date)
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .map_err(|error| format!("item {} release date {raw:?}: {error}", self.id))
            })
            .transpose()?;

        Ok(ContentItem {
            id: ContentId::new(self.id),
            title: self.title.or(self.name).unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            images: ImageRefs {
                poster: self.poster_path,
                backdrop: self.backdrop_path,
            },
            release_date,
            #[expect(
                clippy::cast_possible_truncation,
                reason = "rating is range-checked to [0, 10]"
            )]
            rating: rating as f32,
            runtime_minutes: self.runtime,
            media_kind: self.media_type.unwrap_or(fallback_kind),
            genre_ids: self.genre_ids,
            adult: self.adult,
            trailer_key: self.video_key,
        })
    }
}

pub(super) fn items_into_domain(
    items: Vec<ContentItemDto>,
    fallback_kind: MediaKind,
) -> Result<Vec<ContentItem>, String> {
    items
        .into_iter()
        .map(|item| item.into_domain(fallback_kind))
        .collect()
}

/// Aggregate catalog, keyed by category in server order.
pub(super) type CatalogDto = IndexMap<String, Vec<ContentItemDto>>;

#[derive(Debug, Deserialize)]
pub(super) struct SearchDto {
    #[serde(default)]
    pub(super) results: Vec<ContentItemDto>,
    pub(super) query: String,
    pub(super) page: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct GenreListingDto {
    #[serde(default)]
    pub(super) movies: Vec<ContentItemDto>,
    #[serde(default)]
    pub(super) tv_shows: Vec<ContentItemDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TrendingDto {
    #[serde(default)]
    pub(super) trending_movies: Vec<ContentItemDto>,
    #[serde(default)]
    pub(super) trending_tv: Vec<ContentItemDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PopularDto {
    #[serde(default)]
    pub(super) popular_movies: Vec<ContentItemDto>,
    #[serde(default)]
    pub(super) popular_tv: Vec<ContentItemDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GenresDto {
    pub(super) genres: Genres,
}

#[derive(Debug, Deserialize)]
pub(super) struct SavedItemsDto {
    #[serde(default)]
    pub(super) movies: Vec<ContentItemDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AckDto {
    pub(super) success: bool,
    pub(super) message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WatchHistoryDto {
    #[serde(default)]
    pub(super) history: Vec<WatchHistoryEntryDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WatchHistoryEntryDto {
    movie_id: u64,
    progress: i64,
    #[serde(default)]
    completed: bool,
    watched_at: Option<String>,
    movie_details: Option<ContentItemDto>,
}

impl WatchHistoryEntryDto {
    pub(super) fn into_domain(self) -> Result<WatchHistoryEntry, String> {
        let progress = u8::try_from(self.progress)
            .ok()
            .filter(|value| *value <= crate::domain::MAX_PROGRESS)
            .ok_or_else(|| {
                format!(
                    "history entry {} has progress {} outside 0..=100",
                    self.movie_id, self.progress
                )
            })?;
        let details = self
            .movie_details
            .map(|details| details.into_domain(MediaKind::Movie))
            .transpose()?;

        Ok(WatchHistoryEntry {
            content_id: ContentId::new(self.movie_id),
            progress,
            completed: self.completed,
            watched_at: parse_optional_timestamp(self.watched_at)?,
            details,
        })
    }
}
