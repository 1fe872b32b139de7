//! Catalog content model.
//!
//! Content items are immutable once fetched. Categories keep the order the
//! server sent them in, which is the display order.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Identifier of a movie or series in the remote catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(u64);

impl ContentId {
    /// Wrap a raw catalog id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric id as used on the wire.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ContentId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether an item is a film or an episodic show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Feature film.
    Movie,
    /// Episodic show.
    #[serde(alias = "tv")]
    Series,
}

/// Artwork URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRefs {
    /// Portrait poster.
    pub poster: Option<String>,
    /// Landscape backdrop.
    pub backdrop: Option<String>,
}

/// A single catalog entry.
///
/// ## Invariants
/// - `rating` lies within `[0, 10]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Catalog id.
    pub id: ContentId,
    /// Title (films) or name (series).
    pub title: String,
    /// Synopsis.
    pub overview: String,
    /// Artwork.
    pub images: ImageRefs,
    /// Release or first-air date.
    pub release_date: Option<NaiveDate>,
    /// Average vote on a 0–10 scale.
    pub rating: f32,
    /// Runtime, only known on detail lookups.
    pub runtime_minutes: Option<u32>,
    /// Film or series.
    pub media_kind: MediaKind,
    /// Genre ids.
    pub genre_ids: Vec<u32>,
    /// Adult content flag.
    pub adult: bool,
    /// Trailer video key, when one was found.
    pub trailer_key: Option<String>,
}

/// Ordered mapping from category name to its items.
///
/// Rebuilt wholesale on every fetch. Within a category each id appears once;
/// the first occurrence wins.
///
/// # Examples
/// ```
/// use client::domain::ContentCategoryMap;
///
/// let map = ContentCategoryMap::from_categories([
///     ("trending".to_owned(), Vec::new()),
///     ("action".to_owned(), Vec::new()),
/// ]);
/// let names: Vec<_> = map.names().collect();
/// assert_eq!(names, ["trending", "action"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentCategoryMap(IndexMap<String, Vec<ContentItem>>);

impl ContentCategoryMap {
    /// Build a map from categories in display order.
    pub fn from_categories(
        categories: impl IntoIterator<Item = (String, Vec<ContentItem>)>,
    ) -> Self {
        let map = categories
            .into_iter()
            .map(|(name, items)| (name, dedupe_by_id(items)))
            .collect();
        Self(map)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no categories are held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Items of one category.
    pub fn get(&self, category: &str) -> Option<&[ContentItem]> {
        self.0.get(category).map(Vec::as_slice)
    }

    /// Category names in display order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Categories with their items in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ContentItem])> {
        self.0
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    /// First item with `id` across all categories.
    pub fn find(&self, id: ContentId) -> Option<&ContentItem> {
        self.0.values().flatten().find(|item| item.id == id)
    }
}

fn dedupe_by_id(items: Vec<ContentItem>) -> Vec<ContentItem> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.id))
        .collect()
}

/// One page of free-text search results.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    /// Matching items, best rated first as returned by the server.
    pub results: Vec<ContentItem>,
    /// Query echoed by the server.
    pub query: String,
    /// Page number.
    pub page: u32,
}

/// Catalog filtered by one genre.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreListing {
    /// Films in the genre.
    pub movies: Vec<ContentItem>,
    /// Series in the genre.
    pub series: Vec<ContentItem>,
    /// Films followed by series.
    pub combined: Vec<ContentItem>,
}

/// Trending films and series.
#[derive(Debug, Clone, PartialEq)]
pub struct Trending {
    /// Trending films.
    pub movies: Vec<ContentItem>,
    /// Trending series.
    pub series: Vec<ContentItem>,
}

/// Popular films and series.
#[derive(Debug, Clone, PartialEq)]
pub struct Popular {
    /// Popular films.
    pub movies: Vec<ContentItem>,
    /// Popular series.
    pub series: Vec<ContentItem>,
}

/// Genre id to display name.
pub type Genres = BTreeMap<u32, String>;
