//! Content cache.
//!
//! Holds the categorised catalog for the session. The aggregate map is only
//! ever replaced wholesale; a failed reload keeps the last good map. Other
//! catalog lookups are independent fetches that are not merged into it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::ports::ApiGateway;
use crate::domain::{
    ContentCategoryMap, ContentId, ContentItem, Error, GenreListing, Genres, Liveness, Popular,
    RemoteApi, SearchResults, Trending,
};

/// Outcome of [`ContentCache::load_all`].
#[derive(Debug, Clone)]
pub struct CatalogLoad {
    /// Map to display: the fresh one on success, otherwise the last good
    /// map (empty before the first success).
    pub categories: Arc<ContentCategoryMap>,
    /// Set when this load failed.
    pub error: Option<Error>,
    /// Set when a newer load started, or the context was disposed, before
    /// this one completed. Its response was not applied.
    pub superseded: bool,
}

/// Session-scoped catalog state.
pub struct ContentCache<G> {
    api: RemoteApi<G>,
    liveness: Liveness,
    generation: AtomicU64,
    categories: watch::Sender<Arc<ContentCategoryMap>>,
}

fn validate_page(page: u32) -> Result<(), Error> {
    if page == 0 {
        return Err(Error::validation("page must be 1 or greater"));
    }
    Ok(())
}

impl<G> ContentCache<G> {
    /// Create an empty cache.
    pub fn new(api: RemoteApi<G>, liveness: Liveness) -> Self {
        let (categories, _) = watch::channel(Arc::new(ContentCategoryMap::default()));
        Self {
            api,
            liveness,
            generation: AtomicU64::new(0),
            categories,
        }
    }

    /// Last successfully loaded map.
    pub fn categories(&self) -> Arc<ContentCategoryMap> {
        Arc::clone(&self.categories.borrow())
    }

    /// Observe map replacements.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ContentCategoryMap>> {
        self.categories.subscribe()
    }

    /// Look up a cached item in any category.
    pub fn item(&self, id: ContentId) -> Option<ContentItem> {
        self.categories.borrow().find(id).cloned()
    }

    /// Drop the cached map, e.g. after sign-out.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.categories
            .send_replace(Arc::new(ContentCategoryMap::default()));
    }
}

impl<G: ApiGateway> ContentCache<G> {
    /// Fetch the aggregate catalog and replace the cached map.
    pub async fn load_all(&self) -> CatalogLoad {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let outcome = self.api.catalog().await;

        let current = self.generation.load(Ordering::Acquire) == generation;
        if !current || !self.liveness.is_alive() {
            debug!(generation, "discarding superseded catalog response");
            return CatalogLoad {
                categories: self.categories(),
                error: outcome.err(),
                superseded: true,
            };
        }

        match outcome {
            Ok(map) => {
                debug!(categories = map.len(), "catalog loaded");
                let map = Arc::new(map);
                self.categories.send_replace(Arc::clone(&map));
                CatalogLoad {
                    categories: map,
                    error: None,
                    superseded: false,
                }
            }
            Err(error) => {
                warn!(kind = %error.kind(), error = %error, "catalog load failed; keeping last good map");
                CatalogLoad {
                    categories: self.categories(),
                    error: Some(error),
                    superseded: false,
                }
            }
        }
    }

    /// Free-text search. Results are not merged into the cached map.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank query or page 0, without a network call.
    pub async fn search(&self, query: &str, page: u32) -> Result<SearchResults, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::validation("search query must not be empty"));
        }
        validate_page(page)?;
        self.api.search(query, page).await
    }

    /// Genre id to name table.
    pub async fn genres(&self) -> Result<Genres, Error> {
        self.api.genres().await
    }

    /// Catalog filtered by genre.
    ///
    /// # Errors
    ///
    /// `Validation` for page 0, without a network call.
    pub async fn by_genre(&self, genre_id: u32, page: u32) -> Result<GenreListing, Error> {
        validate_page(page)?;
        self.api.by_genre(genre_id, page).await
    }

    /// Film details.
    pub async fn movie(&self, id: ContentId) -> Result<ContentItem, Error> {
        self.api.movie(id).await
    }

    /// Series details.
    pub async fn series(&self, id: ContentId) -> Result<ContentItem, Error> {
        self.api.series(id).await
    }

    /// Trending films and series.
    pub async fn trending(&self) -> Result<Trending, Error> {
        self.api.trending().await
    }

    /// Popular films and series.
    pub async fn popular(&self) -> Result<Popular, Error> {
        self.api.popular().await
    }
}

#[cfg(test)]
#[path = "content_cache_tests.rs"]
mod tests;
