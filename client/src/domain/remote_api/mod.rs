//! Typed catalogue of remote endpoints.
//!
//! Every method issues exactly one gateway call and decodes the body into
//! domain records. A body that does not fit its schema becomes
//! [`ErrorKind::Remote`](crate::domain::ErrorKind::Remote); nothing partial
//! is returned.

mod dto;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::domain::ports::{ApiGateway, ApiRequest};
use crate::domain::{
    AccessToken, ContentCategoryMap, ContentId, ContentItem, Error, GenreListing, Genres,
    LoginCredentials, MediaKind, Popular, ProfileUpdate, SearchResults, SignupForm, Trending, User,
    WatchHistoryEntry,
};

use self::dto::{
    AckDto, AuthResponseDto, CatalogDto, ContentItemDto, GenreListingDto, GenresDto, PopularDto,
    SavedItemsDto, SearchDto, TrendingDto, UserDto, WatchHistoryDto, category_media_kind,
    items_into_domain,
};

/// Token and user returned by login and signup.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    /// Bearer token to persist.
    pub token: AccessToken,
    /// Account the token belongs to.
    pub user: User,
}

/// Direction of a watchlist mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchlistAction {
    /// Save the item.
    Add,
    /// Remove the item.
    Remove,
}

/// Endpoint methods over an [`ApiGateway`].
#[derive(Debug)]
pub struct RemoteApi<G> {
    gateway: Arc<G>,
}

impl<G> Clone for RemoteApi<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, Error> {
    serde_json::from_value(value)
        .map_err(|error| Error::remote(format!("malformed {what} response: {error}")))
}

fn malformed(what: &str) -> impl FnOnce(String) -> Error + '_ {
    move |reason| Error::remote(format!("malformed {what} response: {reason}"))
}

impl<G> RemoteApi<G> {
    /// Wrap a gateway.
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }
}

impl<G: ApiGateway> RemoteApi<G> {
    async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest, what: &str) -> Result<T, Error> {
        debug!(method = %request.method(), path = request.path(), "remote call");
        let body = self.gateway.call(request).await?;
        decode(body, what)
    }

    async fn authenticate(&self, request: ApiRequest) -> Result<AuthSession, Error> {
        let response: AuthResponseDto = self.fetch(request, "auth").await?;
        let user = response.user.into_domain().map_err(malformed("auth"))?;
        Ok(AuthSession {
            token: AccessToken::new(response.access_token),
            user,
        })
    }

    /// `POST /auth/login`.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        self.authenticate(ApiRequest::post(
            "/auth/login",
            json!({"email": credentials.email(), "password": credentials.password()}),
        ))
        .await
    }

    /// `POST /auth/signup`.
    pub async fn signup(&self, form: &SignupForm) -> Result<AuthSession, Error> {
        self.authenticate(ApiRequest::post(
            "/auth/signup",
            json!({"name": form.name(), "email": form.email(), "password": form.password()}),
        ))
        .await
    }

    /// `GET /auth/me`, validating the stored token.
    pub async fn current_user(&self) -> Result<User, Error> {
        let dto: UserDto = self.fetch(ApiRequest::get("/auth/me"), "user").await?;
        dto.into_domain().map_err(malformed("user"))
    }

    /// `PUT /user/profile` with only the provided fields.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, Error> {
        let body = serde_json::to_value(update)
            .map_err(|error| Error::validation(format!("profile update: {error}")))?;
        let dto: UserDto = self
            .fetch(ApiRequest::put("/user/profile", body), "profile")
            .await?;
        dto.into_domain().map_err(malformed("profile"))
    }

    /// `POST /user/my-list`.
    pub async fn set_watchlist_membership(
        &self,
        id: ContentId,
        action: WatchlistAction,
    ) -> Result<(), Error> {
        let request = ApiRequest::post(
            "/user/my-list",
            json!({"movie_id": id.get(), "action": action}),
        );
        let ack: AckDto = self.fetch(request, "my-list").await?;
        if ack.success {
            Ok(())
        } else {
            Err(Error::remote(ack.message.unwrap_or_default()))
        }
    }

    /// `GET /user/my-list`, resolved to content details.
    pub async fn watchlist_items(&self) -> Result<Vec<ContentItem>, Error> {
        let dto: SavedItemsDto = self.fetch(ApiRequest::get("/user/my-list"), "my-list").await?;
        items_into_domain(dto.movies, MediaKind::Movie).map_err(malformed("my-list"))
    }

    /// `POST /user/watch-history`.
    pub async fn record_progress(
        &self,
        id: ContentId,
        progress: u8,
        completed: bool,
    ) -> Result<(), Error> {
        let request = ApiRequest::post(
            "/user/watch-history",
            json!({"movie_id": id.get(), "progress": progress, "completed": completed}),
        );
        let ack: AckDto = self.fetch(request, "watch-history").await?;
        if ack.success {
            Ok(())
        } else {
            Err(Error::remote(ack.message.unwrap_or_default()))
        }
    }

    /// `GET /user/watch-history`.
    pub async fn watch_history(&self) -> Result<Vec<WatchHistoryEntry>, Error> {
        let dto: WatchHistoryDto = self
            .fetch(ApiRequest::get("/user/watch-history"), "watch-history")
            .await?;
        dto.history
            .into_iter()
            .map(dto::WatchHistoryEntryDto::into_domain)
            .collect::<Result<_, _>>()
            .map_err(malformed("watch-history"))
    }

    /// `GET /content/netflix`, the aggregate categorised catalog.
    pub async fn catalog(&self) -> Result<ContentCategoryMap, Error> {
        let dto: CatalogDto = self
            .fetch(ApiRequest::get("/content/netflix"), "catalog")
            .await?;
        let categories = dto
            .into_iter()
            .map(|(name, items)| {
                let kind = category_media_kind(&name);
                items_into_domain(items, kind).map(|items| (name, items))
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(malformed("catalog"))?;
        Ok(ContentCategoryMap::from_categories(categories))
    }

    /// `GET /content/trending`.
    pub async fn trending(&self) -> Result<Trending, Error> {
        let dto: TrendingDto = self
            .fetch(ApiRequest::get("/content/trending"), "trending")
            .await?;
        Ok(Trending {
            movies: items_into_domain(dto.trending_movies, MediaKind::Movie)
                .map_err(malformed("trending"))?,
            series: items_into_domain(dto.trending_tv, MediaKind::Series)
                .map_err(malformed("trending"))?,
        })
    }

    /// `GET /content/popular`.
    pub async fn popular(&self) -> Result<Popular, Error> {
        let dto: PopularDto = self
            .fetch(ApiRequest::get("/content/popular"), "popular")
            .await?;
        Ok(Popular {
            movies: items_into_domain(dto.popular_movies, MediaKind::Movie)
                .map_err(malformed("popular"))?,
            series: items_into_domain(dto.popular_tv, MediaKind::Series)
                .map_err(malformed("popular"))?,
        })
    }

    /// `GET /content/search?q=&page=`. Callers validate the query.
    pub async fn search(&self, query: &str, page: u32) -> Result<SearchResults, Error> {
        let request = ApiRequest::get("/content/search")
            .with_query("q", query)
            .with_query("page", page.to_string());
        let dto: SearchDto = self.fetch(request, "search").await?;
        Ok(SearchResults {
            results: items_into_domain(dto.results, MediaKind::Movie)
                .map_err(malformed("search"))?,
            query: dto.query,
            page: dto.page,
        })
    }

    /// `GET /content/genres`.
    pub async fn genres(&self) -> Result<Genres, Error> {
        let dto: GenresDto = self
            .fetch(ApiRequest::get("/content/genres"), "genres")
            .await?;
        Ok(dto.genres)
    }

    /// `GET /content/genre/{id}?page=`.
    pub async fn by_genre(&self, genre_id: u32, page: u32) -> Result<GenreListing, Error> {
        let request = ApiRequest::get(format!("/content/genre/{genre_id}"))
            .with_query("page", page.to_string());
        let dto: GenreListingDto = self.fetch(request, "genre").await?;
        let movies = items_into_domain(dto.movies, MediaKind::Movie).map_err(malformed("genre"))?;
        let series =
            items_into_domain(dto.tv_shows, MediaKind::Series).map_err(malformed("genre"))?;
        let combined = movies.iter().chain(series.iter()).cloned().collect();
        Ok(GenreListing {
            movies,
            series,
            combined,
        })
    }

    /// `GET /content/movie/{id}`.
    pub async fn movie(&self, id: ContentId) -> Result<ContentItem, Error> {
        let dto: ContentItemDto = self
            .fetch(ApiRequest::get(format!("/content/movie/{id}")), "movie")
            .await?;
        dto.into_domain(MediaKind::Movie).map_err(malformed("movie"))
    }

    /// `GET /content/tv/{id}`.
    pub async fn series(&self, id: ContentId) -> Result<ContentItem, Error> {
        let dto: ContentItemDto = self
            .fetch(ApiRequest::get(format!("/content/tv/{id}")), "series")
            .await?;
        dto.into_domain(MediaKind::Series).map_err(malformed("series"))
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
