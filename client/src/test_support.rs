//! Test fixtures shared by the unit tests in `src/`.
//!
//! Payloads mirror what the remote API sends so services are exercised
//! through the same DTO decoding as production.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::{mpsc, oneshot};

use crate::domain::ports::{ApiGateway, ApiRequest};
use crate::domain::{
    AccessToken, ContentId, Error, Profile, Subscription, SubscriptionKind, User, UserId,
};

/// Fixed id of the demo account.
pub(crate) const DEMO_USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

/// Categories returned by the aggregate catalog fixture.
pub(crate) const CATALOG_CATEGORIES: [&str; 9] = [
    "trending",
    "now_playing",
    "popular_movies",
    "popular_series",
    "top_rated",
    "action",
    "comedy",
    "drama",
    "crime",
];

/// Server-shaped user payload with `my_list` as given.
pub(crate) fn user_json(my_list: &[u64]) -> Value {
    json!({
        "id": DEMO_USER_ID,
        "name": "Demo",
        "email": "demo@test.com",
        "avatar": "https://i.pravatar.cc/150?img=3",
        "subscription": {
            "type": "free_trial",
            "start_date": "2024-05-01T10:00:00",
            "end_date": "2024-05-31T10:00:00",
            "days_remaining": 30
        },
        "my_list": my_list,
        "watch_history": [],
        "profile": {"name": "Demo", "email": "demo@test.com", "language": "es", "country": "ES"},
        "created_at": "2024-05-01T10:00:00"
    })
}

/// Login or signup response for the demo account.
pub(crate) fn auth_json(token: &str, my_list: &[u64]) -> Value {
    json!({"access_token": token, "token_type": "bearer", "user": user_json(my_list)})
}

/// Server-shaped content item.
pub(crate) fn item_json(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "overview": "",
        "poster_path": format!("https://image.tmdb.org/t/p/w500/{id}.jpg"),
        "backdrop_path": null,
        "release_date": "2023-07-21",
        "vote_average": 7.2,
        "genre_ids": [28],
        "adult": false
    })
}

/// Aggregate catalog with nine categories of two items each.
pub(crate) fn catalog_json() -> Value {
    let mut catalog = serde_json::Map::new();
    for (index, name) in CATALOG_CATEGORIES.iter().enumerate() {
        let base = (index as u64) * 10;
        catalog.insert(
            (*name).to_owned(),
            json!([item_json(base + 1, name), item_json(base + 2, name)]),
        );
    }
    Value::Object(catalog)
}

/// Decoded demo user with the given saved ids.
pub(crate) fn demo_user(my_list: &[u64]) -> User {
    User {
        id: UserId::new(DEMO_USER_ID).expect("fixture id is a UUID"),
        name: "Demo".to_owned(),
        email: "demo@test.com".to_owned(),
        avatar: Some("https://i.pravatar.cc/150?img=3".to_owned()),
        subscription: Subscription {
            kind: SubscriptionKind::FreeTrial,
            days_remaining: 30,
            started_at: None,
            ends_at: None,
        },
        profile: Profile {
            language: "es".to_owned(),
            country: "ES".to_owned(),
        },
        watchlist_ids: my_list.iter().copied().map(ContentId::new).collect::<BTreeSet<_>>(),
    }
}

/// Token used by fixtures.
pub(crate) fn token() -> AccessToken {
    AccessToken::new("fixture-token")
}

/// A gateway call waiting for the test to answer it.
pub(crate) struct PendingCall {
    pub(crate) request: ApiRequest,
    respond: oneshot::Sender<Result<Value, Error>>,
}

impl PendingCall {
    /// Complete the call.
    pub(crate) fn respond(self, outcome: Result<Value, Error>) {
        // The caller may have been dropped; nothing to do then.
        let _ = self.respond.send(outcome);
    }
}

/// Gateway that hands each call to the test and waits for its answer, so
/// tests control the order in which responses arrive.
pub(crate) struct ScriptedGateway {
    calls: mpsc::UnboundedSender<PendingCall>,
}

impl ScriptedGateway {
    /// Create the gateway and the receiver of its pending calls.
    pub(crate) fn new() -> (Self, mpsc::UnboundedReceiver<PendingCall>) {
        let (calls, pending) = mpsc::unbounded_channel();
        (Self { calls }, pending)
    }
}

#[async_trait]
impl ApiGateway for ScriptedGateway {
    async fn call(&self, request: ApiRequest) -> Result<Value, Error> {
        let (respond, answer) = oneshot::channel();
        self.calls
            .send(PendingCall { request, respond })
            .map_err(|_| Error::network("script closed"))?;
        answer
            .await
            .map_err(|_| Error::network("call abandoned by script"))?
    }
}
