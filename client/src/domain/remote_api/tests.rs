//! Tests for the typed remote API.

use super::*;
use crate::domain::ErrorKind;
use crate::domain::ports::{HttpMethod, MockApiGateway};
use crate::test_support::{auth_json, catalog_json, item_json, user_json};
use rstest::rstest;
use serde_json::json;

fn api(gateway: MockApiGateway) -> RemoteApi<MockApiGateway> {
    RemoteApi::new(Arc::new(gateway))
}

#[tokio::test]
async fn login_posts_credentials_and_decodes_session() {
    let mut gateway = MockApiGateway::new();
    gateway
        .expect_call()
        .withf(|request| {
            request.method() == HttpMethod::Post
                && request.path() == "/auth/login"
                && request.body()
                    == Some(&json!({"email": "demo@test.com", "password": "Passw0rd1"}))
        })
        .times(1)
        .returning(|_| Ok(auth_json("tok-1", &[3])));

    let credentials =
        LoginCredentials::try_from_parts("demo@test.com", "Passw0rd1").expect("valid");
    let session = api(gateway).login(&credentials).await.expect("login decodes");
    assert_eq!(session.token.expose(), "tok-1");
    assert_eq!(session.user.email, "demo@test.com");
    assert!(session.user.watchlist_ids.contains(&ContentId::new(3)));
}

#[tokio::test]
async fn malformed_auth_payload_is_remote_error() {
    let mut gateway = MockApiGateway::new();
    gateway
        .expect_call()
        .times(1)
        .returning(|_| Ok(json!({"token": "missing-fields"})));

    let credentials =
        LoginCredentials::try_from_parts("demo@test.com", "Passw0rd1").expect("valid");
    let err = api(gateway)
        .login(&credentials)
        .await
        .expect_err("schema mismatch");
    assert_eq!(err.kind(), ErrorKind::Remote);
}

#[tokio::test]
async fn gateway_errors_pass_through_unchanged() {
    let mut gateway = MockApiGateway::new();
    gateway
        .expect_call()
        .times(1)
        .returning(|_| Err(Error::remote_status(401, "Invalid token")));

    let err = api(gateway).current_user().await.expect_err("rejected");
    assert_eq!(err, Error::remote_status(401, "Invalid token"));
}

#[tokio::test]
async fn catalog_keeps_server_category_order() {
    let mut gateway = MockApiGateway::new();
    gateway
        .expect_call()
        .withf(|request| request.path() == "/content/netflix")
        .times(1)
        .returning(|_| Ok(catalog_json()));

    let catalog = api(gateway).catalog().await.expect("catalog decodes");
    let names: Vec<_> = catalog.names().collect();
    assert_eq!(names, crate::test_support::CATALOG_CATEGORIES);
    let series = catalog.get("popular_series").expect("series category");
    assert!(series.iter().all(|item| item.media_kind == MediaKind::Series));
}

#[tokio::test]
async fn search_sends_query_and_page() {
    let mut gateway = MockApiGateway::new();
    gateway
        .expect_call()
        .withf(|request| request.target() == "/content/search?q=the+witcher&page=2")
        .times(1)
        .returning(|_| {
            Ok(json!({
                "results": [item_json(71912, "The Witcher")],
                "query": "the witcher",
                "page": 2
            }))
        });

    let results = api(gateway)
        .search("the witcher", 2)
        .await
        .expect("search decodes");
    assert_eq!(results.page, 2);
    assert_eq!(results.results.len(), 1);
}

#[tokio::test]
async fn genre_listing_combines_movies_then_series() {
    let mut gateway = MockApiGateway::new();
    gateway
        .expect_call()
        .withf(|request| request.target() == "/content/genre/18?page=1")
        .times(1)
        .returning(|_| {
            Ok(json!({
                "movies": [item_json(1, "Film")],
                "tv_shows": [{"id": 2, "name": "Show", "first_air_date": ""}],
                "combined": []
            }))
        });

    let listing = api(gateway).by_genre(18, 1).await.expect("genre decodes");
    let ids: Vec<_> = listing.combined.iter().map(|item| item.id.get()).collect();
    assert_eq!(ids, [1, 2]);
    assert_eq!(listing.series[0].media_kind, MediaKind::Series);
    assert_eq!(listing.series[0].release_date, None);
}

#[rstest]
#[case(WatchlistAction::Add, "add")]
#[case(WatchlistAction::Remove, "remove")]
#[tokio::test]
async fn watchlist_mutation_posts_action(
    #[case] action: WatchlistAction,
    #[case] expected: &'static str,
) {
    let mut gateway = MockApiGateway::new();
    gateway
        .expect_call()
        .withf(move |request| {
            request.path() == "/user/my-list"
                && request.body() == Some(&json!({"movie_id": 3, "action": expected}))
        })
        .times(1)
        .returning(|_| Ok(json!({"success": true, "message": "ok"})));

    api(gateway)
        .set_watchlist_membership(ContentId::new(3), action)
        .await
        .expect("mutation acknowledged");
}

#[tokio::test]
async fn unsuccessful_acknowledgement_is_remote_error() {
    let mut gateway = MockApiGateway::new();
    gateway
        .expect_call()
        .times(1)
        .returning(|_| Ok(json!({"success": false, "message": "Invalid action"})));

    let err = api(gateway)
        .set_watchlist_membership(ContentId::new(3), WatchlistAction::Add)
        .await
        .expect_err("negative ack");
    assert_eq!(err.kind(), ErrorKind::Remote);
    assert_eq!(err.message(), "Invalid action");
}

#[tokio::test]
async fn profile_update_sends_only_provided_fields() {
    let mut gateway = MockApiGateway::new();
    gateway
        .expect_call()
        .withf(|request| {
            request.method() == HttpMethod::Put
                && request.body() == Some(&json!({"language": "en"}))
        })
        .times(1)
        .returning(|_| {
            let mut user = user_json(&[]);
            user["profile"]["language"] = json!("en");
            Ok(user)
        });

    let user = api(gateway)
        .update_profile(&ProfileUpdate::default().language("en"))
        .await
        .expect("profile decodes");
    assert_eq!(user.profile.language, "en");
}

#[tokio::test]
async fn watch_history_decodes_entries_with_details() {
    let mut gateway = MockApiGateway::new();
    gateway
        .expect_call()
        .withf(|request| request.path() == "/user/watch-history")
        .times(1)
        .returning(|_| {
            Ok(json!({"history": [{
                "movie_id": 3,
                "progress": 40,
                "completed": false,
                "watched_at": "2024-05-02T21:15:00.5",
                "movie_details": item_json(3, "Three")
            }]}))
        });

    let history = api(gateway).watch_history().await.expect("history decodes");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].progress, 40);
    assert!(history[0].watched_at.is_some());
    assert_eq!(
        history[0].details.as_ref().map(|item| item.title.as_str()),
        Some("Three")
    );
}

#[tokio::test]
async fn genres_decode_numeric_keys() {
    let mut gateway = MockApiGateway::new();
    gateway
        .expect_call()
        .times(1)
        .returning(|_| Ok(json!({"genres": {"28": "Action", "35": "Comedy"}})));

    let genres = api(gateway).genres().await.expect("genres decode");
    assert_eq!(genres.get(&28).map(String::as_str), Some("Action"));
}
