//! Gateway behaviour against a live HTTP server.

#[path = "support/fake_backend.rs"]
mod fake_backend;

use std::net::TcpListener;
use std::sync::Arc;

use client::domain::ports::{ApiGateway, ApiRequest, CredentialStore};
use client::domain::{ErrorKind, GENERIC_REMOTE_MESSAGE, LoginCredentials, RemoteApi};
use client::outbound::http::{HttpApiGateway, HttpGatewayConfig};
use client::outbound::storage::{KeyValueCredentialStore, MemoryKeyValueStore};
use fake_backend::{DEMO_EMAIL, DEMO_PASSWORD, FakeBackend};
use serde_json::Value;
use url::Url;

type Store = KeyValueCredentialStore<MemoryKeyValueStore>;

fn gateway(base_url: Url) -> (Arc<HttpApiGateway<Store>>, Arc<Store>) {
    let store = Arc::new(KeyValueCredentialStore::new(MemoryKeyValueStore::default()));
    let gateway = HttpApiGateway::new(HttpGatewayConfig::new(base_url), Arc::clone(&store))
        .expect("client builds");
    (Arc::new(gateway), store)
}

#[actix_rt::test]
async fn stored_token_is_sent_as_bearer() {
    let backend = FakeBackend::start().await;
    let (gateway, store) = gateway(backend.base_url());

    let credentials =
        LoginCredentials::try_from_parts(DEMO_EMAIL, DEMO_PASSWORD).expect("valid credentials");
    let session = RemoteApi::new(Arc::clone(&gateway))
        .login(&credentials)
        .await
        .expect("login succeeds");
    store
        .save(&session.token, &session.user)
        .expect("store credential");

    let me = gateway
        .call(ApiRequest::get("/auth/me"))
        .await
        .expect("token accepted");
    assert_eq!(me["email"], DEMO_EMAIL);

    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].path, "/api/auth/login");
    assert_eq!(calls[0].authorization, None);
    assert_eq!(
        calls[1].authorization.as_deref(),
        Some(format!("Bearer {}", session.token.expose()).as_str())
    );
}

#[actix_rt::test]
async fn rejected_request_surfaces_server_detail() {
    let backend = FakeBackend::start().await;
    let (gateway, _store) = gateway(backend.base_url());

    let err = gateway
        .call(ApiRequest::get("/auth/me"))
        .await
        .expect_err("no token");
    assert_eq!(err.kind(), ErrorKind::Remote);
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.message(), "Could not validate credentials");
}

#[actix_rt::test]
async fn error_without_detail_uses_generic_message() {
    let backend = FakeBackend::start().await;
    let (gateway, _store) = gateway(backend.base_url());

    let err = gateway
        .call(ApiRequest::get("/edge/html-error"))
        .await
        .expect_err("bad gateway");
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.message(), GENERIC_REMOTE_MESSAGE);
}

#[actix_rt::test]
async fn empty_success_body_decodes_as_null() {
    let backend = FakeBackend::start().await;
    let (gateway, _store) = gateway(backend.base_url());

    let body = gateway
        .call(ApiRequest::get("/edge/empty"))
        .await
        .expect("no content is success");
    assert_eq!(body, Value::Null);
}

#[actix_rt::test]
async fn non_json_success_body_is_remote_error() {
    let backend = FakeBackend::start().await;
    let (gateway, _store) = gateway(backend.base_url());

    let err = gateway
        .call(ApiRequest::get("/edge/text"))
        .await
        .expect_err("not json");
    assert_eq!(err.kind(), ErrorKind::Remote);
    assert_eq!(err.status(), None);
}

#[actix_rt::test]
async fn query_parameters_are_encoded() {
    let backend = FakeBackend::start().await;
    let (gateway, _store) = gateway(backend.base_url());

    gateway
        .call(
            ApiRequest::get("/content/search")
                .with_query("q", "the witcher")
                .with_query("page", "2"),
        )
        .await
        .expect("search succeeds");
    let calls = backend.calls();
    assert_eq!(calls[0].query, "q=the+witcher&page=2");
}

#[actix_rt::test]
async fn refused_connection_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind spare port");
    let addr = listener.local_addr().expect("spare address");
    drop(listener);
    let base = Url::parse(&format!("http://{addr}")).expect("valid origin");
    let (gateway, _store) = gateway(base);

    let err = gateway
        .call(ApiRequest::get("/auth/me"))
        .await
        .expect_err("nothing listening");
    assert_eq!(err.kind(), ErrorKind::Network);
}
