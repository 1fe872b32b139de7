//! `HttpStatsSource` against a live upstream stand-in.

use std::net::TcpListener;
use std::sync::Arc;

use actix_web::http::header;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, test, web};
use serde_json::{Value, json};
use stats_proxy::{HttpStatsSource, StatsSource, StatsSourceError, build_app};
use url::Url;
use zeroize::Zeroizing;

const TOKEN: &str = "upstream-test-token";

async fn stats(req: HttpRequest) -> HttpResponse {
    let expected = format!("Bearer {TOKEN}");
    let authorised = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);
    if authorised {
        HttpResponse::Ok().json(json!({"servers": 12, "users": 3400}))
    } else {
        HttpResponse::Unauthorized().json(json!({"error": "bad token"}))
    }
}

async fn garbled() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("not json")
}

fn start_upstream() -> Url {
    let server = HttpServer::new(|| {
        App::new()
            .route("/bot/stats", web::get().to(stats))
            .route("/bot/garbled", web::get().to(garbled))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind upstream");
    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());
    Url::parse(&format!("http://{addr}/")).expect("valid origin")
}

fn source(url: Url, token: &str) -> HttpStatsSource {
    HttpStatsSource::new(url, Zeroizing::new(token.to_owned())).expect("client builds")
}

#[actix_rt::test]
async fn fetch_sends_configured_bearer_token() {
    let base = start_upstream();
    let body = source(base.join("bot/stats").expect("join"), TOKEN)
        .fetch()
        .await
        .expect("authorised");
    assert_eq!(body, json!({"servers": 12, "users": 3400}));
}

#[actix_rt::test]
async fn rejected_token_reports_status() {
    let base = start_upstream();
    let err = source(base.join("bot/stats").expect("join"), "wrong")
        .fetch()
        .await
        .expect_err("rejected");
    assert_eq!(err, StatsSourceError::Status { status: 401 });
}

#[actix_rt::test]
async fn non_json_body_is_decode_error() {
    let base = start_upstream();
    let err = source(base.join("bot/garbled").expect("join"), TOKEN)
        .fetch()
        .await
        .expect_err("not json");
    assert!(matches!(err, StatsSourceError::Decode { .. }));
}

#[actix_rt::test]
async fn refused_connection_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind spare port");
    let addr = listener.local_addr().expect("spare address");
    drop(listener);
    let url = Url::parse(&format!("http://{addr}/bot/stats")).expect("valid url");

    let err = source(url, TOKEN).fetch().await.expect_err("nothing listening");
    assert!(matches!(err, StatsSourceError::Transport { .. }));
}

#[actix_rt::test]
async fn proxy_route_relays_upstream_document() {
    let base = start_upstream();
    let upstream: Arc<dyn StatsSource> =
        Arc::new(source(base.join("bot/stats").expect("join"), TOKEN));
    let app = test::init_service(build_app(web::Data::from(upstream))).await;

    let response =
        test::call_service(&app, test::TestRequest::get().uri("/api/stats").to_request()).await;
    assert!(response.status().is_success());
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["users"], 3400);
}
