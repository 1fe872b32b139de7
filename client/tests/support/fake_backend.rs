//! In-process stand-in for the remote streaming API.
//!
//! Serves the subset of `/api/...` routes the client calls from a real
//! socket on `127.0.0.1`, so tests exercise the reqwest gateway end to end.
//! Every request is recorded before routing.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::collections::{BTreeSet, HashSet};
use std::net::SocketAddr;
use std::sync::Mutex;

use actix_web::dev::{Service, ServiceRequest};
use actix_web::http::header;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

/// Email accepted by the login route.
pub const DEMO_EMAIL: &str = "demo@test.com";
/// Password accepted by the login route.
pub const DEMO_PASSWORD: &str = "Passw0rd1";

const CATEGORIES: [&str; 9] = [
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

/// Request as seen by the fake backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
}

#[derive(Debug, Default)]
struct Inner {
    my_list: BTreeSet<u64>,
    tokens: HashSet<String>,
    issued: u32,
    fail_my_list_updates: bool,
    calls: Vec<RecordedCall>,
}

/// Shared backend state.
#[derive(Debug, Default)]
pub struct BackendState {
    inner: Mutex<Inner>,
}

impl BackendState {
    fn with<T>(&self, f: impl FnOnce(&mut Inner) -> T) -> T {
        let mut inner = self.inner.lock().expect("backend state lock");
        f(&mut inner)
    }

    fn record(&self, req: &ServiceRequest) {
        let call = RecordedCall {
            method: req.method().to_string(),
            path: req.path().to_owned(),
            query: req.query_string().to_owned(),
            authorization: req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned),
        };
        self.with(|inner| inner.calls.push(call));
    }

    fn issue_token(&self) -> String {
        self.with(|inner| {
            inner.issued += 1;
            let token = format!("token-{}", inner.issued);
            inner.tokens.insert(token.clone());
            token
        })
    }

    fn authorised(&self, req: &HttpRequest) -> bool {
        let Some(token) = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
        else {
            return false;
        };
        self.with(|inner| inner.tokens.contains(token))
    }

    fn user(&self, name: &str) -> Value {
        let my_list: Vec<u64> = self.with(|inner| inner.my_list.iter().copied().collect());
        user_json(name, &my_list)
    }
}

/// Running fake backend.
pub struct FakeBackend {
    state: web::Data<BackendState>,
    addr: SocketAddr,
}

impl FakeBackend {
    /// Bind an ephemeral port and serve until the test runtime stops.
    pub async fn start() -> Self {
        let state = web::Data::new(BackendState::default());
        let app_state = state.clone();
        let server = HttpServer::new(move || {
            let recorder = app_state.clone();
            App::new()
                .app_data(app_state.clone())
                .wrap_fn(move |req, srv| {
                    recorder.record(&req);
                    srv.call(req)
                })
                .service(
                    web::scope("/api")
                        .route("/auth/login", web::post().to(login))
                        .route("/auth/signup", web::post().to(signup))
                        .route("/auth/me", web::get().to(me))
                        .route("/content/netflix", web::get().to(catalog))
                        .route("/content/search", web::get().to(search))
                        .route("/user/my-list", web::get().to(my_list))
                        .route("/user/my-list", web::post().to(update_my_list))
                        .route("/edge/empty", web::get().to(empty))
                        .route("/edge/text", web::get().to(text))
                        .route("/edge/html-error", web::get().to(html_error)),
                )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind fake backend");
        let addr = server.addrs()[0];
        actix_rt::spawn(server.run());
        Self { state, addr }
    }

    /// Origin to configure the client with.
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("valid origin")
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.with(|inner| inner.calls.clone())
    }

    /// Saved ids as the server sees them.
    pub fn my_list(&self) -> BTreeSet<u64> {
        self.state.with(|inner| inner.my_list.clone())
    }

    /// Answer watchlist updates with a server error.
    pub fn fail_my_list_updates(&self) {
        self.state.with(|inner| inner.fail_my_list_updates = true);
    }

    /// Invalidate every issued token.
    pub fn revoke_tokens(&self) {
        self.state.with(|inner| inner.tokens.clear());
    }
}

fn user_json(name: &str, my_list: &[u64]) -> Value {
    json!({
        "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        "name": name,
        "email": DEMO_EMAIL,
        "avatar": null,
        "subscription": {
            "type": "free_trial",
            "start_date": "2024-05-01T10:00:00",
            "end_date": "2024-05-31T10:00:00",
            "days_remaining": 30
        },
        "my_list": my_list,
        "watch_history": [],
        "profile": {"name": name, "email": DEMO_EMAIL, "language": "es", "country": "ES"},
        "created_at": "2024-05-01T10:00:00"
    })
}

fn item_json(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "overview": "",
        "poster_path": null,
        "backdrop_path": null,
        "release_date": "2023-07-21",
        "vote_average": 7.2,
        "genre_ids": [28],
        "adult": false
    })
}

fn detail(status: actix_web::http::StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({"detail": message}))
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(state: web::Data<BackendState>, body: web::Json<LoginBody>) -> HttpResponse {
    if body.email != DEMO_EMAIL || body.password != DEMO_PASSWORD {
        return detail(
            actix_web::http::StatusCode::UNAUTHORIZED,
            "Incorrect email or password",
        );
    }
    let token = state.issue_token();
    HttpResponse::Ok().json(json!({
        "access_token": token,
        "token_type": "bearer",
        "user": state.user("Demo"),
    }))
}

#[derive(Debug, Deserialize)]
struct SignupBody {
    name: String,
}

async fn signup(state: web::Data<BackendState>, body: web::Json<SignupBody>) -> HttpResponse {
    let token = state.issue_token();
    HttpResponse::Ok().json(json!({
        "access_token": token,
        "token_type": "bearer",
        "user": state.user(&body.name),
    }))
}

async fn me(state: web::Data<BackendState>, req: HttpRequest) -> HttpResponse {
    if !state.authorised(&req) {
        return detail(
            actix_web::http::StatusCode::UNAUTHORIZED,
            "Could not validate credentials",
        );
    }
    HttpResponse::Ok().json(state.user("Demo"))
}

async fn catalog() -> HttpResponse {
    let mut body = serde_json::Map::new();
    for (index, name) in CATEGORIES.iter().enumerate() {
        let base = (index as u64) * 10;
        body.insert(
            (*name).to_owned(),
            json!([item_json(base + 1, name), item_json(base + 2, name)]),
        );
    }
    HttpResponse::Ok().json(Value::Object(body))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: String,
    page: u32,
}

async fn search(params: web::Query<SearchParams>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "results": [item_json(71912, "The Witcher")],
        "query": params.q,
        "page": params.page,
    }))
}

async fn my_list(state: web::Data<BackendState>) -> HttpResponse {
    let ids: Vec<u64> = state.with(|inner| inner.my_list.iter().copied().collect());
    let movies: Vec<Value> = ids.iter().map(|id| item_json(*id, "Saved")).collect();
    HttpResponse::Ok().json(json!({"movies": movies}))
}

#[derive(Debug, Deserialize)]
struct MyListBody {
    movie_id: u64,
    action: String,
}

async fn update_my_list(
    state: web::Data<BackendState>,
    body: web::Json<MyListBody>,
) -> HttpResponse {
    let outcome = state.with(|inner| {
        if inner.fail_my_list_updates {
            return None;
        }
        match body.action.as_str() {
            "add" => inner.my_list.insert(body.movie_id),
            _ => inner.my_list.remove(&body.movie_id),
        };
        Some(())
    });
    match outcome {
        Some(()) => HttpResponse::Ok().json(json!({"success": true, "message": "ok"})),
        None => detail(
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            "Internal error",
        ),
    }
}

async fn empty() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

async fn text() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("not json")
}

async fn html_error() -> HttpResponse {
    HttpResponse::BadGateway()
        .content_type("text/html")
        .body("<html>bad gateway</html>")
}
