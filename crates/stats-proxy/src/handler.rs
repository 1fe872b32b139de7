//! HTTP surface: the `/api/stats` route and application wiring.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpResponse, get, web};
use serde_json::json;
use tracing::{error, warn};

use crate::source::{StatsSource, StatsSourceError};

/// Forward the upstream statistics document.
///
/// Upstream rejections map to `500 {"error": "failed to fetch statistics"}`;
/// every other failure maps to `500 {"error": "server error", "details": …}`.
#[get("/api/stats")]
pub async fn stats(source: web::Data<dyn StatsSource>) -> HttpResponse {
    match source.fetch().await {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(StatsSourceError::Status { status }) => {
            warn!(status, "upstream rejected statistics request");
            HttpResponse::InternalServerError()
                .json(json!({"error": "failed to fetch statistics"}))
        }
        Err(
            StatsSourceError::Transport { message: details }
            | StatsSourceError::Decode { message: details },
        ) => {
            error!(error = %details, "statistics request failed");
            HttpResponse::InternalServerError()
                .json(json!({"error": "server error", "details": details}))
        }
    }
}

/// Build the proxy application around `source`.
///
/// Responses allow any origin so browser front-ends can call the proxy
/// directly.
pub fn build_app(
    source: web::Data<dyn StatsSource>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(source)
        .wrap(DefaultHeaders::new().add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")))
        .service(stats)
}
