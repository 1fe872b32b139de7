//! `stats-proxy` entry-point.

use std::sync::Arc;

use actix_web::{HttpServer, web};
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use stats_proxy::config::ProxySettings;
use stats_proxy::{HttpStatsSource, StatsSource, build_app};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ProxySettings::load_from_iter(std::env::args_os().take(1))
        .wrap_err("failed to load proxy settings")?;
    let source = HttpStatsSource::new(settings.upstream_url()?, settings.upstream_token()?)
        .wrap_err("failed to build HTTP client")?;
    let source: Arc<dyn StatsSource> = Arc::new(source);
    let source = web::Data::from(source);

    let bind_addr = settings.bind_addr();
    let server = HttpServer::new(move || build_app(source.clone()))
        .bind(bind_addr)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "stats proxy listening");
    server.run().await.wrap_err("server terminated")?;
    Ok(())
}
