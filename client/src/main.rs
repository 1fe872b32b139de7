//! `marquee` entry-point: loads settings, restores the stored session and
//! runs one command against the remote API.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use client::cli::{Cli, CliError, run};
use client::config::ClientSettings;
use client::domain::AppContext;
use client::outbound::http::HttpApiGateway;
use client::outbound::storage::{DirKeyValueStore, KeyValueCredentialStore};

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    // Settings come from the environment and config files; the command line
    // belongs to clap.
    let settings = ClientSettings::load_from_iter([OsString::from("marquee")])
        .wrap_err("failed to load client settings")?;

    let credentials_dir = settings.credentials_dir();
    let store = DirKeyValueStore::open(&credentials_dir)
        .wrap_err_with(|| format!("failed to open credential directory {credentials_dir}"))?;
    let store = Arc::new(KeyValueCredentialStore::new(store));
    let gateway = HttpApiGateway::new(settings.gateway_config()?, Arc::clone(&store))
        .wrap_err("failed to build HTTP client")?;
    let context = AppContext::new(Arc::new(gateway), store);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build tokio runtime")?;

    let mut stdout = io::stdout().lock();
    let outcome = runtime.block_on(run(cli.command, &context, &mut stdout));
    context.dispose();
    stdout.flush()?;

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(CliError::Io(error)) => Err(error).wrap_err("failed to write output"),
        Err(error) => {
            writeln!(io::stderr(), "marquee: {error}")?;
            Ok(ExitCode::FAILURE)
        }
    }
}
