//! `brewsky` entry-point: loads settings, wires adapters and runs one command.

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use catalog::config::CatalogSettings;
use catalog::inbound::cli::{App, Cli};
use catalog::outbound::nominatim::{NominatimHttpIdentity, NominatimHttpSource};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use local_store::DirStore;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    // Settings come from BREWSKY_* variables and config files only; the
    // command line belongs to the subcommands.
    let settings = CatalogSettings::load_from_iter([OsString::from("brewsky")])
        .wrap_err("failed to load settings")?;

    let data_dir = settings.data_dir()?;
    let store = Arc::new(DirStore::open(&data_dir).wrap_err("failed to open profile directory")?);
    let geocoder = NominatimHttpSource::with_identity(
        settings.geocoder_url()?,
        settings.geocoder_timeout(),
        NominatimHttpIdentity {
            user_agent: settings.geocoder_user_agent().to_owned(),
        },
    )?;

    let mut app = App::new(
        &store,
        geocoder,
        Arc::new(DefaultClock),
        settings.proximity_matcher()?,
        settings.max_user_shops(),
    );
    let stdout = io::stdout();
    let mut out = stdout.lock();
    app.execute(cli.command, &mut out).await
}
