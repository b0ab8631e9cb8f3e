use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;
use vgc_harvest::config::{DbConfig, SqlScripts};
use vgc_harvest::pipeline;
use vgc_harvest::store::PgStore;
use vgc_harvest::VgcClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run aborted");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> vgc_harvest::Result<()> {
    let config = DbConfig::from_env()?;
    let client = VgcClient::new();

    // Harvest first so a scraping failure never touches the database.
    let tables = pipeline::harvest(&client).await?;

    let mut store = PgStore::connect(&config, SqlScripts::from_env()).await?;
    pipeline::load(&mut store, tables).await?;
    Ok(())
}
