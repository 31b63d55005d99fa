use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use cyberqr::cli::{Cli, Command};
use cyberqr::config::Config;
use cyberqr::logging::init_tracing;
use cyberqr::progression::{ScanOutcome, User};
use cyberqr::report::{JsonlReportStore, ReportServer};
use cyberqr::session;
use cyberqr::store::StoreSettings;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.load_config().context("failed to load config")?;
    config.validate().context("invalid config")?;

    match cli.command {
        Command::Serve { bind, reports } => serve(config, bind, reports).await,
        Command::Session { scans, name } => run_session(&config, name, &scans),
    }
}

async fn serve(
    mut config: Config,
    bind: Option<String>,
    reports: Option<std::path::PathBuf>,
) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind_addr = bind;
    }
    if let Some(path) = reports {
        config.reports.path = path;
    }

    let store = JsonlReportStore::new(&config.reports.path);
    tracing::info!(path = %store.path().display(), "Persisting reports");

    let mut server = ReportServer::new(Arc::new(store));
    server.bind(&config.server.bind_addr).await?;
    server.run().await?;
    Ok(())
}

fn run_session(config: &Config, name: String, scans: &[ScanOutcome]) -> Result<()> {
    let mut user = User::guest();
    user.display_name = name;

    let snapshot = session::replay(user, StoreSettings::from(config), scans, Utc::now())?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
