//! Treco - test report collector.
//!
//! `treco collect` ingests a single report file; `treco serve` starts the
//! Actix-web server accepting report uploads.

use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use treco::cli::{Cli, CliError, CollectArgs, Command, ServeArgs};
use treco::config::Config;
use treco::db::{DbPool, Storage};
use treco::{server, services};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Connect to the database and bring the schema up to date.
async fn connect(config: &Config) -> Result<DbPool, CliError> {
    let pool = DbPool::new(config).await?;
    info!("Database connection established");
    pool.run_migrations().await?;
    Ok(pool)
}

async fn collect(args: CollectArgs) -> Result<(), CliError> {
    let (params, report_file) = args.validate()?;

    let config = Config::from_env()?;
    let pool = connect(&config).await?;

    let file = File::open(&report_file).map_err(|source| CliError::ReportFile {
        path: report_file.clone(),
        source,
    })?;

    let outcome = services::ingest(&pool, &params, file).await?;
    info!(
        "results uploaded successfully: suite result {} (executed={}, passed={}, failed={}, skipped={}, features={})",
        outcome.suite_result_id,
        outcome.executed,
        outcome.passed,
        outcome.failed,
        outcome.skipped,
        outcome.features
    );
    Ok(())
}

async fn serve(args: ServeArgs) -> Result<(), CliError> {
    let mut config = match args.config {
        Some(path) => Config::from_env_file(&path)?,
        None => Config::from_env()?,
    };
    if let Some(port) = args.port {
        config.port = port;
    }

    info!("========================================");
    info!("  Treco test report collector");
    info!("  Version: {}", env!("CARGO_PKG_VERSION"));
    info!("========================================");

    let pool = connect(&config).await?;
    let storage: Arc<dyn Storage> = Arc::new(pool);

    server::run(config, storage).await?;
    Ok(())
}

#[actix_web::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Collect(args) => collect(args).await,
        Command::Serve(args) => serve(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
