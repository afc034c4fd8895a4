//! Command line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ConfigError;
use crate::error::{AppError, IngestError};
use crate::models::run_params::names;
use crate::models::{ParamError, RawRunParams, RunParams};

#[derive(Parser, Debug)]
#[command(
    name = "treco",
    version,
    about = "Collects test reports and stores per-run test results"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ingest a report file once and exit
    Collect(CollectArgs),
    /// Run the HTTP server accepting report uploads
    Serve(ServeArgs),
}

/// Flags of `treco collect`. Every flag falls back to its environment variable.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct CollectArgs {
    /// CI build name or number to uniquely identify the build
    #[arg(short = 'b', long, env = "CI_JOB_ID")]
    pub build: Option<String>,

    /// Environment on which the build is executed
    #[arg(short = 'e', long, env = "ENVIRONMENT")]
    pub environment: Option<String>,

    /// Jira project name
    #[arg(short = 'j', long, env = "JIRA_PROJECT")]
    pub jira: Option<String>,

    /// Input file containing test reports
    #[arg(short = 'r', long = "report", env = "REPORT_FILE")]
    pub report_file: Option<PathBuf>,

    /// Format of the report file
    #[arg(short = 'f', long = "format", env = "REPORT_FORMAT")]
    pub report_format: Option<String>,

    /// Service name
    #[arg(short = 's', long, env = "SERVICE_NAME")]
    pub service: Option<String>,

    /// Type of tests executed: unit, contract, integration or e2e
    #[arg(short = 't', long = "type", env = "TEST_TYPE")]
    pub test_type: Option<String>,

    /// Statement level code coverage
    #[arg(short = 'c', long, env = "COVERAGE")]
    pub coverage: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Server port (overrides TRECO_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Env-file to load before reading the environment
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl CollectArgs {
    /// Check that every required flag is present and valid.
    pub fn validate(&self) -> Result<(RunParams, PathBuf), CliError> {
        tracing::info!("validating parameters");

        let report_file = self
            .report_file
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(CliError::MissingArguments)?;

        let raw = RawRunParams {
            build: self.build.clone(),
            environment: self.environment.clone(),
            jira: self.jira.clone(),
            report_format: self.report_format.clone(),
            service: self.service.clone(),
            test_type: self.test_type.clone(),
            coverage: self.coverage.clone(),
        };
        if !raw.missing().is_empty() {
            return Err(CliError::MissingArguments);
        }

        Ok((raw.validate()?, report_file))
    }
}

fn collect_env_vars() -> String {
    let mut vars = names::REQUIRED.to_vec();
    vars.insert(3, names::REPORT_FILE);
    vars.join(", ")
}

/// Errors ending a CLI run.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(
        "missing arguments, please run `treco --help` for more info\n\
         you can also supply arguments via following environment variables: {}",
        collect_env_vars()
    )]
    MissingArguments,

    #[error(transparent)]
    Params(#[from] ParamError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("unable to open report file {path}: {source}")]
    ReportFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}
