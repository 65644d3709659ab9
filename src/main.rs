use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod utils;

#[derive(Parser)]
#[command(name = "accounts", version)]
#[command(about = "Validate, redact and describe user records", long_about = None)]
struct Cli {
  /// Log level directive, e.g. `debug` or `accounts_model=debug`
  #[arg(long, env = "ACCOUNTS_LOG_LEVEL", default_value = "info", global = true)]
  log_level: String,

  /// Pretty-print JSON output
  #[arg(long, env = "ACCOUNTS_PRETTY", global = true)]
  pretty: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Check user records and report every offending field
  Validate {
    /// JSON file holding one record or an array of records, `-` for stdin
    #[arg(default_value = "-")]
    input: PathBuf,
  },
  /// Print user records with their passwords removed, one per line
  Redact {
    /// JSON file holding one record or an array of records, `-` for stdin
    #[arg(default_value = "-")]
    input: PathBuf,
  },
  /// Print the OpenAPI description of the user shapes
  Schema,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
  dotenvy::dotenv().ok();

  let cli = Cli::parse();

  let env_filter = EnvFilter::from_default_env().add_directive(cli.log_level.parse()?);

  // stdout carries the records, logs go to stderr
  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_writer(std::io::stderr)
    .init();

  let res = match cli.command {
    Commands::Validate { input } => {
      let text = utils::read_input(&input).await?;
      commands::validate(&text, cli.pretty)
    },
    Commands::Redact { input } => {
      let text = utils::read_input(&input).await?;
      commands::redact(&text, cli.pretty)
    },
    Commands::Schema => commands::schema(cli.pretty),
  };

  match res {
    Ok(outcome) => {
      for line in &outcome.lines {
        println!("{line}");
      }
      if outcome.failed > 0 {
        info!(failed = outcome.failed, "some records were rejected");
        return Ok(ExitCode::FAILURE);
      }
      Ok(ExitCode::SUCCESS)
    },
    Err(err) => {
      error!("Command failed: {:?}", err);
      Ok(ExitCode::FAILURE)
    },
  }
}
