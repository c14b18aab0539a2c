// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! strig - script and expression polling triggers

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod error;
mod output;
mod settings;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, log, params, validate};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::error::StrigError;
use crate::output::OutputFormat;

/// Filter used when STRIG_LOG is not set
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser)]
#[command(
    name = "strig",
    version,
    about = "strig - Poll scripts and expressions to trigger builds"
)]
struct Cli {
    /// Settings file
    #[arg(long, short, global = true, default_value = "strig.toml")]
    config: PathBuf,

    /// Output format
    #[arg(long, short, global = true, value_enum, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every trigger in the settings file
    Validate,
    /// Show the parameters a schedule yields at a given time
    Params(params::ParamsArgs),
    /// Run one poll cycle for a job now
    Check(check::CheckArgs),
    /// Show the last poll log of a job
    Log(log::LogArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<StrigError>() {
                Some(friendly) => eprint!("{}", friendly),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Validate => validate::handle(&cli.config, cli.output),
        Commands::Params(args) => params::handle(args, &cli.config, cli.output),
        Commands::Check(args) => check::handle(args, &cli.config, cli.output).await,
        Commands::Log(args) => log::handle(args, &cli.config),
    }
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("STRIG_LOG")
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
