// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `strig check` - Run one poll cycle for a job right now

use crate::output::{self, OutputFormat};
use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use strig_core::Parameters;
use strig_engine::{local_poller, CycleOutcome};
use strig_storage::read_log;

#[derive(Args)]
pub struct CheckArgs {
    /// Job to poll
    pub job: String,
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub job: String,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Poll log written by the cycle
    pub log: String,
}

impl CheckReport {
    fn new(job: &str, outcome: &CycleOutcome, log: String) -> Self {
        let result = outcome.result();
        Self {
            job: job.to_string(),
            outcome: outcome.name(),
            cause: result.cause.clone(),
            parameters: result.parameters().cloned(),
            description: result.description().map(str::to_string),
            error: match outcome {
                CycleOutcome::Failed(message) => Some(message.clone()),
                _ => None,
            },
            log,
        }
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.log)?;
        if !self.log.is_empty() && !self.log.ends_with('\n') {
            writeln!(f)?;
        }
        writeln!(f)?;
        writeln!(f, "{}: {}", self.job, self.outcome)?;
        if let Some(cause) = &self.cause {
            writeln!(f, "  cause: {}", cause)?;
        }
        if let Some(parameters) = &self.parameters {
            for (name, value) in parameters {
                writeln!(f, "  {}={}", name, value)?;
            }
        }
        if let Some(description) = &self.description {
            writeln!(f, "  description: {}", description)?;
        }
        Ok(())
    }
}

pub async fn handle(args: CheckArgs, config: &Path, format: OutputFormat) -> Result<()> {
    let settings = crate::settings::load(config)?;
    let job = Arc::new(crate::settings::job(&settings, &args.job)?.clone());
    if let Some(root) = &settings.controller.root {
        std::fs::create_dir_all(root)?;
    }

    let poller = local_poller(&settings);
    let cycle = poller.cycle_now(Arc::clone(&job));
    let outcome = poller.run(&cycle).await;
    tracing::debug!(job = %job.name, outcome = outcome.name(), "check finished");

    let path = poller
        .layout()
        .poll_log(&job.name, job.trigger.log_file_name());
    let log = read_log(&path)?.unwrap_or_default();
    let report = CheckReport::new(&job.name, &outcome, log);
    output::print(&report, format);

    if let CycleOutcome::Failed(message) = outcome {
        bail!("polling failed: {}", message);
    }
    Ok(())
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
