// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `strig params` - Show the `@param` parameters a schedule yields at a time

use crate::output::{self, OutputFormat};
use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use clap::Args;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use strig_core::{find_parameters, CronSchedule, Parameters};

/// Accepted `--at` formats
const TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

#[derive(Args)]
pub struct ParamsArgs {
    /// Job whose schedule to read
    pub job: Option<String>,

    /// Schedule text to use instead of a job's
    #[arg(long, conflicts_with = "job")]
    pub spec: Option<String>,

    /// Local time to evaluate, e.g. "2024-01-07 10:00" (default: now)
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ParamsReport {
    pub at: String,
    pub matches: bool,
    pub parameters: Parameters,
}

impl fmt::Display for ParamsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.matches {
            return writeln!(f, "Schedule does not match {}", self.at);
        }
        if self.parameters.is_empty() {
            return writeln!(f, "No parameters at {}", self.at);
        }
        for (name, value) in &self.parameters {
            writeln!(f, "{}={}", name, value)?;
        }
        Ok(())
    }
}

pub fn handle(args: ParamsArgs, config: &Path, format: OutputFormat) -> Result<()> {
    let spec = match (args.spec, args.job) {
        (Some(spec), _) => spec,
        (None, Some(job)) => {
            let settings = crate::settings::load(config)?;
            crate::settings::job(&settings, &job)?.trigger.spec.clone()
        }
        (None, None) => bail!("pass a job name or --spec"),
    };
    let at = match args.at.as_deref() {
        Some(text) => parse_local_time(text)?,
        None => Local::now(),
    };

    let report = ParamsReport {
        at: at.format("%Y-%m-%d %H:%M").to_string(),
        matches: CronSchedule::parse(&spec)?.matches(&at),
        parameters: find_parameters(&spec, &at)?,
    };
    output::print(&report, format);
    Ok(())
}

fn parse_local_time(text: &str) -> Result<DateTime<Local>> {
    let naive = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text.trim(), fmt).ok())
        .ok_or_else(|| anyhow!("invalid time '{}': expected YYYY-MM-DD HH:MM", text))?;
    Local
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| anyhow!("'{}' is not a unique local time", text))
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
