// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `strig validate` - Check every trigger in the settings file

use crate::output::{self, OutputFormat};
use anyhow::{bail, Result};
use serde::Serialize;
use std::fmt;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct Problem {
    pub job: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub config: String,
    pub jobs: usize,
    pub problems: Vec<Problem>,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.problems.is_empty() {
            return writeln!(f, "{}: {} job(s) OK", self.config, self.jobs);
        }
        for problem in &self.problems {
            writeln!(f, "{}: {}", problem.job, problem.message)?;
        }
        Ok(())
    }
}

pub fn handle(config: &Path, format: OutputFormat) -> Result<()> {
    let settings = crate::settings::load(config)?;
    let report = ValidationReport {
        config: config.display().to_string(),
        jobs: settings.jobs.len(),
        problems: settings
            .validate()
            .into_iter()
            .map(|(job, e)| Problem {
                job,
                message: e.to_string(),
            })
            .collect(),
    };

    output::print(&report, format);
    if !report.problems.is_empty() {
        bail!("{} problem(s) found", report.problems.len());
    }
    Ok(())
}
