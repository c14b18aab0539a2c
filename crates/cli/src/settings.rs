// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Settings loading for CLI commands

use crate::error::StrigError;
use anyhow::Result;
use std::path::Path;
use strig_core::{load_file, ConfigError, JobConfig, Settings};

/// Load settings, turning common failures into friendly errors
pub fn load(path: &Path) -> Result<Settings> {
    match load_file(path) {
        Ok(settings) => Ok(settings),
        Err(ConfigError::Io { source, .. }) => {
            Err(StrigError::config_unreadable(path).with_source(source).into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Look up a job by name
pub fn job<'a>(settings: &'a Settings, name: &str) -> Result<&'a JobConfig> {
    settings.job(name).map_err(|_| {
        StrigError::unknown_job(name, settings.jobs.keys().map(String::as_str)).into()
    })
}
