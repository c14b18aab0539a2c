// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests

use strig_core::{JobConfig, Settings};

/// Parse a single job from the body of its `[job.<name>]` tables
pub(crate) fn job(name: &str, body: &str) -> JobConfig {
    let toml = format!("[job.{name}]\n{body}\n");
    Settings::from_toml(&toml)
        .unwrap()
        .jobs
        .remove(name)
        .unwrap()
}

/// A script job that polls every minute
pub(crate) fn script_job(name: &str, trigger: &str) -> JobConfig {
    job(
        name,
        &format!("[job.{name}.trigger]\ntype = \"script\"\nspec = \"* * * * *\"\n{trigger}"),
    )
}

/// An expression job with the given trigger spec lines
pub(crate) fn expression_job(name: &str, trigger: &str) -> JobConfig {
    job(
        name,
        &format!("[job.{name}.trigger]\ntype = \"expression\"\n{trigger}"),
    )
}
