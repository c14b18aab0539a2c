//! CLI error specs
//!
//! Verify failures explain themselves.

use crate::prelude::*;

#[test]
fn missing_config_suggests_flag() {
    let temp = Project::empty();
    temp.strig()
        .args(&["validate"])
        .fails()
        .stderr_has("Cannot read settings file 'strig.toml'")
        .stderr_has("strig --config <path>");
}

#[test]
fn unknown_job_lists_configured_jobs() {
    let temp = Project::with_config(FIRING_SCRIPT);
    temp.strig()
        .args(&["check", "deplyo"])
        .fails()
        .stderr_has("Job 'deplyo' not found")
        .stderr_has("Configured jobs: deploy");
}

#[test]
fn malformed_config_is_reported() {
    let temp = Project::with_config("[job.deploy.trigger\n");
    temp.strig()
        .args(&["validate"])
        .fails()
        .stderr_has("TOML parse error");
}

#[test]
fn unknown_command_fails() {
    let temp = Project::empty();
    temp.strig().args(&["frobnicate"]).fails();
}
