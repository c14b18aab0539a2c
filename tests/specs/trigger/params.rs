//! Params specs
//!
//! Verify `@param` annotations are attached to the matching schedule line.

use crate::prelude::*;

const ANNOTATED: &str = "#@param TARGET nightly\n#@param CLEAN\n0 2 * * *\n#@param TARGET hourly\n0 * * * *";

#[test]
fn first_matching_line_wins() {
    let temp = Project::empty();
    temp.strig()
        .args(&["params", "--spec", ANNOTATED, "--at", "2024-01-07 02:00"])
        .passes()
        .stdout_eq("CLEAN=\nTARGET=nightly\n");
}

#[test]
fn later_line_has_its_own_parameters() {
    let temp = Project::empty();
    temp.strig()
        .args(&["params", "--spec", ANNOTATED, "--at", "2024-01-07 05:00"])
        .passes()
        .stdout_eq("TARGET=hourly\n");
}

#[test]
fn no_matching_line() {
    let temp = Project::empty();
    temp.strig()
        .args(&["params", "--spec", ANNOTATED, "--at", "2024-01-07 05:30"])
        .passes()
        .stdout_has("Schedule does not match 2024-01-07 05:30");
}

#[test]
fn reads_schedule_from_job() {
    let temp = Project::with_config(
        r#"
[job.deploy.trigger]
type = "script"
spec = """
#@param ENV prod
30 6 * * *
"""
script = "true"
"#,
    );
    temp.strig()
        .args(&["params", "deploy", "--at", "2024-03-01T06:30"])
        .passes()
        .stdout_eq("ENV=prod\n");
}

#[test]
fn job_and_spec_conflict() {
    let temp = Project::with_config(FIRING_SCRIPT);
    temp.strig()
        .args(&["params", "deploy", "--spec", "* * * * *"])
        .fails();
}

#[test]
fn invalid_time_is_rejected() {
    let temp = Project::empty();
    temp.strig()
        .args(&["params", "--spec", "* * * * *", "--at", "noon"])
        .fails()
        .stderr_has("invalid time 'noon'");
}
