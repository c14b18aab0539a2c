//! Log specs

use crate::prelude::*;

#[test]
fn log_before_any_poll() {
    let temp = Project::with_config(FIRING_SCRIPT);
    temp.strig()
        .args(&["log", "deploy"])
        .passes()
        .stdout_has("No polling log for job deploy yet");
}

#[test]
fn log_shows_last_poll() {
    let temp = Project::with_config(FIRING_SCRIPT);
    temp.strig().args(&["check", "deploy"]).passes();

    temp.strig()
        .args(&["log", "deploy"])
        .passes()
        .stdout_has("Polling for the job deploy")
        .stdout_has("checking")
        .stdout_lacks("deploy: triggered");
}

#[test]
fn log_is_written_under_data_dir() {
    let temp = Project::with_config(&format!("[server]\ndata_dir = \"state\"\n{FIRING_SCRIPT}"));
    temp.strig().args(&["check", "deploy"]).passes();
    assert!(temp.path().join("state").is_dir());
}
