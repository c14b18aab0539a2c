//! Check specs
//!
//! Verify a single poll cycle end to end on the local controller.

use crate::prelude::*;

#[test]
fn script_with_expected_exit_code_triggers() {
    let temp = Project::with_config(FIRING_SCRIPT);
    temp.strig()
        .args(&["check", "deploy"])
        .passes()
        .stdout_has("Polling for the job deploy")
        .stdout_has("The exit code is '0'.")
        .stdout_has("Changes found. Scheduling a build.")
        .stdout_has("deploy: triggered")
        .stdout_has("cause: The execution script returns the expected exit code");
}

#[test]
fn script_with_other_exit_code_does_not_trigger() {
    let temp = Project::with_config(
        r#"
[job.deploy.trigger]
type = "script"
spec = "* * * * *"
script = "exit 1"
exit_code = "0"
"#,
    );
    temp.strig()
        .args(&["check", "deploy"])
        .passes()
        .stdout_has("The exit code is '1'.")
        .stdout_has("No changes.")
        .stdout_has("deploy: not_triggered");
}

#[test]
fn cause_directive_in_output_overrides_default() {
    let temp = Project::with_config(
        r#"
[job.deploy.trigger]
type = "script"
spec = "* * * * *"
# printf assembles the tag at run time
script = "printf '<%s>new commits</%s>\\n' cause cause"
"#,
    );
    temp.strig()
        .args(&["check", "deploy"])
        .passes()
        .stdout_has("cause: new commits");
}

#[test]
fn false_expression_does_not_trigger() {
    let temp = Project::with_config(QUIET_EXPRESSION);
    temp.strig()
        .args(&["check", "report"])
        .passes()
        .stdout_has("Evaluating the expression")
        .stdout_has("report: not_triggered");
}

#[test]
fn missing_script_file_fails_the_cycle() {
    let temp = Project::with_config(
        r#"
[job.deploy.trigger]
type = "script"
spec = "* * * * *"
script_file_path = "/nonexistent/poll.sh"
"#,
    );
    temp.strig()
        .args(&["check", "deploy"])
        .fails()
        .stdout_has("The script file path '/nonexistent/poll.sh' doesn't exist.")
        .stdout_has("deploy: failed");
}

#[test]
fn json_output_reports_outcome() {
    let temp = Project::with_config(FIRING_SCRIPT);
    temp.strig()
        .args(&["check", "deploy", "--output", "json"])
        .passes()
        .stdout_has(r#""outcome": "triggered""#);
}
