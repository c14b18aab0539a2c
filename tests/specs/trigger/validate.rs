//! Validate specs

use crate::prelude::*;

#[test]
fn valid_config_passes() {
    let temp = Project::with_config(&format!("{FIRING_SCRIPT}{QUIET_EXPRESSION}"));
    temp.strig()
        .args(&["validate"])
        .passes()
        .stdout_has("2 job(s) OK");
}

#[test]
fn non_numeric_exit_code_is_a_problem() {
    let temp = Project::with_config(
        r#"
[job.deploy.trigger]
type = "script"
spec = "* * * * *"
script = "true"
exit_code = "abc"
"#,
    );
    temp.strig()
        .args(&["validate"])
        .fails()
        .stdout_has("deploy: The given exit code must be a numeric value. The given value is 'abc'.");
}

#[test]
fn bad_schedule_is_a_problem() {
    let temp = Project::with_config(
        r#"
[job.report.trigger]
type = "expression"
spec = "61 * * * *"
expression = "true"
"#,
    );
    temp.strig()
        .args(&["validate"])
        .fails()
        .stdout_has("report: invalid schedule");
}

#[test]
fn json_report_lists_problems() {
    let temp = Project::with_config(
        r#"
[job.empty.trigger]
type = "expression"
spec = "* * * * *"
"#,
    );
    temp.strig()
        .args(&["-o", "json", "validate"])
        .fails()
        .stdout_has(r#""job": "empty""#)
        .stdout_has("nothing to evaluate");
}
