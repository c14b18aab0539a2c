//! CLI help specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    let temp = Project::empty();
    temp.strig()
        .args(&["--help"])
        .passes()
        .stdout_has("validate")
        .stdout_has("params")
        .stdout_has("check")
        .stdout_has("log");
}

#[test]
fn version_prints_name() {
    let temp = Project::empty();
    temp.strig().args(&["--version"]).passes().stdout_has("strig");
}
