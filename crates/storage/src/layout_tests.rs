// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    plain = { "nightly", "nightly" },
    dashes = { "build-and-test_2", "build-and-test_2" },
    folder = { "team/app", "team_app" },
    spaces = { "my job", "my_job" },
    parent = { "..", "_.." },
    empty = { "", "_" },
)]
fn job_dirs_are_sanitized(job: &str, dir: &str) {
    let layout = DataLayout::new("/data");
    assert_eq!(layout.job_dir(job), Path::new("/data/jobs").join(dir));
}

#[test]
fn poll_log_lives_in_job_dir() {
    let layout = DataLayout::new("/data");
    assert_eq!(
        layout.poll_log("nightly", "scriptTrigger-polling.log"),
        PathBuf::from("/data/jobs/nightly/scriptTrigger-polling.log")
    );
}
