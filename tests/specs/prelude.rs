//! Shared helpers for strig specs

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

pub use predicates::prelude::*;

/// Script trigger that always fires
pub const FIRING_SCRIPT: &str = r#"
[job.deploy.trigger]
type = "script"
spec = "* * * * *"
script = "echo checking"
"#;

/// Expression trigger that never fires
pub const QUIET_EXPRESSION: &str = r#"
[job.report.trigger]
type = "expression"
spec = "0 2 * * *"
expression = "false"
"#;

static BUILD: Once = Once::new();

/// Path to the strig binary, building it when the specs run on their own
fn strig_bin() -> PathBuf {
    let path = assert_cmd::cargo::cargo_bin("strig");
    if !path.exists() {
        BUILD.call_once(|| {
            let status = std::process::Command::new(env!("CARGO"))
                .args(["build", "--quiet", "-p", "strig", "--bin", "strig"])
                .status()
                .expect("cargo build");
            assert!(status.success(), "failed to build strig");
        });
    }
    path
}

/// A scratch directory holding a strig.toml and whatever else a spec needs
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    /// A project whose strig.toml holds `config`
    pub fn with_config(config: &str) -> Self {
        let project = Self::empty();
        project.file("strig.toml", config);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, content).expect("write file");
    }

    pub fn strig(&self) -> Strig {
        let mut cmd = Command::new(strig_bin());
        cmd.current_dir(self.dir.path()).env_remove("STRIG_LOG");
        Strig { cmd }
    }
}

/// A strig invocation under construction
pub struct Strig {
    cmd: Command,
}

impl Strig {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn passes(mut self) -> Outcome {
        let output = self.cmd.output().expect("run strig");
        let outcome = Outcome::from(output);
        assert!(
            outcome.success,
            "expected success\nstdout:\n{}\nstderr:\n{}",
            outcome.stdout, outcome.stderr
        );
        outcome
    }

    pub fn fails(mut self) -> Outcome {
        let output = self.cmd.output().expect("run strig");
        let outcome = Outcome::from(output);
        assert!(
            !outcome.success,
            "expected failure\nstdout:\n{}\nstderr:\n{}",
            outcome.stdout, outcome.stderr
        );
        outcome
    }
}

/// Captured result of a finished invocation
pub struct Outcome {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl From<std::process::Output> for Outcome {
    fn from(output: std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Outcome {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(
            predicate::str::contains(needle).eval(&self.stdout),
            "stdout missing {:?}:\n{}",
            needle,
            self.stdout
        );
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(
            !self.stdout.contains(needle),
            "stdout unexpectedly has {:?}:\n{}",
            needle,
            self.stdout
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(
            predicate::str::contains(needle).eval(&self.stderr),
            "stderr missing {:?}:\n{}",
            needle,
            self.stderr
        );
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        assert_eq!(self.stdout, expected);
        self
    }
}
