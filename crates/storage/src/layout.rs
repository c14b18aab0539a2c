// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data directory layout
//!
//! ```text
//! <data_dir>/
//!   jobs/<job>/scriptTrigger-polling.log
//!   jobs/<job>/groovyScriptTrigger-polling.log
//! ```

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a job's files. Characters that are unsafe in a
    /// path component are replaced with `_`.
    pub fn job_dir(&self, job: &str) -> PathBuf {
        let safe: String = job
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let safe = match safe.as_str() {
            "" | "." | ".." => format!("_{safe}"),
            _ => safe,
        };
        self.root.join("jobs").join(safe)
    }

    pub fn poll_log(&self, job: &str, file_name: &str) -> PathBuf {
        self.job_dir(job).join(file_name)
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
