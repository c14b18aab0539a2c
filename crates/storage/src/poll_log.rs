// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-trigger poll log
//!
//! Each cycle truncates the log, brackets its narration between
//! "Polling started on …" and "Polling complete. Took …", and closes the
//! file when the cycle ends. The file is what `<cause>` and `<description>`
//! directives are scraped from.

use crate::StorageError;
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// Open poll log for one cycle
pub struct PollLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl PollLog {
    /// Create (or truncate) the log and write the start marker
    pub fn begin(path: &Path, started_at: DateTime<Local>) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(StorageError::io(parent))?;
        }
        let file = File::create(path).map_err(StorageError::io(path))?;
        let log = Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        };
        log.info(&format!(
            "Polling started on {}",
            started_at.format("%b %-d, %Y %-I:%M:%S %p")
        ));
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn info(&self, message: &str) {
        self.write_line(message);
    }

    pub fn error(&self, message: &str) {
        self.write_line(&format!("ERROR: {message}"));
    }

    /// Raw process or evaluation output
    pub fn output(&self, line: &str) {
        self.write_line(line);
    }

    /// Everything written so far
    pub fn contents(&self) -> Result<String, StorageError> {
        // Holding the lock keeps writers out while reading
        let _file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        fs::read_to_string(&self.path).map_err(StorageError::io(&self.path))
    }

    /// Write the completion marker and close the log
    pub fn finish(self, elapsed: Duration) {
        self.info(&format!("Polling complete. Took {}.", format_time_span(elapsed)));
    }

    fn write_line(&self, line: &str) {
        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = writeln!(file, "{line}") {
            tracing::warn!(path = %self.path.display(), error = %e, "poll log write failed");
        }
    }
}

/// Read a poll log; a log that was never written reads as `None`
pub fn read_log(path: &Path) -> Result<Option<String>, StorageError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StorageError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Human-readable duration with two units at most: `12 ms`, `1.5 sec`,
/// `42 sec`, `3 min 5 sec`, `2 hr 10 min`, `1 day 4 hr`.
pub fn format_time_span(elapsed: Duration) -> String {
    let millis = elapsed.as_millis() as u64;
    let secs = millis / 1000;
    let (days, hours, minutes, seconds) = (
        secs / 86_400,
        secs / 3600 % 24,
        secs / 60 % 60,
        secs % 60,
    );

    if days > 0 {
        let unit = if days == 1 { "day" } else { "days" };
        format!("{days} {unit} {hours} hr")
    } else if hours > 0 {
        format!("{hours} hr {minutes} min")
    } else if minutes > 0 {
        format!("{minutes} min {seconds} sec")
    } else if seconds >= 10 {
        format!("{seconds} sec")
    } else if seconds >= 1 {
        format!("{}.{} sec", seconds, millis % 1000 / 100)
    } else {
        format!("{millis} ms")
    }
}

#[cfg(test)]
#[path = "poll_log_tests.rs"]
mod tests;
