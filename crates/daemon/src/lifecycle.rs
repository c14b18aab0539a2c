// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, ticking, shutdown.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Local};
use fs2::FileExt;
use strig_core::{load_file, ConfigError, Settings};
use strig_engine::{local_trigger_service, LocalTriggerService, TickReport};
use thiserror::Error;
use tracing::{info, warn};

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// strig settings file
    pub config_path: PathBuf,
    /// Data directory holding job logs and daemon files
    pub data_dir: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
}

impl Config {
    /// Daemon paths for a loaded settings file
    pub fn for_settings(config_path: &Path, settings: &Settings) -> Self {
        let data_dir = settings.server.data_dir.clone();
        Self {
            config_path: config_path.to_path_buf(),
            lock_path: data_dir.join("strigd.pid"),
            log_path: data_dir.join("strigd.log"),
            data_dir,
        }
    }
}

/// Load settings and derive daemon paths
pub fn load(config_path: &Path) -> Result<(Config, Settings), LifecycleError> {
    let settings = load_file(config_path)?;
    Ok((Config::for_settings(config_path, &settings), settings))
}

/// Daemon state during operation
pub struct DaemonState {
    /// Configuration
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Registered triggers
    pub service: LocalTriggerService,
    /// When daemon started
    pub start_time: Instant,
}

impl DaemonState {
    /// Submit cycles for every job due at `at`
    pub fn tick(&self, at: DateTime<Local>) -> TickReport {
        let report = self.service.tick(at);
        if !report.submitted.is_empty() || !report.rejected.is_empty() {
            info!(
                submitted = report.submitted.len(),
                rejected = report.rejected.len(),
                "tick at {}",
                at.format("%H:%M")
            );
        }
        report
    }

    /// Shutdown the daemon gracefully
    pub async fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");

        // 1. Let queued cycles finish
        self.service.shutdown().await;

        // 2. Remove PID file
        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        // 3. Lock file is released automatically when self.lock_file is dropped

        info!(
            uptime_secs = self.start_time.elapsed().as_secs(),
            "Daemon shutdown complete"
        );
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid log path: {0}")]
    BadLogPath(PathBuf),

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon
pub fn startup(config: &Config, settings: &Settings) -> Result<DaemonState, LifecycleError> {
    match startup_inner(config, settings) {
        Ok(state) => Ok(state),
        Err(e) => {
            // Clean up any resources created before failure
            cleanup_on_failure(config, &e);
            Err(e)
        }
    }
}

/// Inner startup logic - cleanup_on_failure called if this fails
fn startup_inner(config: &Config, settings: &Settings) -> Result<DaemonState, LifecycleError> {
    // 1. Create data directory
    std::fs::create_dir_all(&config.data_dir)?;

    // 2. Acquire lock file FIRST - prevents two daemons polling the same jobs.
    // Opened without truncation so a losing daemon leaves the owner's PID.
    let mut lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    // Write PID to lock file
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    // 3. Controller root must exist before scripts can run there
    if let Some(root) = &settings.controller.root {
        std::fs::create_dir_all(root)?;
    }

    // 4. Report invalid triggers; they are skipped, not fatal
    for (job, problem) in settings.validate() {
        warn!(job = %job, "invalid trigger: {}", problem);
    }

    // 5. Register triggers
    let service = local_trigger_service(settings);

    info!(
        "Daemon started with {} jobs from {}",
        service.jobs().count(),
        config.config_path.display()
    );

    Ok(DaemonState {
        config: config.clone(),
        lock_file,
        service,
        start_time: Instant::now(),
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config, error: &LifecycleError) {
    // Another daemon owns the PID file
    if matches!(error, LifecycleError::LockFailed(_)) {
        return;
    }
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
