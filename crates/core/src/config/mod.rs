// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration loaded from the strig TOML file

mod settings;
mod trigger;

pub use settings::{
    load_file, ControllerConfig, EnvInjectConfig, JobConfig, NodeConfig, OsFamily,
    ParameterDefinition, QueueScope, ServerConfig, Settings,
};
pub use trigger::{ExpressionTrigger, ScriptTrigger, TriggerConfig, TriggerKind};

use crate::label::LabelError;
use crate::schedule::ScheduleError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors in configuration, at load time or when a cycle starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("The given exit code must be a numeric value. The given value is '{0}'.")]
    InvalidExitCode(String),
    #[error("nothing to evaluate: set a {0}")]
    MissingSource(&'static str),
    #[error("invalid schedule: {0}")]
    Schedule(#[from] ScheduleError),
    #[error("invalid label expression: {0}")]
    Label(#[from] LabelError),
    #[error("unknown job: {0}")]
    UnknownJob(String),
}
