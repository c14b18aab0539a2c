// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for a poll cycle

use strig_adapters::{BuildError, ChannelError, EnvironmentError};
use strig_core::{ConfigError, EvaluationError, ScheduleError};
use strig_storage::StorageError;
use thiserror::Error;

/// Errors from running a script on a node
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("The script file path '{0}' doesn't exist.")]
    FileNotFound(String),
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

/// Errors from evaluating an expression
#[derive(Debug, Error)]
pub enum ExpressionError {
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error("expression error: {0}")]
    Evaluation(#[from] EvaluationError),
    #[error("expression evaluation panicked: {0}")]
    Panicked(String),
}

/// Errors resolving the cycle's environment
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
}

/// Anything that ends a poll cycle early
#[derive(Debug, Error)]
pub enum PollError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Environment(#[from] ResolveError),
    #[error(transparent)]
    Remote(#[from] ChannelError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error(transparent)]
    Expression(#[from] ExpressionError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("poll log error: {0}")]
    Log(#[from] StorageError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl PollError {
    /// Errors nobody configured their way into: panics and internal faults
    pub fn is_unexpected(&self) -> bool {
        match self {
            PollError::Unexpected(_) | PollError::Log(_) => true,
            PollError::Remote(e)
            | PollError::Script(ScriptError::Channel(e))
            | PollError::Expression(ExpressionError::Channel(e))
            | PollError::Environment(ResolveError::Channel(e)) => {
                matches!(e, ChannelError::Panicked(_))
            }
            PollError::Expression(ExpressionError::Panicked(_)) => true,
            _ => false,
        }
    }
}

/// Text of a panic payload caught from a task
pub(crate) fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
