// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Env-injection variables
//!
//! A source reports whether it is active for a job and, if so, the
//! variables that override everything else in the cycle's environment.

mod inject;
mod noop;

pub use inject::InjectedEnvironment;
pub use noop::NoOpEnvironment;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeEnvironment;

use async_trait::async_trait;
use std::collections::BTreeMap;
use strig_core::JobConfig;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    #[error("failed to read env-injection file {path}: {message}")]
    File { path: String, message: String },
}

#[async_trait]
pub trait EnvironmentSource: Clone + Send + Sync + 'static {
    fn is_active(&self, job: &JobConfig) -> bool;

    /// Variables to inject, re-derived on every call
    async fn variables(&self, job: &JobConfig)
        -> Result<BTreeMap<String, String>, EnvironmentError>;
}
