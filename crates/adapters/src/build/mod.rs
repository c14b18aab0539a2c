// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Downstream build requests
//!
//! The polling engine never runs builds. On a match it hands one
//! `BuildRequest` to a `BuildRequester`.

mod http;
mod log_only;

pub use http::HttpBuildRequester;
pub use log_only::LogBuildRequester;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{BuildCall, FakeBuildRequester};

use async_trait::async_trait;
use serde::Serialize;
use strig_core::{BuildAction, Parameters, ServerConfig};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("build request failed: {0}")]
    Request(String),
    #[error("build endpoint rejected request: {0}")]
    Rejected(String),
}

/// A request to schedule one build of a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub job: String,
    pub quiet_period: u32,
    pub cause: String,
    pub actions: Vec<BuildAction>,
    /// The trigger allows concurrent builds of the job
    pub concurrent: bool,
}

/// Wire form of a build request
#[derive(Debug, Serialize)]
struct BuildPayload<'a> {
    job: &'a str,
    quiet_period: u32,
    cause: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<&'a Parameters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    concurrent: bool,
}

impl BuildRequest {
    pub fn parameters(&self) -> Option<&Parameters> {
        self.actions.iter().find_map(|a| match a {
            BuildAction::Parameters(p) => Some(p),
            BuildAction::Description(_) => None,
        })
    }

    pub fn description(&self) -> Option<&str> {
        self.actions.iter().find_map(|a| match a {
            BuildAction::Description(d) => Some(d.as_str()),
            BuildAction::Parameters(_) => None,
        })
    }

    /// JSON body sent to a build endpoint
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&BuildPayload {
            job: &self.job,
            quiet_period: self.quiet_period,
            cause: &self.cause,
            parameters: self.parameters(),
            description: self.description(),
            concurrent: self.concurrent,
        })
    }
}

#[async_trait]
pub trait BuildRequester: Clone + Send + Sync + 'static {
    /// True while a build of `job` is running
    async fn is_building(&self, job: &str) -> Result<bool, BuildError>;

    async fn schedule_build(&self, request: BuildRequest) -> Result<(), BuildError>;
}

/// Requester chosen from settings: HTTP when `build_url` is set, otherwise
/// log only
#[derive(Clone, Debug)]
pub enum ConfiguredBuildRequester {
    Http(HttpBuildRequester),
    Log(LogBuildRequester),
}

impl ConfiguredBuildRequester {
    pub fn from_settings(server: &ServerConfig) -> Self {
        match server.build_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Self::Http(HttpBuildRequester::new(url)),
            _ => Self::Log(LogBuildRequester::new()),
        }
    }
}

#[async_trait]
impl BuildRequester for ConfiguredBuildRequester {
    async fn is_building(&self, job: &str) -> Result<bool, BuildError> {
        match self {
            Self::Http(r) => r.is_building(job).await,
            Self::Log(r) => r.is_building(job).await,
        }
    }

    async fn schedule_build(&self, request: BuildRequest) -> Result<(), BuildError> {
        match self {
            Self::Http(r) => r.schedule_build(request).await,
            Self::Log(r) => r.schedule_build(request).await,
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
