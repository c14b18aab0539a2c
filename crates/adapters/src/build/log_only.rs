// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Requester used when no build endpoint is configured

use super::{BuildError, BuildRequest, BuildRequester};
use async_trait::async_trait;

/// Logs each request at info level and does nothing else
#[derive(Clone, Copy, Debug, Default)]
pub struct LogBuildRequester;

impl LogBuildRequester {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BuildRequester for LogBuildRequester {
    async fn is_building(&self, _job: &str) -> Result<bool, BuildError> {
        Ok(false)
    }

    async fn schedule_build(&self, request: BuildRequest) -> Result<(), BuildError> {
        tracing::info!(
            job = %request.job,
            cause = %request.cause,
            parameters = ?request.parameters(),
            description = ?request.description(),
            concurrent = request.concurrent,
            "build requested"
        );
        Ok(())
    }
}
