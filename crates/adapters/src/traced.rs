// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::build::{BuildError, BuildRequest, BuildRequester};
use crate::channel::{
    ChannelError, EvalRequest, LaunchOutcome, LaunchRequest, NodeChannel, OutputSink,
};
use crate::node::Node;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use strig_core::Evaluation;
use tracing::Instrument;

/// Wrapper that adds tracing to any NodeChannel
#[derive(Clone)]
pub struct TracedChannel<C> {
    inner: C,
}

impl<C> TracedChannel<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

// Precondition shared by every channel operation
fn require_online(node: &Node) -> Result<(), ChannelError> {
    if node.is_online() {
        Ok(())
    } else {
        tracing::warn!(node = %node.name, "node is offline");
        Err(ChannelError::Offline(node.name.clone()))
    }
}

#[async_trait]
impl<C: NodeChannel> NodeChannel for TracedChannel<C> {
    async fn environment(&self, node: &Node) -> Result<BTreeMap<String, String>, ChannelError> {
        require_online(node)?;
        let result = self.inner.environment(node).await;
        match &result {
            Ok(env) => tracing::debug!(node = %node.name, vars = env.len(), "node environment"),
            Err(e) => tracing::error!(node = %node.name, error = %e, "node environment failed"),
        }
        result
    }

    async fn file_exists(&self, node: &Node, path: &str) -> Result<bool, ChannelError> {
        require_online(node)?;
        let result = self.inner.file_exists(node, path).await;
        tracing::trace!(node = %node.name, path, exists = ?result.as_ref().ok(), "checked");
        result
    }

    async fn read_file(&self, node: &Node, path: &str) -> Result<String, ChannelError> {
        require_online(node)?;
        let result = self.inner.read_file(node, path).await;
        match &result {
            Ok(content) => tracing::debug!(node = %node.name, path, len = content.len(), "read"),
            Err(e) => tracing::error!(node = %node.name, path, error = %e, "read failed"),
        }
        result
    }

    async fn create_temp_script(
        &self,
        node: &Node,
        contents: &str,
        extension: &str,
    ) -> Result<PathBuf, ChannelError> {
        require_online(node)?;
        let result = self.inner.create_temp_script(node, contents, extension).await;
        match &result {
            Ok(path) => {
                tracing::debug!(node = %node.name, path = %path.display(), "temp script created")
            }
            Err(e) => tracing::error!(node = %node.name, error = %e, "temp script failed"),
        }
        result
    }

    async fn delete_file(&self, node: &Node, path: &Path) -> Result<(), ChannelError> {
        let result = self.inner.delete_file(node, path).await;
        if let Err(e) = &result {
            tracing::error!(node = %node.name, path = %path.display(), error = %e, "delete failed");
        }
        result
    }

    async fn launch(
        &self,
        node: &Node,
        request: LaunchRequest,
        output: &dyn OutputSink,
    ) -> Result<LaunchOutcome, ChannelError> {
        let span = tracing::info_span!("channel.launch", node = %node.name, cwd = %request.cwd.display());
        async move {
            require_online(node)?;
            if request.command.is_empty() {
                tracing::error!("empty command");
                return Err(ChannelError::Launch("empty command".to_string()));
            }
            tracing::info!(command = ?request.command, env_count = request.env.len(), "starting");

            let start = std::time::Instant::now();
            let result = self.inner.launch(node, request, output).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(outcome) => tracing::info!(
                    exit_code = outcome.exit_code,
                    lines = outcome.lines,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "process exited"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "launch failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn evaluate(
        &self,
        node: &Node,
        request: EvalRequest,
    ) -> Result<Evaluation, ChannelError> {
        let span = tracing::info_span!("channel.evaluate", node = %node.name);
        async move {
            require_online(node)?;
            tracing::info!(source_len = request.source.len(), "evaluating");

            let start = std::time::Instant::now();
            let result = self.inner.evaluate(node, request).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(eval) => tracing::info!(
                    value = %eval.value,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "evaluated"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "evaluation failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any BuildRequester
#[derive(Clone)]
pub struct TracedBuildRequester<B> {
    inner: B,
}

impl<B> TracedBuildRequester<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<B: BuildRequester> BuildRequester for TracedBuildRequester<B> {
    async fn is_building(&self, job: &str) -> Result<bool, BuildError> {
        let result = self.inner.is_building(job).await;
        tracing::trace!(job, building = ?result.as_ref().ok(), "checked");
        result
    }

    async fn schedule_build(&self, request: BuildRequest) -> Result<(), BuildError> {
        let span = tracing::info_span!("build.schedule", job = %request.job);
        async move {
            tracing::info!(cause = %request.cause, actions = request.actions.len(), "requesting build");

            let start = std::time::Instant::now();
            let result = self.inner.schedule_build(request).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "build requested"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "build request failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
