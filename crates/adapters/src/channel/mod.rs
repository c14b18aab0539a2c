// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote execution channel
//!
//! Work crosses to a node as plain request values: a command to launch or an
//! expression to evaluate. Paths handed to the channel are relative to the
//! node's root unless absolute.

mod local;

pub use local::LocalChannel;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ChannelCall, FakeChannel};

use crate::node::Node;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use strig_core::{Bindings, Evaluation};
use thiserror::Error;

/// Errors from the execution channel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("node {0} is offline")]
    Offline(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("launch failed: {0}")]
    Launch(String),
    #[error("evaluation failed: {0}")]
    Evaluation(String),
    #[error("remote task panicked: {0}")]
    Panicked(String),
}

/// A process to run on a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub command: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub cwd: PathBuf,
}

/// Exit code of a finished process and how many output lines it wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOutcome {
    /// Raw exit code; -1 when the process was killed by a signal
    pub exit_code: i32,
    pub lines: usize,
}

/// Receives process output one line at a time, as the process writes it
pub trait OutputSink: Send + Sync {
    fn line(&self, line: &str);
}

impl<F> OutputSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn line(&self, line: &str) {
        self(line)
    }
}

/// An expression to evaluate on a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalRequest {
    pub source: String,
    pub bindings: Bindings,
}

#[async_trait]
pub trait NodeChannel: Clone + Send + Sync + 'static {
    /// The node's own process environment
    async fn environment(&self, node: &Node) -> Result<BTreeMap<String, String>, ChannelError>;

    async fn file_exists(&self, node: &Node, path: &str) -> Result<bool, ChannelError>;

    async fn read_file(&self, node: &Node, path: &str) -> Result<String, ChannelError>;

    /// Write `contents` to a new file in the node root and return its path
    async fn create_temp_script(
        &self,
        node: &Node,
        contents: &str,
        extension: &str,
    ) -> Result<PathBuf, ChannelError>;

    async fn delete_file(&self, node: &Node, path: &Path) -> Result<(), ChannelError>;

    /// Run a process to completion, handing each stdout/stderr line to
    /// `output` as it arrives
    async fn launch(
        &self,
        node: &Node,
        request: LaunchRequest,
        output: &dyn OutputSink,
    ) -> Result<LaunchOutcome, ChannelError>;

    async fn evaluate(&self, node: &Node, request: EvalRequest)
        -> Result<Evaluation, ChannelError>;
}

/// The node's root, or `Offline`
pub(crate) fn node_root(node: &Node) -> Result<&Path, ChannelError> {
    node.root
        .as_deref()
        .ok_or_else(|| ChannelError::Offline(node.name.clone()))
}

/// Resolve `path` against the node root unless it is absolute
pub(crate) fn resolve_path(node: &Node, path: &str) -> Result<PathBuf, ChannelError> {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        Ok(candidate.to_path_buf())
    } else {
        Ok(node_root(node)?.join(candidate))
    }
}
