// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel to nodes reachable through the local filesystem
//!
//! Processes run as children of this service with the node root as their
//! working directory. Expressions run on a blocking task so a panicking
//! evaluator surfaces as `ChannelError::Panicked`.

use super::{
    node_root, resolve_path, ChannelError, EvalRequest, LaunchOutcome, LaunchRequest, NodeChannel,
    OutputSink,
};
use crate::node::Node;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use strig_core::{Evaluation, ExpressionEvaluator, MiniJinjaEvaluator};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

#[derive(Clone)]
pub struct LocalChannel {
    evaluator: Arc<dyn ExpressionEvaluator>,
}

impl LocalChannel {
    pub fn new(evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
        Self { evaluator }
    }
}

impl Default for LocalChannel {
    fn default() -> Self {
        Self::new(Arc::new(MiniJinjaEvaluator::new()))
    }
}

#[async_trait]
impl NodeChannel for LocalChannel {
    async fn environment(&self, node: &Node) -> Result<BTreeMap<String, String>, ChannelError> {
        node_root(node)?;
        Ok(std::env::vars().collect())
    }

    async fn file_exists(&self, node: &Node, path: &str) -> Result<bool, ChannelError> {
        let path = resolve_path(node, path)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| ChannelError::Io(format!("{}: {}", path.display(), e)))
    }

    async fn read_file(&self, node: &Node, path: &str) -> Result<String, ChannelError> {
        let path = resolve_path(node, path)?;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ChannelError::Io(format!("{}: {}", path.display(), e)))
    }

    async fn create_temp_script(
        &self,
        node: &Node,
        contents: &str,
        extension: &str,
    ) -> Result<PathBuf, ChannelError> {
        let root = node_root(node)?.to_path_buf();
        let contents = contents.to_string();
        let extension = extension.to_string();

        let created = tokio::task::spawn_blocking(move || -> std::io::Result<PathBuf> {
            std::fs::create_dir_all(&root)?;
            let mut file = tempfile::Builder::new()
                .prefix("strig")
                .suffix(&extension)
                .tempfile_in(&root)?;
            file.write_all(contents.as_bytes())?;
            file.flush()?;
            let (_, path) = file.keep().map_err(|e| e.error)?;
            Ok(path)
        })
        .await
        .map_err(|e| ChannelError::Panicked(e.to_string()))?;

        created.map_err(|e| ChannelError::Io(format!("temporary script: {e}")))
    }

    async fn delete_file(&self, _node: &Node, path: &Path) -> Result<(), ChannelError> {
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| ChannelError::Io(format!("{}: {}", path.display(), e)))
    }

    async fn launch(
        &self,
        node: &Node,
        request: LaunchRequest,
        output: &dyn OutputSink,
    ) -> Result<LaunchOutcome, ChannelError> {
        node_root(node)?;
        let Some((program, args)) = request.command.split_first() else {
            return Err(ChannelError::Launch("empty command".to_string()));
        };

        let mut child = Command::new(program)
            .args(args)
            .env_clear()
            .envs(&request.env)
            .current_dir(&request.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ChannelError::Launch(format!("{program}: {e}")))?;

        let mut lines = 0;
        if let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) {
            let mut out = BufReader::new(stdout);
            let mut err = BufReader::new(stderr);
            let (mut out_buf, mut err_buf) = (Vec::new(), Vec::new());
            let (mut out_open, mut err_open) = (true, true);
            while out_open || err_open {
                tokio::select! {
                    read = out.read_until(b'\n', &mut out_buf), if out_open => {
                        out_open = forward_line(read, &mut out_buf, output, &mut lines);
                    }
                    read = err.read_until(b'\n', &mut err_buf), if err_open => {
                        err_open = forward_line(read, &mut err_buf, output, &mut lines);
                    }
                }
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| ChannelError::Launch(e.to_string()))?;

        Ok(LaunchOutcome {
            exit_code: status.code().unwrap_or(-1),
            lines,
        })
    }

    async fn evaluate(
        &self,
        node: &Node,
        request: EvalRequest,
    ) -> Result<Evaluation, ChannelError> {
        node_root(node)?;
        let evaluator = Arc::clone(&self.evaluator);
        tokio::task::spawn_blocking(move || evaluator.evaluate(&request.source, &request.bindings))
            .await
            .map_err(|e| ChannelError::Panicked(e.to_string()))?
            .map_err(|e| ChannelError::Evaluation(e.to_string()))
    }
}

/// Hand one raw line to `output`. Returns false once the stream is done.
///
/// Bytes that are not UTF-8 are replaced rather than ending the stream; a
/// pipe that stops being read would block the child once it fills.
fn forward_line(
    read: std::io::Result<usize>,
    buf: &mut Vec<u8>,
    output: &dyn OutputSink,
    lines: &mut usize,
) -> bool {
    match read {
        Ok(0) => false,
        Ok(_) => {
            let line = String::from_utf8_lossy(buf);
            output.line(line.trim_end_matches(['\n', '\r']));
            *lines += 1;
            buf.clear();
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "process output stream failed");
            false
        }
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
