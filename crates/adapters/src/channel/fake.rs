// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake execution channel for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{
    ChannelError, EvalRequest, LaunchOutcome, LaunchRequest, NodeChannel, OutputSink,
};
use crate::node::Node;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use strig_core::{Evaluation, ExpressionEvaluator, MiniJinjaEvaluator};

/// Recorded channel call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelCall {
    Environment { node: String },
    FileExists { node: String, path: String },
    ReadFile { node: String, path: String },
    CreateTempScript { node: String, contents: String, extension: String },
    DeleteFile { node: String, path: PathBuf },
    Launch { node: String, request: LaunchRequest },
    Evaluate { node: String, request: EvalRequest },
}

#[derive(Default)]
struct FakeState {
    env: BTreeMap<String, String>,
    /// Files keyed by the path string the caller used
    files: HashMap<String, String>,
    temp_scripts: Vec<PathBuf>,
    exit_codes: VecDeque<i32>,
    output: Vec<String>,
    evaluations: VecDeque<Result<Evaluation, ChannelError>>,
    fail_environment: Option<ChannelError>,
    fail_delete: bool,
    next_temp: u32,
}

/// Fake channel: records calls and serves canned results.
///
/// Launches exit with queued codes (0 once the queue is empty). Expressions
/// use queued evaluations, falling back to the real minijinja evaluator.
#[derive(Clone, Default)]
pub struct FakeChannel {
    state: Arc<Mutex<FakeState>>,
    calls: Arc<Mutex<Vec<ChannelCall>>>,
}

impl FakeChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ChannelCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn launches(&self) -> Vec<LaunchRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ChannelCall::Launch { request, .. } => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn evaluations(&self) -> Vec<EvalRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ChannelCall::Evaluate { request, .. } => Some(request),
                _ => None,
            })
            .collect()
    }

    /// Temp scripts created and not yet deleted
    pub fn live_temp_scripts(&self) -> Vec<PathBuf> {
        self.state().temp_scripts.clone()
    }

    pub fn set_env(&self, key: &str, value: &str) {
        self.state().env.insert(key.to_string(), value.to_string());
    }

    pub fn add_file(&self, path: &str, contents: &str) {
        self.state()
            .files
            .insert(path.to_string(), contents.to_string());
    }

    pub fn push_exit_code(&self, code: i32) {
        self.state().exit_codes.push_back(code);
    }

    /// Output lines returned by every launch
    pub fn set_output(&self, lines: &[&str]) {
        self.state().output = lines.iter().map(|l| l.to_string()).collect();
    }

    pub fn push_evaluation(&self, result: Result<Evaluation, ChannelError>) {
        self.state().evaluations.push_back(result);
    }

    pub fn fail_environment(&self, error: ChannelError) {
        self.state().fail_environment = Some(error);
    }

    pub fn fail_delete(&self) {
        self.state().fail_delete = true;
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: ChannelCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

#[async_trait]
impl NodeChannel for FakeChannel {
    async fn environment(&self, node: &Node) -> Result<BTreeMap<String, String>, ChannelError> {
        self.record(ChannelCall::Environment {
            node: node.name.clone(),
        });
        let state = self.state();
        match &state.fail_environment {
            Some(e) => Err(e.clone()),
            None => Ok(state.env.clone()),
        }
    }

    async fn file_exists(&self, node: &Node, path: &str) -> Result<bool, ChannelError> {
        self.record(ChannelCall::FileExists {
            node: node.name.clone(),
            path: path.to_string(),
        });
        Ok(self.state().files.contains_key(path))
    }

    async fn read_file(&self, node: &Node, path: &str) -> Result<String, ChannelError> {
        self.record(ChannelCall::ReadFile {
            node: node.name.clone(),
            path: path.to_string(),
        });
        self.state()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| ChannelError::Io(format!("{path}: not found")))
    }

    async fn create_temp_script(
        &self,
        node: &Node,
        contents: &str,
        extension: &str,
    ) -> Result<PathBuf, ChannelError> {
        self.record(ChannelCall::CreateTempScript {
            node: node.name.clone(),
            contents: contents.to_string(),
            extension: extension.to_string(),
        });
        let mut state = self.state();
        state.next_temp += 1;
        let root = node.root.clone().unwrap_or_default();
        let path = root.join(format!("strig{}{}", state.next_temp, extension));
        state.temp_scripts.push(path.clone());
        Ok(path)
    }

    async fn delete_file(&self, node: &Node, path: &Path) -> Result<(), ChannelError> {
        self.record(ChannelCall::DeleteFile {
            node: node.name.clone(),
            path: path.to_path_buf(),
        });
        let mut state = self.state();
        if state.fail_delete {
            return Err(ChannelError::Io(format!("{}: permission denied", path.display())));
        }
        state.temp_scripts.retain(|p| p != path);
        Ok(())
    }

    async fn launch(
        &self,
        node: &Node,
        request: LaunchRequest,
        output: &dyn OutputSink,
    ) -> Result<LaunchOutcome, ChannelError> {
        self.record(ChannelCall::Launch {
            node: node.name.clone(),
            request,
        });
        let (exit_code, lines) = {
            let mut state = self.state();
            (state.exit_codes.pop_front().unwrap_or(0), state.output.clone())
        };
        for line in &lines {
            output.line(line);
        }
        Ok(LaunchOutcome {
            exit_code,
            lines: lines.len(),
        })
    }

    async fn evaluate(
        &self,
        node: &Node,
        request: EvalRequest,
    ) -> Result<Evaluation, ChannelError> {
        self.record(ChannelCall::Evaluate {
            node: node.name.clone(),
            request: request.clone(),
        });
        if let Some(canned) = self.state().evaluations.pop_front() {
            return canned;
        }
        MiniJinjaEvaluator::new()
            .evaluate(&request.source, &request.bindings)
            .map_err(|e| ChannelError::Evaluation(e.to_string()))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
