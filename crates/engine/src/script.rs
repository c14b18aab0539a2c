// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Script execution on a node
//!
//! A script is macro-resolved against the cycle environment, written to a
//! temp file in the node root, run with the node root as working directory
//! and removed again. Output goes to the poll log.

use crate::env::EnvironmentSnapshot;
use crate::error::ScriptError;
use std::path::Path;
use strig_adapters::{ChannelError, LaunchRequest, Node, NodeChannel};
use strig_core::macros::replace_macro;
use strig_core::OsFamily;
use strig_storage::PollLog;

/// Interpreter used when a POSIX script has no `#!` line
const DEFAULT_SHELL: [&str; 2] = ["/bin/sh", "-xe"];

/// A script ready to be written and launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PreparedScript {
    pub contents: String,
    pub extension: &'static str,
    /// Command without the script path
    pub interpreter: Vec<String>,
}

impl PreparedScript {
    pub(crate) fn for_os(os: OsFamily, script: &str) -> Self {
        match os {
            OsFamily::Posix => {
                let contents = script.replace("\r\n", "\n");
                let interpreter = contents
                    .lines()
                    .next()
                    .and_then(|first| first.strip_prefix("#!"))
                    .map(|line| line.split_whitespace().map(str::to_string).collect::<Vec<_>>())
                    .filter(|command| !command.is_empty())
                    .unwrap_or_else(|| DEFAULT_SHELL.iter().map(|s| s.to_string()).collect());
                Self {
                    contents,
                    extension: ".sh",
                    interpreter,
                }
            }
            OsFamily::Windows => {
                let normalized = script.replace("\r\n", "\n").replace('\n', "\r\n");
                Self {
                    contents: format!("{normalized}\r\nexit %ERRORLEVEL%"),
                    extension: ".bat",
                    interpreter: vec!["cmd".to_string(), "/c".to_string(), "call".to_string()],
                }
            }
        }
    }

    fn command(&self, path: &Path) -> Vec<String> {
        let mut command = self.interpreter.clone();
        command.push(path.display().to_string());
        command
    }
}

#[derive(Clone)]
pub struct ScriptExecutor<C> {
    channel: C,
}

impl<C: NodeChannel> ScriptExecutor<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    /// Run inline script text and return its exit code
    pub async fn run_inline(
        &self,
        node: &Node,
        script: &str,
        env: &EnvironmentSnapshot,
        log: &PollLog,
    ) -> Result<i32, ScriptError> {
        let resolved = replace_macro(script, env.vars());
        self.execute(node, &resolved, env, log).await
    }

    /// Run a script file that lives on the node. The path is macro-resolved
    /// and must exist before anything is launched.
    pub async fn run_file(
        &self,
        node: &Node,
        path: &str,
        env: &EnvironmentSnapshot,
        log: &PollLog,
    ) -> Result<i32, ScriptError> {
        let path = replace_macro(path, env.vars());
        if !self.channel.file_exists(node, &path).await? {
            return Err(ScriptError::FileNotFound(path));
        }
        let content = self.channel.read_file(node, &path).await?;
        let resolved = replace_macro(&content, env.vars());
        self.execute(node, &resolved, env, log).await
    }

    async fn execute(
        &self,
        node: &Node,
        script: &str,
        env: &EnvironmentSnapshot,
        log: &PollLog,
    ) -> Result<i32, ScriptError> {
        log.info(&format!("Evaluating the script: \n {script}"));

        let prepared = PreparedScript::for_os(node.os, script);
        let root = node
            .root
            .clone()
            .ok_or_else(|| ChannelError::Offline(node.name.clone()))?;
        let temp = self
            .channel
            .create_temp_script(node, &prepared.contents, prepared.extension)
            .await?;

        let forward = |line: &str| log.output(line);
        let launched = self
            .channel
            .launch(
                node,
                LaunchRequest {
                    command: prepared.command(&temp),
                    env: env.vars().clone(),
                    cwd: root,
                },
                &forward,
            )
            .await;

        // Cleanup failure outranks the launch result
        self.channel.delete_file(node, &temp).await?;

        Ok(launched?.exit_code)
    }
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
