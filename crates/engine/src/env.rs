// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-cycle environment resolution
//!
//! Layers, later wins: the node's own environment, the server and job
//! identity variables, then env-injection variables when active.

use crate::error::ResolveError;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::PathBuf;
use strig_adapters::{EnvironmentSource, Node, NodeChannel};
use strig_core::{JobConfig, ServerConfig};

/// Server-wide values exposed to every cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    pub home_dir: PathBuf,
    /// Always ends with `/` when set
    pub root_url: Option<String>,
    pub secret_key: String,
}

impl ServerIdentity {
    pub fn from_settings(server: &ServerConfig) -> Self {
        Self {
            home_dir: server.home_dir().to_path_buf(),
            root_url: server.root_url(),
            secret_key: server.secret_key.clone(),
        }
    }

    /// SHA-256 hex digest of `ServerID:<secret>`
    pub fn server_cookie(&self) -> String {
        let digest = Sha256::digest(format!("ServerID:{}", self.secret_key).as_bytes());
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// The immutable environment of one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSnapshot(BTreeMap<String, String>);

impl EnvironmentSnapshot {
    pub fn new(vars: BTreeMap<String, String>) -> Self {
        Self(vars)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

/// Job workspace on `node`: the configured one, else `<root>/workspace/<job>`
pub fn workspace_for(job: &JobConfig, node: &Node) -> Option<PathBuf> {
    job.workspace.clone().or_else(|| {
        node.root
            .as_ref()
            .map(|root| root.join("workspace").join(&job.name))
    })
}

#[derive(Clone)]
pub struct EnvironmentResolver<C, E> {
    channel: C,
    source: E,
    identity: ServerIdentity,
}

impl<C, E> EnvironmentResolver<C, E>
where
    C: NodeChannel,
    E: EnvironmentSource,
{
    pub fn new(channel: C, source: E, identity: ServerIdentity) -> Self {
        Self {
            channel,
            source,
            identity,
        }
    }

    pub fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    /// Build a fresh snapshot; nothing is cached between calls
    pub async fn resolve(
        &self,
        node: &Node,
        job: &JobConfig,
    ) -> Result<EnvironmentSnapshot, ResolveError> {
        let mut vars = self.channel.environment(node).await?;
        vars.extend(self.identity_vars(node, job));

        if self.source.is_active(job) {
            let injected = self.source.variables(job).await?;
            tracing::debug!(job = %job.name, count = injected.len(), "injected variables");
            vars.extend(injected);
        }

        Ok(EnvironmentSnapshot(vars))
    }

    fn identity_vars(&self, node: &Node, job: &JobConfig) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();
        vars.insert("JOB_NAME".to_string(), job.name.clone());
        vars.insert("NODE_NAME".to_string(), node.name.clone());
        vars.insert("NODE_LABELS".to_string(), node.assigned_labels().join(" "));
        if let Some(workspace) = workspace_for(job, node) {
            vars.insert("WORKSPACE".to_string(), workspace.display().to_string());
        }

        let home = self.identity.home_dir.display().to_string();
        vars.insert("JENKINS_HOME".to_string(), home.clone());
        vars.insert("HUDSON_HOME".to_string(), home);

        if let Some(root_url) = &self.identity.root_url {
            vars.insert("JENKINS_URL".to_string(), root_url.clone());
            vars.insert("HUDSON_URL".to_string(), root_url.clone());
            vars.insert("JOB_URL".to_string(), format!("{root_url}job/{}/", job.name));
        }

        let cookie = self.identity.server_cookie();
        vars.insert("JENKINS_SERVER_COOKIE".to_string(), cookie.clone());
        vars.insert("HUDSON_SERVER_COOKIE".to_string(), cookie);
        vars
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
