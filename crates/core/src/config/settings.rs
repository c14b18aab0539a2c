// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level settings: server identity, nodes and jobs

use super::{ConfigError, TriggerConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Everything loaded from a strig config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default, rename = "node")]
    pub nodes: Vec<NodeConfig>,
    #[serde(default, rename = "job")]
    pub jobs: BTreeMap<String, JobConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Root for job data directories and the daemon log
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Exposed as JENKINS_HOME; defaults to `data_dir`
    #[serde(default)]
    pub home_dir: Option<PathBuf>,
    #[serde(default)]
    pub root_url: Option<String>,
    #[serde(default)]
    pub secret_key: String,
    /// Endpoint receiving build requests; absent means log only
    #[serde(default)]
    pub build_url: Option<String>,
    #[serde(default)]
    pub queue_scope: QueueScope,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            home_dir: None,
            root_url: None,
            secret_key: String::new(),
            build_url: None,
            queue_scope: QueueScope::default(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl ServerConfig {
    pub fn home_dir(&self) -> &Path {
        self.home_dir.as_deref().unwrap_or(&self.data_dir)
    }

    /// Root URL with a guaranteed trailing slash
    pub fn root_url(&self) -> Option<String> {
        let url = self.root_url.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }
        if url.ends_with('/') {
            Some(url.to_string())
        } else {
            Some(format!("{url}/"))
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".strig")
}

fn default_queue_capacity() -> usize {
    16
}

/// How poll cycles are grouped into single-flight queues
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueScope {
    /// One queue per trigger type, shared by all jobs
    #[default]
    Type,
    /// One queue per job
    Job,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    #[serde(alias = "unix", alias = "linux", alias = "macos")]
    Posix,
    Windows,
}

impl OsFamily {
    pub fn current() -> Self {
        if cfg!(windows) {
            OsFamily::Windows
        } else {
            OsFamily::Posix
        }
    }
}

impl Default for OsFamily {
    fn default() -> Self {
        Self::current()
    }
}

/// The controller, where unlabelled triggers and system scripts run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default = "default_controller_name")]
    pub name: String,
    /// Working root; defaults to `<data_dir>/controller`
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub os: OsFamily,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            name: default_controller_name(),
            root: None,
            labels: Vec::new(),
            os: OsFamily::default(),
        }
    }
}

fn default_controller_name() -> String {
    "built-in".to_string()
}

/// A build agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub name: String,
    /// Working root; a node without one is offline
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub online: bool,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub os: OsFamily,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Filled from the `[job.<name>]` key
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub workspace: Option<PathBuf>,
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
    #[serde(default)]
    pub env_inject: Option<EnvInjectConfig>,
    pub trigger: TriggerConfig,
}

impl JobConfig {
    /// Keep declared parameters only, filling gaps from declared defaults.
    /// A job that declares nothing passes everything through.
    pub fn apply_definitions(
        &self,
        found: crate::params::Parameters,
    ) -> crate::params::Parameters {
        if self.parameters.is_empty() {
            return found;
        }
        self.parameters
            .iter()
            .filter_map(|def| {
                found
                    .get(&def.name)
                    .cloned()
                    .or_else(|| def.default.clone())
                    .map(|value| (def.name.clone(), value))
            })
            .collect()
    }
}

/// A declared build parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(default)]
    pub default: Option<String>,
}

/// Variables injected into every poll of a job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvInjectConfig {
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
    /// `.properties` file re-read on every poll
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut settings: Settings = toml::from_str(content)?;
        for (name, job) in settings.jobs.iter_mut() {
            job.name = name.clone();
        }
        Ok(settings)
    }

    pub fn job(&self, name: &str) -> Result<&JobConfig, ConfigError> {
        self.jobs
            .get(name)
            .ok_or_else(|| ConfigError::UnknownJob(name.to_string()))
    }

    /// Problems found in every job's trigger, paired with the job name
    pub fn validate(&self) -> Vec<(String, ConfigError)> {
        self.jobs
            .values()
            .flat_map(|job| {
                job.trigger
                    .validate()
                    .into_iter()
                    .map(|e| (job.name.clone(), e))
            })
            .collect()
    }

    /// Resolve relative `data_dir` and `controller.root` against `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.server.data_dir.is_relative() {
            self.server.data_dir = base.join(&self.server.data_dir);
        }
        let root = match self.controller.root.take() {
            Some(root) if root.is_relative() => base.join(root),
            Some(root) => root,
            None => self.server.data_dir.join("controller"),
        };
        self.controller.root = Some(root);
    }
}

/// Load settings from a TOML file. Relative paths resolve against the
/// file's directory.
pub fn load_file(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut settings = Settings::from_toml(&content)?;
    let base = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    settings.resolve_paths(base);
    tracing::debug!(path = %path.display(), jobs = settings.jobs.len(), "loaded settings");
    Ok(settings)
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
