// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger configuration
//!
//! ```toml
//! [job.nightly.trigger]
//! type = "script"
//! spec = "*/5 * * * *"
//! label = "linux && !windows"
//! script = "exit 3"
//! exit_code = "3"
//! ```
//!
//! Empty strings are treated as absent, so `exit_code = ""` means the
//! default exit code and `label = ""` means the controller.

use super::ConfigError;
use crate::label::LabelExpr;
use crate::params::MergePolicy;
use crate::schedule::CronSchedule;
use serde::{Deserialize, Deserializer, Serialize};

/// Label value meaning "no restriction"
const ANY_LABEL: &str = "any";

/// One trigger attached to a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerConfig {
    pub spec: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub label: Option<String>,
    #[serde(default)]
    pub concurrent_build: bool,
    /// Overrides the default build cause
    #[serde(default, deserialize_with = "non_empty")]
    pub cause: Option<String>,
    #[serde(flatten)]
    pub kind: TriggerKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerKind {
    Script(ScriptTrigger),
    #[serde(alias = "groovy")]
    Expression(ExpressionTrigger),
}

/// Runs a shell or batch script and compares its exit code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptTrigger {
    #[serde(default, deserialize_with = "non_empty")]
    pub script: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub script_file_path: Option<String>,
    #[serde(default, deserialize_with = "exit_code")]
    pub exit_code: Option<String>,
}

/// Evaluates a boolean expression
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionTrigger {
    #[serde(default, alias = "groovy_expression", deserialize_with = "non_empty")]
    pub expression: Option<String>,
    #[serde(default, alias = "groovy_file_path", deserialize_with = "non_empty")]
    pub expression_file_path: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub properties_file_path: Option<String>,
    /// Evaluate on the controller with access to the job
    #[serde(default)]
    pub system_script: bool,
    #[serde(default)]
    pub merge_policy: MergePolicy,
}

impl ScriptTrigger {
    /// Expected exit code; absent means 0
    pub fn expected_exit_code(&self) -> Result<i32, ConfigError> {
        match &self.exit_code {
            None => Ok(0),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidExitCode(raw.clone())),
        }
    }

    pub fn has_source(&self) -> bool {
        self.script.is_some() || self.script_file_path.is_some()
    }
}

impl ExpressionTrigger {
    pub fn has_source(&self) -> bool {
        self.expression.is_some() || self.expression_file_path.is_some()
    }
}

impl TriggerConfig {
    /// Short name of the trigger type, also the default queue key
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            TriggerKind::Script(_) => "script",
            TriggerKind::Expression(_) => "expression",
        }
    }

    /// File name of the poll log in the job's data directory
    pub fn log_file_name(&self) -> &'static str {
        match self.kind {
            TriggerKind::Script(_) => "scriptTrigger-polling.log",
            TriggerKind::Expression(_) => "groovyScriptTrigger-polling.log",
        }
    }

    /// Cause used when neither the log nor the config supplies one
    pub fn default_cause(&self) -> &'static str {
        match self.kind {
            TriggerKind::Script(_) => "The execution script returns the expected exit code",
            TriggerKind::Expression(_) => "Groovy Expression evaluation to true.",
        }
    }

    pub fn schedule(&self) -> Result<CronSchedule, ConfigError> {
        Ok(CronSchedule::parse(&self.spec)?)
    }

    /// Parsed label restriction; `None` (no label, or `any`) runs on the
    /// controller
    pub fn label_expr(&self) -> Result<Option<LabelExpr>, ConfigError> {
        match self.label.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(label) if label.eq_ignore_ascii_case(ANY_LABEL) => Ok(None),
            Some(label) => Ok(Some(LabelExpr::parse(label)?)),
        }
    }

    /// Check everything that can be checked without running the trigger
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut problems = Vec::new();
        if let Err(e) = self.schedule() {
            problems.push(e);
        }
        if let Err(e) = self.label_expr() {
            problems.push(e);
        }
        match &self.kind {
            TriggerKind::Script(script) => {
                if let Err(e) = script.expected_exit_code() {
                    problems.push(e);
                }
                if !script.has_source() {
                    problems.push(ConfigError::MissingSource("script or script_file_path"));
                }
            }
            TriggerKind::Expression(expr) => {
                if !expr.has_source() {
                    problems.push(ConfigError::MissingSource(
                        "expression or expression_file_path",
                    ));
                }
            }
        }
        problems
    }
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawExitCode {
    Int(i64),
    Text(String),
}

fn exit_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<RawExitCode>::deserialize(deserializer)?;
    Ok(match value {
        Some(RawExitCode::Int(n)) => Some(n.to_string()),
        Some(RawExitCode::Text(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
