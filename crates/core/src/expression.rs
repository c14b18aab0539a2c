// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Boolean expressions evaluated by expression triggers
//!
//! The default evaluator compiles a minijinja expression, for example
//! `env.BRANCH == "main" and parameters.FORCE | default("") != ""`.
//!
//! Bindings visible to an expression:
//! - `env`: the cycle's environment snapshot
//! - `parameters`: parameters found on the matching schedule line
//! - `project`: the job, only when evaluated as a system script
//! - `log(msg)` and `out(msg)`: append a line to the poll log

use crate::params::Parameters;
use minijinja::{Environment, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("expression does not compile: {0}")]
    Compile(String),
    #[error("expression evaluation failed: {0}")]
    Runtime(String),
}

/// Job details exposed to system-script expressions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectBinding {
    pub name: String,
    pub workspace: Option<String>,
    pub data_dir: String,
    /// Names of the job's declared build parameters
    pub parameters: Vec<String>,
}

/// Values an expression can refer to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bindings {
    pub env: BTreeMap<String, String>,
    pub parameters: Parameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectBinding>,
}

/// Result of one evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// String form of the expression's value
    pub value: String,
    /// Lines written through `log` and `out`, in call order
    pub output: Vec<String>,
}

impl Evaluation {
    pub fn is_true(&self) -> bool {
        coerce_to_bool(&self.value)
    }
}

/// Evaluates expression source against bindings
pub trait ExpressionEvaluator: Send + Sync + 'static {
    fn evaluate(&self, source: &str, bindings: &Bindings) -> Result<Evaluation, EvaluationError>;
}

/// Coerce an evaluated value by its string form.
///
/// Only the text "true", in any case, is true. Numbers, "yes" and non-empty
/// strings are all false.
pub fn coerce_to_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

/// Double every backslash so that paths resolved into an expression survive
/// string-literal escaping.
pub fn escape_backslashes(source: &str) -> String {
    source.replace('\\', "\\\\")
}

/// minijinja-backed evaluator
#[derive(Debug, Clone, Copy, Default)]
pub struct MiniJinjaEvaluator;

impl MiniJinjaEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl ExpressionEvaluator for MiniJinjaEvaluator {
    fn evaluate(&self, source: &str, bindings: &Bindings) -> Result<Evaluation, EvaluationError> {
        let output = Arc::new(Mutex::new(Vec::new()));
        let mut env = Environment::new();
        for name in ["log", "out"] {
            let sink = Arc::clone(&output);
            // Returns "" so the call can be concatenated into the result
            env.add_function(name, move |msg: Value| {
                sink.lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(msg.to_string());
                String::new()
            });
        }

        let expr = env
            .compile_expression(source.trim())
            .map_err(|e| EvaluationError::Compile(e.to_string()))?;
        let value = expr
            .eval(bindings)
            .map_err(|e| EvaluationError::Runtime(e.to_string()))?;

        let output = output.lock().unwrap_or_else(|e| e.into_inner()).clone();
        Ok(Evaluation {
            value: value.to_string(),
            output,
        })
    }
}

#[cfg(test)]
#[path = "expression_tests.rs"]
mod tests;
