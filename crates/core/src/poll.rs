// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outcome of a single poll

use crate::params::Parameters;
use serde::{Deserialize, Serialize};

/// Action attached to a requested build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum BuildAction {
    Parameters(Parameters),
    Description(String),
}

/// Result of evaluating a trigger once
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PollResult {
    pub changed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<BuildAction>,
}

impl PollResult {
    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn changed(cause: impl Into<String>, actions: Vec<BuildAction>) -> Self {
        Self {
            changed: true,
            cause: Some(cause.into()),
            actions,
        }
    }

    pub fn parameters(&self) -> Option<&Parameters> {
        self.actions.iter().find_map(|a| match a {
            BuildAction::Parameters(p) => Some(p),
            BuildAction::Description(_) => None,
        })
    }

    pub fn description(&self) -> Option<&str> {
        self.actions.iter().find_map(|a| match a {
            BuildAction::Description(d) => Some(d.as_str()),
            BuildAction::Parameters(_) => None,
        })
    }
}
