// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake environment source for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{EnvironmentError, EnvironmentSource};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use strig_core::JobConfig;

#[derive(Default)]
struct FakeState {
    active: bool,
    vars: BTreeMap<String, String>,
    error: Option<EnvironmentError>,
    calls: usize,
}

/// Active for every job once a variable has been set
#[derive(Clone, Default)]
pub struct FakeEnvironment {
    state: Arc<Mutex<FakeState>>,
}

impl FakeEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_var(&self, key: &str, value: &str) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.active = true;
        state.vars.insert(key.to_string(), value.to_string());
    }

    pub fn fail_with(&self, error: EnvironmentError) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.active = true;
        state.error = Some(error);
    }

    /// Number of `variables` calls so far
    pub fn calls(&self) -> usize {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).calls
    }
}

#[async_trait]
impl EnvironmentSource for FakeEnvironment {
    fn is_active(&self, _job: &JobConfig) -> bool {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).active
    }

    async fn variables(
        &self,
        _job: &JobConfig,
    ) -> Result<BTreeMap<String, String>, EnvironmentError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls += 1;
        match &state.error {
            Some(e) => Err(e.clone()),
            None => Ok(state.vars.clone()),
        }
    }
}
