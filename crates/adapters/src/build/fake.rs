// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake build requester for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{BuildError, BuildRequest, BuildRequester};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Recorded requester call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildCall {
    IsBuilding { job: String },
    Schedule(BuildRequest),
}

#[derive(Clone, Default)]
pub struct FakeBuildRequester {
    building: Arc<Mutex<HashSet<String>>>,
    fail: Arc<Mutex<Option<BuildError>>>,
    calls: Arc<Mutex<Vec<BuildCall>>>,
}

impl FakeBuildRequester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<BuildCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Build requests received, in order
    pub fn requests(&self) -> Vec<BuildRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BuildCall::Schedule(r) => Some(r),
                BuildCall::IsBuilding { .. } => None,
            })
            .collect()
    }

    pub fn set_building(&self, job: &str, building: bool) {
        let mut set = self.building.lock().unwrap_or_else(|e| e.into_inner());
        if building {
            set.insert(job.to_string());
        } else {
            set.remove(job);
        }
    }

    pub fn fail_with(&self, error: BuildError) {
        *self.fail.lock().unwrap_or_else(|e| e.into_inner()) = Some(error);
    }
}

#[async_trait]
impl BuildRequester for FakeBuildRequester {
    async fn is_building(&self, job: &str) -> Result<bool, BuildError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(BuildCall::IsBuilding {
                job: job.to_string(),
            });
        Ok(self
            .building
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(job))
    }

    async fn schedule_build(&self, request: BuildRequest) -> Result<(), BuildError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(BuildCall::Schedule(request));
        match self.fail.lock().unwrap_or_else(|e| e.into_inner()).clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
