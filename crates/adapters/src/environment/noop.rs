// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment source that injects nothing

use super::{EnvironmentError, EnvironmentSource};
use async_trait::async_trait;
use std::collections::BTreeMap;
use strig_core::JobConfig;

#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpEnvironment;

impl NoOpEnvironment {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EnvironmentSource for NoOpEnvironment {
    fn is_active(&self, _job: &JobConfig) -> bool {
        false
    }

    async fn variables(
        &self,
        _job: &JobConfig,
    ) -> Result<BTreeMap<String, String>, EnvironmentError> {
        Ok(BTreeMap::new())
    }
}
