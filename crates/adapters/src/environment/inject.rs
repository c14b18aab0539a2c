// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Variables from a job's `env_inject` block
//!
//! Static `vars` are applied first, then the properties `file`, which is
//! re-read on every call so edits take effect on the next poll.

use super::{EnvironmentError, EnvironmentSource};
use async_trait::async_trait;
use std::collections::BTreeMap;
use strig_core::properties::parse_properties;
use strig_core::JobConfig;

#[derive(Clone, Copy, Debug, Default)]
pub struct InjectedEnvironment;

impl InjectedEnvironment {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EnvironmentSource for InjectedEnvironment {
    fn is_active(&self, job: &JobConfig) -> bool {
        job.env_inject.is_some()
    }

    async fn variables(
        &self,
        job: &JobConfig,
    ) -> Result<BTreeMap<String, String>, EnvironmentError> {
        let Some(inject) = &job.env_inject else {
            return Ok(BTreeMap::new());
        };

        let mut vars = inject.vars.clone();
        if let Some(path) = &inject.file {
            let content =
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| EnvironmentError::File {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    })?;
            vars.extend(parse_properties(&content));
        }
        Ok(vars)
    }
}

#[cfg(test)]
#[path = "inject_tests.rs"]
mod tests;
