// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build requests POSTed as JSON to a build endpoint

use super::{BuildError, BuildRequest, BuildRequester};
use async_trait::async_trait;

#[derive(Clone, Debug)]
pub struct HttpBuildRequester {
    url: String,
}

impl HttpBuildRequester {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl BuildRequester for HttpBuildRequester {
    // The endpoint accepts requests only; it does not report running builds
    async fn is_building(&self, _job: &str) -> Result<bool, BuildError> {
        Ok(false)
    }

    async fn schedule_build(&self, request: BuildRequest) -> Result<(), BuildError> {
        let body = request
            .to_json()
            .map_err(|e| BuildError::Request(e.to_string()))?;
        let url = self.url.clone();

        // ureq is blocking
        tokio::task::spawn_blocking(move || {
            ureq::post(&url)
                .header("Content-Type", "application/json")
                .send(body.as_str())
                .map(|_| ())
                .map_err(|e| match e {
                    ureq::Error::StatusCode(code) => {
                        BuildError::Rejected(format!("HTTP {code} from {url}"))
                    }
                    other => BuildError::Request(other.to_string()),
                })
        })
        .await
        .map_err(|e| BuildError::Request(e.to_string()))?
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
