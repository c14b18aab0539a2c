// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build parameters carried by schedule annotations
//!
//! A schedule spec may annotate its lines with parameters:
//!
//! ```text
//! #@param TARGET nightly
//! #@param CLEAN
//! 0 2 * * *
//! ```
//!
//! Annotations accumulate for the next schedule line only. When that line
//! matches the poll time the accumulated set is the cycle's parameter set.

use crate::schedule::{is_schedule_line, CronLine, ScheduleError};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Build parameters, ordered by name
pub type Parameters = BTreeMap<String, String>;

const ANNOTATION: &str = "@param";

/// Parse a `#@param name [value]` annotation line.
///
/// Whitespace between `#` and `@param` is allowed, as is a bare `@param`
/// line. Returns `None` for anything that is not an annotation. A name with
/// no value maps to the empty string.
pub fn parse_annotation(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    let body = line.strip_prefix('#').map(str::trim_start).unwrap_or(line);
    let rest = body.strip_prefix(ANNOTATION)?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let rest = rest.trim();
    if rest.is_empty() {
        return None;
    }
    match rest.split_once(char::is_whitespace) {
        Some((name, value)) => Some((name.to_string(), value.trim().to_string())),
        None => Some((rest.to_string(), String::new())),
    }
}

/// Find the parameters attached to the first schedule line matching `at`.
///
/// Comment and blank lines are skipped. A schedule line that does not match
/// clears the annotations gathered so far. No match yields an empty set.
pub fn find_parameters<Tz: TimeZone>(
    spec: &str,
    at: &DateTime<Tz>,
) -> Result<Parameters, ScheduleError> {
    let mut parameters = Parameters::new();
    for line in spec.lines().map(str::trim) {
        if let Some((name, value)) = parse_annotation(line) {
            parameters.insert(name, value);
            continue;
        }
        if !is_schedule_line(line) {
            continue;
        }
        if CronLine::parse(line)?.matches(at) {
            return Ok(parameters);
        }
        parameters.clear();
    }
    Ok(Parameters::new())
}

/// How properties-file parameters and schedule parameters combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Schedule parameters are applied last and win on conflicts
    #[default]
    CronOverridesFile,
    /// File parameters are applied last and win on conflicts
    FileOverridesCron,
    FileOnly,
    CronOnly,
}

impl MergePolicy {
    pub fn merge(self, file: Parameters, cron: Parameters) -> Parameters {
        match self {
            MergePolicy::CronOverridesFile => file.into_iter().chain(cron).collect(),
            MergePolicy::FileOverridesCron => cron.into_iter().chain(file).collect(),
            MergePolicy::FileOnly => file,
            MergePolicy::CronOnly => cron,
        }
    }
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
