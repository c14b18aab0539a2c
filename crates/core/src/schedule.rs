// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron-style polling schedules
//!
//! A schedule spec holds one five-field cron line per line (`min hour dom
//! month dow`), `#` comments and `@param` annotations. Lines are normalised
//! to the seven-field form of the `cron` crate, which does the matching.

use chrono::{DateTime, TimeZone, Timelike};
use cron::Schedule;
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing a schedule spec
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("invalid schedule line '{line}': {reason}")]
    InvalidLine { line: String, reason: String },
    #[error("schedule line '{line}' has {found} fields, expected 5")]
    FieldCount { line: String, found: usize },
    #[error("hash ('H') tokens are not supported in '{0}'")]
    HashToken(String),
}

/// A single parsed schedule line
#[derive(Debug, Clone)]
pub struct CronLine {
    source: String,
    schedule: Schedule,
}

impl CronLine {
    pub fn parse(line: &str) -> Result<Self, ScheduleError> {
        let line = line.trim();
        let expanded = expand_alias(line).unwrap_or(line);

        let fields: Vec<&str> = expanded.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(ScheduleError::FieldCount {
                line: line.to_string(),
                found: fields.len(),
            });
        }
        if fields
            .iter()
            .any(|f| f.split(|c: char| !c.is_ascii_alphabetic()).any(|t| t == "H"))
        {
            return Err(ScheduleError::HashToken(line.to_string()));
        }

        let normalized = format!(
            "0 {} {} {} {} {} *",
            fields[0],
            fields[1],
            fields[2],
            fields[3],
            translate_day_of_week(fields[4])
        );
        let schedule = Schedule::from_str(&normalized).map_err(|e| ScheduleError::InvalidLine {
            line: line.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            source: line.to_string(),
            schedule,
        })
    }

    /// The line as written in the spec
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when `at`, truncated to the minute, is a firing time of this line
    pub fn matches<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
        let minute = at
            .clone()
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or_else(|| at.clone());
        self.schedule.includes(minute)
    }
}

/// A full schedule spec: any matching line fires
#[derive(Debug, Clone, Default)]
pub struct CronSchedule {
    lines: Vec<CronLine>,
}

impl CronSchedule {
    pub fn parse(spec: &str) -> Result<Self, ScheduleError> {
        let lines = spec
            .lines()
            .map(str::trim)
            .filter(|l| is_schedule_line(l))
            .map(CronLine::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[CronLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn matches<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
        self.lines.iter().any(|l| l.matches(at))
    }
}

/// True for lines that carry a schedule (not blank, comment or annotation)
pub(crate) fn is_schedule_line(line: &str) -> bool {
    !line.is_empty() && !line.starts_with('#') && crate::params::parse_annotation(line).is_none()
}

fn expand_alias(line: &str) -> Option<&'static str> {
    match line {
        "@yearly" | "@annually" => Some("0 0 1 1 *"),
        "@monthly" => Some("0 0 1 * *"),
        "@weekly" => Some("0 0 * * 0"),
        "@daily" | "@midnight" => Some("0 0 * * *"),
        "@hourly" => Some("0 * * * *"),
        _ => None,
    }
}

/// Translate a Unix day-of-week field (0 and 7 are Sunday) into the `cron`
/// crate's numbering (1 is Sunday, 7 is Saturday).
///
/// Numeric items are expanded into explicit day lists; items that use day
/// names are passed through unchanged.
pub fn translate_day_of_week(field: &str) -> String {
    if field == "*" || field == "?" {
        return field.to_string();
    }

    let mut out: Vec<String> = Vec::new();
    for item in field.split(',') {
        match expand_numeric_item(item) {
            Some(days) => {
                for day in days {
                    let cron_day = (day % 7 + 1).to_string();
                    if !out.contains(&cron_day) {
                        out.push(cron_day);
                    }
                }
            }
            None => out.push(item.to_string()),
        }
    }
    out.join(",")
}

// Expand `n`, `a-b`, `*/s`, `a-b/s` or `a/s` into Unix day numbers
fn expand_numeric_item(item: &str) -> Option<Vec<u32>> {
    let (range, step) = match item.split_once('/') {
        Some((r, s)) => (r, s.parse::<u32>().ok().filter(|s| *s > 0)?),
        None => (item, 1),
    };

    let (start, end) = if range == "*" {
        (0, 6)
    } else if let Some((a, b)) = range.split_once('-') {
        (a.parse::<u32>().ok()?, b.parse::<u32>().ok()?)
    } else {
        let n = range.parse::<u32>().ok()?;
        // `n/s` means from n through the end of the week
        if item.contains('/') {
            (n, 6)
        } else {
            (n, n)
        }
    };

    if start > end || end > 7 {
        return None;
    }
    Some((start..=end).step_by(step as usize).collect())
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
