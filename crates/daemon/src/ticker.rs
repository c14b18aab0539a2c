// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minute-aligned ticks

use chrono::{DateTime, Duration, DurationRound, Local};

/// The first whole minute strictly after `now`
pub fn next_minute(now: DateTime<Local>) -> DateTime<Local> {
    let floor = now.duration_trunc(Duration::minutes(1)).unwrap_or(now);
    floor + Duration::minutes(1)
}

/// Time to sleep from `now` until `next`; zero if `next` has passed
pub fn delay_until(now: DateTime<Local>, next: DateTime<Local>) -> std::time::Duration {
    (next - now).to_std().unwrap_or_default()
}

#[cfg(test)]
#[path = "ticker_tests.rs"]
mod tests;
