// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use yare::parameterized;

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

#[parameterized(
    sunday_zero = { "0", "1" },
    sunday_seven = { "7", "1" },
    weekdays = { "1-5", "2,3,4,5,6" },
    through_sunday = { "5-7", "6,7,1" },
    whole_week = { "0-6", "1,2,3,4,5,6,7" },
    list = { "1,3,5", "2,4,6" },
    every_other = { "*/2", "1,3,5,7" },
    star = { "*", "*" },
    names = { "MON-FRI", "MON-FRI" },
)]
fn translates_day_of_week(input: &str, expected: &str) {
    assert_eq!(translate_day_of_week(input), expected);
}

#[test]
fn every_minute_matches_anything() {
    let line = CronLine::parse("* * * * *").unwrap();
    assert!(line.matches(&at(2024, 1, 1, 0, 0)));
    assert!(line.matches(&at(2024, 7, 19, 13, 37)));
}

#[test]
fn matching_ignores_seconds() {
    let line = CronLine::parse("30 12 * * *").unwrap();
    let t = Utc.with_ymd_and_hms(2024, 5, 6, 12, 30, 42).unwrap();
    assert!(line.matches(&t));
}

#[test]
fn step_minutes() {
    let line = CronLine::parse("*/15 * * * *").unwrap();
    assert!(line.matches(&at(2024, 5, 6, 9, 45)));
    assert!(!line.matches(&at(2024, 5, 6, 9, 46)));
}

#[test]
fn sunday_is_zero() {
    // 2024-06-02 is a Sunday, 2024-06-03 a Monday
    let line = CronLine::parse("0 8 * * 0").unwrap();
    assert!(line.matches(&at(2024, 6, 2, 8, 0)));
    assert!(!line.matches(&at(2024, 6, 3, 8, 0)));
}

#[test]
fn weekday_range_excludes_weekend() {
    let line = CronLine::parse("0 8 * * 1-5").unwrap();
    assert!(line.matches(&at(2024, 6, 3, 8, 0)));
    assert!(line.matches(&at(2024, 6, 7, 8, 0)));
    assert!(!line.matches(&at(2024, 6, 8, 8, 0)));
    assert!(!line.matches(&at(2024, 6, 2, 8, 0)));
}

#[parameterized(
    daily = { "@daily", 2024, 6, 4, 0, 0 },
    midnight = { "@midnight", 2024, 6, 4, 0, 0 },
    hourly = { "@hourly", 2024, 6, 4, 17, 0 },
    monthly = { "@monthly", 2024, 6, 1, 0, 0 },
    yearly = { "@yearly", 2024, 1, 1, 0, 0 },
    weekly = { "@weekly", 2024, 6, 2, 0, 0 },
)]
fn aliases_fire(alias: &str, y: i32, mo: u32, d: u32, h: u32, mi: u32) {
    let line = CronLine::parse(alias).unwrap();
    assert!(line.matches(&at(y, mo, d, h, mi)));
}

#[test]
fn hash_tokens_are_rejected() {
    assert_eq!(
        CronLine::parse("H/15 * * * *").unwrap_err(),
        ScheduleError::HashToken("H/15 * * * *".to_string())
    );
}

#[test]
fn wrong_field_count_is_rejected() {
    let err = CronLine::parse("* * * *").unwrap_err();
    assert_eq!(
        err,
        ScheduleError::FieldCount {
            line: "* * * *".to_string(),
            found: 4
        }
    );
}

#[test]
fn out_of_range_is_invalid() {
    assert!(matches!(
        CronLine::parse("61 * * * *"),
        Err(ScheduleError::InvalidLine { .. })
    ));
}

#[test]
fn schedule_skips_comments_and_annotations() {
    let spec = "# nightly\n#@param TARGET all\n\n0 2 * * *\n@param OTHER x\n30 14 * * *\n";
    let schedule = CronSchedule::parse(spec).unwrap();
    assert_eq!(schedule.lines().len(), 2);
    assert!(schedule.matches(&at(2024, 6, 4, 2, 0)));
    assert!(schedule.matches(&at(2024, 6, 4, 14, 30)));
    assert!(!schedule.matches(&at(2024, 6, 4, 14, 31)));
}

#[test]
fn empty_schedule_never_matches() {
    let schedule = CronSchedule::parse("").unwrap();
    assert!(schedule.is_empty());
    assert!(!schedule.matches(&at(2024, 6, 4, 2, 0)));
}

proptest! {
    #[test]
    fn single_day_maps_into_cron_range(day in 0u32..=7) {
        let translated = translate_day_of_week(&day.to_string());
        let n: u32 = translated.parse().unwrap();
        prop_assert!((1..=7).contains(&n));
        prop_assert_eq!(n, day % 7 + 1);
    }
}
