// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use yare::parameterized;

fn params(pairs: &[(&str, &str)]) -> Parameters {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// 2024-06-02 is a Sunday
fn sunday_midnight() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap()
}

fn monday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 9, 10, 0).unwrap()
}

#[parameterized(
    hash_prefixed = { "#@param foo bar", Some(("foo", "bar")) },
    spaced = { "# @param foo bar", Some(("foo", "bar")) },
    bare = { "@param foo bar", Some(("foo", "bar")) },
    value_with_spaces = { "#@param msg hello   world ", Some(("msg", "hello   world")) },
    name_only = { "#@param CLEAN", Some(("CLEAN", "")) },
    no_name = { "#@param", None },
    glued = { "#@paramfoo bar", None },
    plain_comment = { "# nightly build", None },
    schedule = { "0 2 * * *", None },
)]
fn annotation_lines(line: &str, expected: Option<(&str, &str)>) {
    let expected = expected.map(|(k, v)| (k.to_string(), v.to_string()));
    assert_eq!(parse_annotation(line), expected);
}

#[test]
fn annotated_line_matching_yields_its_parameters() {
    let found = find_parameters("@param foo bar\n*/5 * * * *", &monday_morning()).unwrap();
    assert_eq!(found, params(&[("foo", "bar")]));
}

#[test]
fn sunday_block_returns_its_own_parameters() {
    let spec = "* * * * 1\n@param x y\n0 0 * * 0";
    let found = find_parameters(spec, &sunday_midnight()).unwrap();
    assert_eq!(found, params(&[("x", "y")]));
}

#[test]
fn monday_line_has_no_preceding_block() {
    let spec = "* * * * 1\n@param x y\n0 0 * * 0";
    let found = find_parameters(spec, &monday_morning()).unwrap();
    assert!(found.is_empty());
}

#[test]
fn non_matching_line_clears_accumulated_parameters() {
    let spec = "#@param a 1\n0 0 1 1 *\n#@param b 2\n* * * * *";
    let found = find_parameters(spec, &monday_morning()).unwrap();
    assert_eq!(found, params(&[("b", "2")]));
}

#[test]
fn blank_and_comment_lines_do_not_clear() {
    let spec = "#@param a 1\n\n# explanation\n#@param b 2\n* * * * *";
    let found = find_parameters(spec, &monday_morning()).unwrap();
    assert_eq!(found, params(&[("a", "1"), ("b", "2")]));
}

#[test]
fn later_annotation_with_same_name_wins() {
    let spec = "#@param a 1\n#@param a 2\n* * * * *";
    let found = find_parameters(spec, &monday_morning()).unwrap();
    assert_eq!(found, params(&[("a", "2")]));
}

#[test]
fn first_matching_line_stops_parsing() {
    let spec = "#@param first yes\n* * * * *\n#@param second yes\n* * * * *";
    let found = find_parameters(spec, &monday_morning()).unwrap();
    assert_eq!(found, params(&[("first", "yes")]));
}

#[test]
fn no_matching_line_yields_empty_set() {
    let spec = "#@param a 1\n0 0 1 1 *\n#@param trailing x";
    let found = find_parameters(spec, &monday_morning()).unwrap();
    assert!(found.is_empty());
}

#[test]
fn invalid_schedule_line_is_an_error() {
    let err = find_parameters("#@param a 1\nnot a cron", &monday_morning()).unwrap_err();
    assert!(matches!(err, ScheduleError::FieldCount { .. }));
}

#[test]
fn crlf_specs_are_handled() {
    let found = find_parameters("#@param a 1\r\n* * * * *\r\n", &monday_morning()).unwrap();
    assert_eq!(found, params(&[("a", "1")]));
}

#[parameterized(
    cron_wins = { MergePolicy::CronOverridesFile, &[("A", "file"), ("B", "cron"), ("C", "cron")] },
    file_wins = { MergePolicy::FileOverridesCron, &[("A", "file"), ("B", "file"), ("C", "cron")] },
    file_only = { MergePolicy::FileOnly, &[("A", "file"), ("B", "file")] },
    cron_only = { MergePolicy::CronOnly, &[("B", "cron"), ("C", "cron")] },
)]
fn merge_policies(policy: MergePolicy, expected: &[(&str, &str)]) {
    let file = params(&[("A", "file"), ("B", "file")]);
    let cron = params(&[("B", "cron"), ("C", "cron")]);
    assert_eq!(policy.merge(file, cron), params(expected));
}

proptest! {
    #[test]
    fn annotations_before_every_minute_are_returned(
        entries in proptest::collection::btree_map("[A-Za-z_][A-Za-z0-9_]{0,8}", "[a-z0-9]{0,8}", 0..6)
    ) {
        let mut spec: String = entries
            .iter()
            .map(|(k, v)| format!("#@param {k} {v}\n"))
            .collect();
        spec.push_str("* * * * *\n");
        let found = find_parameters(&spec, &monday_morning()).unwrap();
        prop_assert_eq!(found, entries);
    }
}
