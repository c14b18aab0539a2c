// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directives scraped from poll-log output
//!
//! Scripts can steer the triggered build by printing tags:
//! `<cause>…</cause>` sets the build cause (first occurrence wins) and
//! `<description>…</description>` sets the build description (last
//! occurrence wins).

const CAUSE: (&str, &str) = ("<cause>", "</cause>");
const DESCRIPTION: (&str, &str) = ("<description>", "</description>");

/// All substrings enclosed by `open` and `close`, in order of appearance
pub fn substrings_between<'a>(text: &'a str, open: &str, close: &str) -> Vec<&'a str> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(open) {
        let after = &rest[start + open.len()..];
        let Some(end) = after.find(close) else {
            break;
        };
        found.push(&after[..end]);
        rest = &after[end + close.len()..];
    }
    found
}

/// The first `<cause>` in the log, if any
pub fn extract_cause(log: &str) -> Option<String> {
    substrings_between(log, CAUSE.0, CAUSE.1)
        .first()
        .map(|s| s.to_string())
}

/// The last `<description>` in the log, if any
pub fn extract_description(log: &str) -> Option<String> {
    substrings_between(log, DESCRIPTION.0, DESCRIPTION.1)
        .last()
        .map(|s| s.to_string())
}

#[cfg(test)]
#[path = "directives_tests.rs"]
mod tests;
