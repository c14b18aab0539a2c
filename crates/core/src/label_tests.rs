// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

const LINUX_DOCKER: &[&str] = &["linux-1", "linux", "docker"];

#[parameterized(
    atom = { "linux", true },
    node_name = { "linux-1", true },
    missing_atom = { "windows", false },
    and = { "linux && docker", true },
    and_missing = { "linux && windows", false },
    or = { "windows || docker", true },
    not = { "!windows", true },
    not_present = { "!linux", false },
    and_not = { "linux && !windows", true },
    precedence = { "windows && mac || docker", true },
    grouping = { "windows && (mac || docker)", false },
    double_not = { "!!linux", true },
    quoted = { "\"docker\"", true },
    no_spaces = { "linux&&docker", true },
)]
fn evaluates(expr: &str, expected: bool) {
    let parsed = LabelExpr::parse(expr).unwrap();
    assert_eq!(parsed.matches(LINUX_DOCKER), expected, "{expr}");
}

#[test]
fn and_binds_tighter_than_or() {
    let parsed = LabelExpr::parse("a || b && c").unwrap();
    assert_eq!(
        parsed,
        LabelExpr::Or(
            Box::new(LabelExpr::Atom("a".to_string())),
            Box::new(LabelExpr::And(
                Box::new(LabelExpr::Atom("b".to_string())),
                Box::new(LabelExpr::Atom("c".to_string())),
            )),
        )
    );
}

#[parameterized(
    empty = { "" },
    blank = { "   " },
)]
fn empty_expressions(expr: &str) {
    assert_eq!(LabelExpr::parse(expr), Err(LabelError::Empty));
}

#[parameterized(
    single_ampersand = { "a & b" },
    dangling_and = { "a &&" },
    unbalanced = { "(a || b" },
    stray_close = { "a )" },
    two_atoms = { "a b" },
    leading_or = { "|| a" },
    unterminated_quote = { "\"a" },
)]
fn malformed_expressions(expr: &str) {
    assert!(LabelExpr::parse(expr).is_err(), "{expr} should not parse");
}

#[test]
fn display_round_trips_structure() {
    let parsed = LabelExpr::parse("linux && !(windows || mac)").unwrap();
    assert_eq!(parsed.to_string(), "(linux && !(windows || mac))");
    assert_eq!(LabelExpr::parse(&parsed.to_string()).unwrap(), parsed);
}

#[test]
fn nesting_is_capped() {
    let nots = format!("{}linux", "!".repeat(100_000));
    assert_eq!(LabelExpr::parse(&nots), Err(LabelError::TooDeep(nots.clone())));

    let parens = format!("{}linux{}", "(".repeat(100_000), ")".repeat(100_000));
    assert!(matches!(LabelExpr::parse(&parens), Err(LabelError::TooDeep(_))));
}

#[test]
fn nesting_up_to_the_cap_parses() {
    let expr = format!("{}linux{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
    assert_eq!(LabelExpr::parse(&expr).unwrap(), LabelExpr::Atom("linux".into()));
}
