// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment macro resolution for scripts, expressions and paths

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

// Matches ${VAR} (group 1) or $VAR (group 2)
#[allow(clippy::expect_used)]
static MACRO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_.]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("constant regex pattern is valid")
});

/// Replace `${VAR}` and `$VAR` references with values from `env`.
///
/// Unknown variables are left as-is, so shell-local variables in a script
/// survive resolution untouched.
pub fn replace_macro(text: &str, env: &BTreeMap<String, String>) -> String {
    MACRO_PATTERN
        .replace_all(text, |caps: &regex::Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            env.get(name)
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
#[path = "macros_tests.rs"]
mod tests;
