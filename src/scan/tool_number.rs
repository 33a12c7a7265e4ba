//! Tool-number detection for common NC/post-processor dialects.
//!
//! A line counts as a tool-number line when any of these forms appears:
//!
//! - `T10`, `T 10`, `T=10`, `T#10`, `T="10"`
//! - `TOOL 10`, `TOOL NO 10`, `TOOL NO. 10`, `TOOL: 10`
//! - `TOOL CALL 10`
//!
//! The matching is loose on purpose: any standalone `T` word followed by a
//! number counts, whatever it means in that dialect.

use std::sync::LazyLock;

use regex::{RegexSet, RegexSetBuilder};

const PATTERNS: [&str; 3] = [
    r#"\bT\s*[=#]?\s*"?\s*\d+\b"#,
    r"\bTOOL\s*(?:NO\.?)?\s*[=:]?\s*\d+\b",
    r"\bTOOL\s*CALL\s*\d+\b",
];

static CASE_SENSITIVE: LazyLock<RegexSet> = LazyLock::new(|| build(false));
static CASE_INSENSITIVE: LazyLock<RegexSet> = LazyLock::new(|| build(true));

#[allow(clippy::expect_used)]
fn build(case_insensitive: bool) -> RegexSet {
    RegexSetBuilder::new(PATTERNS)
        .case_insensitive(case_insensitive)
        .build()
        .expect("tool-number patterns are valid")
}

/// Returns true if `line` names a tool number in any supported form.
#[must_use]
pub fn is_tool_number_line(line: &str, case_sensitive: bool) -> bool {
    if line.is_empty() {
        return false;
    }

    let set = if case_sensitive {
        &*CASE_SENSITIVE
    } else {
        &*CASE_INSENSITIVE
    };
    set.is_match(line)
}
