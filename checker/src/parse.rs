//! Line-oriented checker output parsing.
//!
//! With the fixed flags this crate always passes, the checker prints one
//! finding per line:
//!
//! ```text
//! <path>:<line>:<col>:<end_line>:<end_col>: <severity>: <message> [<rule>]
//! ```
//!
//! where the `[<rule>]` suffix is optional and all positions are 1-indexed.
//! Parsing is total: malformed lines are logged and skipped, and findings
//! for files other than the one being checked (imported-module noise) are
//! discarded. Columns are converted to this workspace's 0-indexed
//! convention here, at the boundary.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use sidelight_types::{Diagnostic, Position, Severity, Span};

fn finding_line() -> &'static Regex {
    static FINDING_LINE: OnceLock<Regex> = OnceLock::new();
    FINDING_LINE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?P<path>.+):(?P<line>\d+):(?P<col>\d+):(?P<end_line>\d+):(?P<end_col>\d+):\s+(?P<severity>[a-z]+):\s+(?P<message>.*?)(?:\s+\[(?P<rule>[a-z]+)\])?$",
        )
        .expect("valid finding line regex")
    })
}

/// Parse one checker run's captured stdout into findings for `active_file`.
///
/// Never fails. Paths are compared after collapsing `.` and `..`
/// components, so the checker reporting `/proj/./app.py` still matches an
/// active file of `/proj/app.py`.
#[must_use]
pub fn parse_output(stdout: &str, active_file: &Path) -> Vec<Diagnostic> {
    let active = normalize_path(active_file);
    let mut findings = Vec::new();
    for raw in stdout.split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(finding) if normalize_path(finding.path()) == active => {
                findings.push(finding);
            }
            Some(other) => {
                tracing::trace!(
                    path = %other.path().display(),
                    "Dropping finding for a file other than the active one"
                );
            }
            None => {
                tracing::debug!("Unparseable checker line: {line}");
            }
        }
    }
    findings
}

/// Parse a single output line, or `None` if it does not match the grammar.
///
/// Numbers too large for `u32` fail the parse rather than wrapping.
fn parse_line(line: &str) -> Option<Diagnostic> {
    let caps = finding_line().captures(line)?;
    let start = Position::new(
        caps["line"].parse().ok()?,
        from_checker_col(caps["col"].parse().ok()?),
    );
    let end = Position::new(
        caps["end_line"].parse().ok()?,
        from_checker_col(caps["end_col"].parse().ok()?),
    );
    Some(Diagnostic::new(
        PathBuf::from(&caps["path"]),
        Span::new(start, end),
        Severity::from_code(&caps["severity"]),
        caps["message"].to_string(),
        caps.name("rule").map(|m| m.as_str().to_string()),
    ))
}

/// The checker prints 1-indexed columns; internally columns are 0-indexed.
fn from_checker_col(col: u32) -> u32 {
    col.saturating_sub(1)
}

pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut out = Vec::new();
    for c in path.components() {
        match c {
            std::path::Component::ParentDir => {
                out.pop();
            }
            std::path::Component::CurDir => {}
            other => out.push(other),
        }
    }
    out.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active() -> PathBuf {
        PathBuf::from("/proj/app.py")
    }

    // ── Line grammar ────────────────────────────────────────────────────

    #[test]
    fn test_parse_full_finding_line() {
        let out = "/proj/app.py:10:5:10:12: error: Incompatible types [assignment]\n";
        let findings = parse_output(out, &active());
        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.severity(), Severity::Error);
        assert_eq!(finding.message(), "Incompatible types");
        assert_eq!(finding.rule(), Some("assignment"));
        // Columns shift to 0-indexed; lines stay 1-indexed.
        assert_eq!(finding.span().start, Position::new(10, 4));
        assert_eq!(finding.span().end, Position::new(10, 11));
    }

    #[test]
    fn test_parse_line_without_rule_suffix() {
        let out = "/proj/app.py:3:1:3:9: note: Revealed type is \"builtins.int\"\n";
        let findings = parse_output(out, &active());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity(), Severity::Note);
        assert_eq!(findings[0].rule(), None);
        assert_eq!(findings[0].message(), "Revealed type is \"builtins.int\"");
    }

    #[test]
    fn test_parse_hyphenated_bracket_tag_stays_in_message() {
        // The rule group is strictly letters; a hyphenated tag is message
        // text, which keeps round-trip rendering faithful.
        let out = "/proj/app.py:1:1:1:2: error: Bad argument [arg-type]\n";
        let findings = parse_output(out, &active());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule(), None);
        assert_eq!(findings[0].message(), "Bad argument [arg-type]");
    }

    #[test]
    fn test_parse_brackets_inside_message() {
        let out = "/proj/app.py:2:1:2:4: error: Name [x] is not defined [name]\n";
        let findings = parse_output(out, &active());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message(), "Name [x] is not defined");
        assert_eq!(findings[0].rule(), Some("name"));
    }

    #[test]
    fn test_parse_severity_word_is_case_insensitive() {
        let out = "/proj/app.py:1:1:1:2: ERROR: shouting\n";
        let findings = parse_output(out, &active());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity(), Severity::Error);
    }

    #[test]
    fn test_parse_unknown_severity_word() {
        let out = "/proj/app.py:1:1:1:2: fatal: cannot continue\n";
        let findings = parse_output(out, &active());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity(), Severity::Unknown);
    }

    #[test]
    fn test_parse_first_column_maps_to_zero() {
        let out = "/proj/app.py:1:1:1:1: error: x\n";
        let findings = parse_output(out, &active());
        assert_eq!(findings[0].span().start, Position::new(1, 0));
        assert_eq!(findings[0].span().end, Position::new(1, 0));
    }

    #[test]
    fn test_parse_path_containing_colons() {
        let out = "/proj/odd:name.py:1:1:1:2: error: x\n";
        let findings = parse_output(out, Path::new("/proj/odd:name.py"));
        assert_eq!(findings.len(), 1);
    }

    // ── Totality ────────────────────────────────────────────────────────

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_output("", &active()).is_empty());
    }

    #[test]
    fn test_parse_skips_garbage_lines_and_keeps_the_rest() {
        let out = "\
/proj/app.py:1:1:1:2: error: first
Traceback (most recent call last):
/proj/app.py:5:1:5:2: warning: second
";
        let findings = parse_output(out, &active());
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].message(), "first");
        assert_eq!(findings[1].message(), "second");
    }

    #[test]
    fn test_parse_arbitrary_text_yields_nothing() {
        let out = "no findings here\njust: words\n\n  \u{1b}[31mcolor\u{1b}[0m\n";
        assert!(parse_output(out, &active()).is_empty());
    }

    #[test]
    fn test_parse_overflowing_line_number_is_skipped() {
        let out = "/proj/app.py:99999999999:1:99999999999:2: error: x\n";
        assert!(parse_output(out, &active()).is_empty());
    }

    #[test]
    fn test_parse_handles_crlf_line_endings() {
        let out = "/proj/app.py:1:1:1:2: error: x\r\n";
        assert_eq!(parse_output(out, &active()).len(), 1);
    }

    // ── Active-file filtering ───────────────────────────────────────────

    #[test]
    fn test_parse_drops_findings_for_other_files() {
        let out = "\
/proj/app.py:1:1:1:2: error: mine
/proj/dep.py:9:1:9:2: error: imported module noise
";
        let findings = parse_output(out, &active());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message(), "mine");
    }

    #[test]
    fn test_parse_matches_paths_after_normalization() {
        let out = "/proj/./app.py:1:1:1:2: error: dotted\n";
        assert_eq!(parse_output(out, &active()).len(), 1);

        let out = "/proj/sub/../app.py:1:1:1:2: error: parented\n";
        assert_eq!(parse_output(out, &active()).len(), 1);
    }

    #[test]
    fn test_parse_preserves_emission_order() {
        let out = "\
/proj/app.py:7:1:7:2: warning: w
/proj/app.py:2:1:2:2: error: e
/proj/app.py:9:1:9:2: note: n
";
        let findings = parse_output(out, &active());
        let messages: Vec<&str> = findings.iter().map(Diagnostic::message).collect();
        assert_eq!(messages, ["w", "e", "n"]);
    }
}
