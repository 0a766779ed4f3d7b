//! A single checker finding.

use std::path::{Path, PathBuf};

use crate::{Severity, Span};

/// One finding reported by the external checker, scoped to a file.
///
/// Fields are private: a diagnostic is immutable once constructed, and
/// every value passing through the engine carries positions in this
/// workspace's convention (1-indexed lines, 0-indexed columns). The parser
/// converts the checker's 1-indexed columns before construction, so
/// nothing downstream needs to know what the checker printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    path: PathBuf,
    span: Span,
    severity: Severity,
    message: String,
    rule: Option<String>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(
        path: PathBuf,
        span: Span,
        severity: Severity,
        message: String,
        rule: Option<String>,
    ) -> Self {
        Self {
            path,
            span,
            severity,
            message,
            rule,
        }
    }

    /// File the finding was reported against.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reported extent within the file.
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Rule tag from the trailing `[rule]` suffix, if the checker printed
    /// one.
    #[must_use]
    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }

    /// Single-line rendering for logs: `path:line:col: severity: message`,
    /// with the column restored to the 1-indexed form the checker prints.
    #[must_use]
    pub fn display_line(&self) -> String {
        let start = self.span.start;
        let rule = match &self.rule {
            Some(rule) => format!(" [{rule}]"),
            None => String::new(),
        };
        format!(
            "{}:{}:{}: {}: {}{}",
            self.path.display(),
            start.line,
            start.col + 1,
            self.severity,
            self.message,
            rule,
        )
    }
}
