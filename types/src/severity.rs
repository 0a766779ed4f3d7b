//! Severity levels for checker findings.

use std::fmt;

/// Severity of a checker finding, from least to most alarming.
///
/// The ordering is the declaration order, so `max()` over a set of
/// severities picks the one to paint. `Unknown` deliberately sorts above
/// [`Error`](Severity::Error): a severity word this crate does not
/// recognize must never be silently under-flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational output attached to another finding.
    Note,
    /// A suspect construct that does not invalidate the file.
    Warning,
    /// A definite problem reported by the checker.
    Error,
    /// A severity word the parser did not recognize.
    Unknown,
}

impl Severity {
    /// Every severity, least severe first.
    pub const ALL: [Severity; 4] = [
        Severity::Note,
        Severity::Warning,
        Severity::Error,
        Severity::Unknown,
    ];

    /// Map a checker severity word to a level.
    ///
    /// Matching is ASCII case-insensitive; anything that is not a known
    /// code maps to [`Severity::Unknown`].
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        Severity::ALL
            .into_iter()
            .find(|level| level.code().eq_ignore_ascii_case(code))
            .unwrap_or(Severity::Unknown)
    }

    /// Short display code, matching what the checker prints.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Unknown => "?",
        }
    }

    /// Gutter and tooltip color as a `#rrggbb` hex string.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Severity::Note => "#007FFF",
            Severity::Warning => "#f5c200",
            Severity::Error => "#c01c28",
            Severity::Unknown => "#c64600",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
