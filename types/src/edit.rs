//! Structured buffer-change descriptions.
//!
//! Diagnostics are produced against a snapshot of the buffer, but the user
//! keeps typing. To keep its overlay anchored, the engine needs to know how
//! the text changed, not just that it changed; hosts translate their native
//! change notifications into these values.

use crate::Position;

/// One buffer mutation, described in line/column space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    /// Text inserted at `at`.
    Insert {
        at: Position,
        /// Number of newline characters in the inserted text.
        lines: u32,
        /// Characters after the last newline, or the whole inserted length
        /// when `lines` is zero.
        trailing_cols: u32,
    },
    /// The half-open character range `[from, to)` removed. `from` must not
    /// sort after `to`.
    Delete { from: Position, to: Position },
}

impl TextEdit {
    /// Describe inserting `text` at `at`.
    #[must_use]
    pub fn insert_text(at: Position, text: &str) -> Self {
        let lines = text.matches('\n').count() as u32;
        let trailing = text
            .rsplit('\n')
            .next()
            .unwrap_or(text)
            .chars()
            .count() as u32;
        TextEdit::Insert {
            at,
            lines,
            trailing_cols: trailing,
        }
    }

    /// Describe removing the characters between `from` and `to`.
    #[must_use]
    pub fn delete_range(from: Position, to: Position) -> Self {
        TextEdit::Delete { from, to }
    }
}
