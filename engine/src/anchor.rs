//! Live position anchors.
//!
//! Findings are produced against a snapshot of the buffer, but the user
//! keeps typing while the next check is pending. Anchors keep each
//! finding's endpoints pointing at the text they were reported for: edits
//! before an anchor shift it, edits after it leave it alone, and deleting
//! the text around an anchor retires it. The arithmetic runs entirely in
//! line/column space on the [`TextEdit`] values hosts report; the engine
//! never re-reads buffer contents.

use sidelight_types::{Position, Span, TextEdit};

/// Which way an anchor leans when text is inserted exactly at it.
///
/// A span's start anchor leans right, so text typed at the very start of
/// the reported range pushes the whole range along instead of growing it.
/// The end anchor leans left, so text typed at the very end is not
/// swallowed into the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gravity {
    Left,
    Right,
}

/// One tracked position, alive until the text around it is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Anchor {
    Alive { pos: Position, gravity: Gravity },
    Gone,
}

impl Anchor {
    pub(crate) fn new(pos: Position, gravity: Gravity) -> Self {
        Anchor::Alive { pos, gravity }
    }

    pub(crate) fn position(self) -> Option<Position> {
        match self {
            Anchor::Alive { pos, .. } => Some(pos),
            Anchor::Gone => None,
        }
    }

    /// Shift this anchor for one buffer edit. Gone anchors stay gone.
    pub(crate) fn apply(&mut self, edit: &TextEdit) {
        let Anchor::Alive { pos, gravity } = *self else {
            return;
        };
        match *edit {
            TextEdit::Insert {
                at,
                lines,
                trailing_cols,
            } => {
                let moves = match pos.cmp(&at) {
                    std::cmp::Ordering::Greater => true,
                    std::cmp::Ordering::Equal => gravity == Gravity::Right,
                    std::cmp::Ordering::Less => false,
                };
                if moves {
                    *self = Anchor::Alive {
                        pos: shifted_by_insert(pos, at, lines, trailing_cols),
                        gravity,
                    };
                }
            }
            TextEdit::Delete { from, to } => {
                if pos <= from {
                    return;
                }
                if pos < to {
                    // Strictly inside the removed range: the text this
                    // anchor pointed into no longer exists.
                    *self = Anchor::Gone;
                    return;
                }
                *self = Anchor::Alive {
                    pos: shifted_by_delete(pos, from, to),
                    gravity,
                };
            }
        }
    }
}

/// New position for an anchor at or past an insertion point.
fn shifted_by_insert(pos: Position, at: Position, lines: u32, trailing_cols: u32) -> Position {
    if pos.line != at.line {
        // Later line: only the line number moves.
        return Position::new(pos.line + lines, pos.col);
    }
    if lines == 0 {
        Position::new(pos.line, pos.col + trailing_cols)
    } else {
        // The tail of the edited line, anchor included, lands after the
        // inserted text's last newline.
        Position::new(pos.line + lines, trailing_cols + (pos.col - at.col))
    }
}

/// New position for an anchor at or past the end of a deleted range.
fn shifted_by_delete(pos: Position, from: Position, to: Position) -> Position {
    if pos.line == to.line {
        // The tail of the deletion's last line rebases onto `from`'s line.
        Position::new(from.line, from.col + (pos.col - to.col))
    } else {
        Position::new(pos.line - (to.line - from.line), pos.col)
    }
}

/// A finding's tracked extent: independent start and end anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AnchoredRange {
    start: Anchor,
    end: Anchor,
}

impl AnchoredRange {
    /// Anchor a reported span: right-gravity start, left-gravity end.
    pub(crate) fn for_span(span: Span) -> Self {
        Self {
            start: Anchor::new(span.start, Gravity::Right),
            end: Anchor::new(span.end, Gravity::Left),
        }
    }

    pub(crate) fn apply(&mut self, edit: &TextEdit) {
        self.start.apply(edit);
        self.end.apply(edit);
    }

    /// Resolve to a queryable span, if anything is left to point at.
    ///
    /// One dead endpoint degrades the range to a zero-width point at the
    /// survivor; two dead endpoints take the finding out of query results
    /// entirely.
    pub(crate) fn resolve(&self) -> Option<Span> {
        match (self.start.position(), self.end.position()) {
            (Some(start), Some(end)) => Some(Span::new(start, end)),
            (Some(start), None) => Some(Span::point(start)),
            (None, Some(end)) => Some(Span::point(end)),
            (None, None) => None,
        }
    }
}
