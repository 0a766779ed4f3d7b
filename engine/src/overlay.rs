//! The range-overlay index.
//!
//! Holds the active file's findings with live anchors and answers the two
//! renderer questions: what color does a gutter line get, and what does
//! its tooltip say. The set is replaced wholesale when a check commits and
//! never mutated in place, so every query sees one coherent run. Queries
//! walk the set linearly; a checker run for a single file stays far too
//! small for that to matter.

use sidelight_types::{Diagnostic, Position, Severity, Span, TextEdit};

use crate::anchor::AnchoredRange;
use crate::markup;

/// A gutter draw instruction: fill the queried cell with `color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GutterPaint {
    /// Worst severity among the findings touching the cell.
    pub severity: Severity,
    /// `#rrggbb` fill for that severity.
    pub color: &'static str,
}

#[derive(Debug)]
struct Entry {
    diagnostic: Diagnostic,
    range: AnchoredRange,
}

/// Anchored finding set for one view.
#[derive(Debug, Default)]
pub struct OverlayIndex {
    entries: Vec<Entry>,
}

impl OverlayIndex {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Replace the whole set with a fresh run's findings, re-anchoring
    /// every span at its reported position.
    pub fn replace(&mut self, diagnostics: Vec<Diagnostic>) {
        self.entries = diagnostics
            .into_iter()
            .map(|diagnostic| Entry {
                range: AnchoredRange::for_span(diagnostic.span()),
                diagnostic,
            })
            .collect();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shift every anchor for one buffer edit.
    pub fn apply_edit(&mut self, edit: &TextEdit) {
        for entry in &mut self.entries {
            entry.range.apply(edit);
        }
    }

    /// Findings whose live range touches the closed interval
    /// `[start, end]`, in checker emission order. Findings whose anchors
    /// have both died are never returned.
    #[must_use]
    pub fn query_range(&self, start: Position, end: Position) -> Vec<&Diagnostic> {
        let query = Span::new(start, end);
        self.entries
            .iter()
            .filter(|entry| {
                entry
                    .range
                    .resolve()
                    .is_some_and(|live| live.overlaps(&query))
            })
            .map(|entry| &entry.diagnostic)
            .collect()
    }

    /// Worst-severity paint for the gutter cells of lines
    /// `first..=last`, or `None` when nothing touches them.
    ///
    /// The queried interval runs to the start of the line after `last`,
    /// so a finding touching either boundary counts.
    #[must_use]
    pub fn paint_for_lines(&self, first: u32, last: u32) -> Option<GutterPaint> {
        let start = Position::line_start(first);
        let end = Position::line_start(last.saturating_add(1));
        let worst = self
            .query_range(start, end)
            .into_iter()
            .map(Diagnostic::severity)
            .max()?;
        Some(GutterPaint {
            severity: worst,
            color: worst.color(),
        })
    }

    /// Paint for a single gutter line.
    #[must_use]
    pub fn paint_for_line(&self, line: u32) -> Option<GutterPaint> {
        self.paint_for_lines(line, line)
    }

    /// Combined tooltip markup for one line, or `None` when there is
    /// nothing to show there.
    #[must_use]
    pub fn tooltip_for_line(&self, line: u32) -> Option<String> {
        let start = Position::line_start(line);
        let end = Position::line_start(line.saturating_add(1));
        let hits = self.query_range(start, end);
        if hits.is_empty() {
            return None;
        }
        Some(markup::tooltip(&hits))
    }
}
