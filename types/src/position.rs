//! Buffer positions and spans.
//!
//! Lines are 1-indexed, matching checker output; columns are 0-indexed
//! character offsets within their line. Checker output carries 1-indexed
//! columns, and the parser converts them at the boundary so every position
//! inside this workspace means the same thing.

/// A caret position between characters in a text buffer.
///
/// Ordering is line-major: all positions on line 3 sort before every
/// position on line 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// 1-indexed line number.
    pub line: u32,
    /// 0-indexed character column within the line.
    pub col: u32,
}

impl Position {
    #[must_use]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// Start of a 1-indexed line.
    #[must_use]
    pub const fn line_start(line: u32) -> Self {
        Self { line, col: 0 }
    }
}

/// A closed range between two positions.
///
/// Both endpoints are inclusive for overlap purposes: two spans that meet
/// at a single position count as overlapping. Zero-width spans (start ==
/// end) are valid and still participate in queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Zero-width span at a single position.
    #[must_use]
    pub const fn point(at: Position) -> Self {
        Self { start: at, end: at }
    }

    /// Closed-interval intersection: true unless one span lies strictly
    /// past the other.
    #[must_use]
    pub fn overlaps(&self, other: &Span) -> bool {
        !(self.start > other.end || self.end < other.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering_is_line_major() {
        assert!(Position::new(2, 0) > Position::new(1, 99));
        assert!(Position::new(3, 4) < Position::new(4, 0));
    }

    #[test]
    fn test_position_ordering_breaks_ties_by_column() {
        assert!(Position::new(5, 3) < Position::new(5, 4));
        assert_eq!(Position::new(5, 3), Position::new(5, 3));
    }

    #[test]
    fn test_disjoint_spans_do_not_overlap() {
        let a = Span::new(Position::new(1, 0), Position::new(1, 5));
        let b = Span::new(Position::new(2, 0), Position::new(2, 5));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_touching_endpoints_count_as_overlap() {
        let a = Span::new(Position::new(1, 0), Position::new(1, 5));
        let b = Span::new(Position::new(1, 5), Position::new(1, 9));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_nested_span_overlaps() {
        let outer = Span::new(Position::new(1, 0), Position::new(9, 0));
        let inner = Span::new(Position::new(3, 2), Position::new(3, 8));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_zero_width_span_overlaps_containing_span() {
        let range = Span::new(Position::new(2, 0), Position::new(2, 10));
        let point = Span::point(Position::new(2, 4));
        assert!(range.overlaps(&point));
        assert!(point.overlaps(&range));
    }

    #[test]
    fn test_two_identical_points_overlap() {
        let p = Span::point(Position::new(7, 0));
        assert!(p.overlaps(&p));
    }
}
