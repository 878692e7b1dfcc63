//! Anchored selection with directional extension.
//!
//! A selection is grown by extend gestures: the first one fixes the anchor at the cursor's
//! position before the move, every later one moves the other endpoint to the cursor. The range
//! is always reported in document order, so when the moving endpoint crosses the anchor the
//! two swap roles as `start`/`end`.

use crate::position::Position;

/// Direction of the extend input that last moved the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionDirection {
    /// Towards the end of the document.
    Forward,
    /// Towards the start of the document.
    Backward,
}

/// A range between two positions with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SelectionRange {
    /// First selected position.
    pub start: Position,
    /// Last selected position.
    pub end: Position,
}

impl SelectionRange {
    /// Range between `a` and `b`, in whichever order they come.
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Returns `true` if start and end coincide.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether cell `(row, col)` lies inside the range. Both ends are inclusive.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        let (start, end) = (self.start, self.end);
        if row < start.line || row > end.line {
            return false;
        }
        if start.line == end.line {
            return start.column <= col && col <= end.column;
        }
        if row == start.line {
            col >= start.column
        } else if row == end.line {
            col <= end.column
        } else {
            true
        }
    }
}

/// Interactive selection state.
///
/// `idle` until the first [`SelectionModel::extend`]; back to `idle` on
/// [`SelectionModel::reset`] or when an extension leaves the range empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionModel {
    anchor: Position,
    head: Position,
    state: Option<SelectionDirection>,
}

impl SelectionModel {
    /// Create an idle selection at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current range in document order.
    pub fn range(&self) -> SelectionRange {
        SelectionRange::new(self.anchor, self.head)
    }

    /// Fixed endpoint of the current gesture.
    pub fn anchor(&self) -> Position {
        self.anchor
    }

    /// `Some(direction)` while extending, `None` when idle.
    pub fn state(&self) -> Option<SelectionDirection> {
        self.state
    }

    /// Returns `true` while an extension is in progress.
    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Apply one extend input that moved the cursor from `before` to `after`.
    pub fn extend(&mut self, before: Position, after: Position, direction: SelectionDirection) {
        match self.state {
            None => {
                self.anchor = before;
            }
            Some(current) if current != direction => {
                log::trace!("selection reversed to {direction:?}");
            }
            Some(_) => {}
        }
        self.head = after;
        self.state = if self.anchor == self.head {
            None
        } else {
            Some(direction)
        };
    }

    /// Collapse both endpoints onto `cursor` and go idle.
    pub fn reset(&mut self, cursor: Position) {
        self.anchor = cursor;
        self.head = cursor;
        self.state = None;
    }

    /// Membership of cell `(row, col)`; always `false` while idle.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.is_active() && self.range().contains(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    #[test]
    fn test_range_is_canonical() {
        let range = SelectionRange::new(p(3, 1), p(1, 4));
        assert_eq!(range.start, p(1, 4));
        assert_eq!(range.end, p(3, 1));
    }

    #[test]
    fn test_membership_multi_row() {
        let range = SelectionRange::new(p(1, 4), p(3, 2));
        assert!(!range.contains(0, 10));
        assert!(!range.contains(1, 3));
        assert!(range.contains(1, 4));
        assert!(range.contains(1, 99));
        assert!(range.contains(2, 0));
        assert!(range.contains(3, 2));
        assert!(!range.contains(3, 3));
        assert!(!range.contains(4, 0));
    }

    #[test]
    fn test_membership_single_row_inclusive() {
        let range = SelectionRange::new(p(2, 5), p(2, 1));
        assert!(range.contains(2, 1));
        assert!(range.contains(2, 5));
        assert!(!range.contains(2, 6));
        assert!(!range.contains(2, 0));
    }

    #[test]
    fn test_forward_extension_fixes_anchor() {
        let mut sel = SelectionModel::new();
        sel.extend(p(0, 2), p(0, 3), SelectionDirection::Forward);
        sel.extend(p(0, 3), p(1, 0), SelectionDirection::Forward);
        assert_eq!(sel.anchor(), p(0, 2));
        assert_eq!(sel.range(), SelectionRange::new(p(0, 2), p(1, 0)));
        assert_eq!(sel.state(), Some(SelectionDirection::Forward));
    }

    #[test]
    fn test_reversal_across_anchor_swaps_endpoints() {
        let mut sel = SelectionModel::new();
        sel.extend(p(2, 5), p(2, 4), SelectionDirection::Backward);
        sel.extend(p(2, 4), p(1, 0), SelectionDirection::Backward);
        assert_eq!(sel.range().start, p(1, 0));
        assert_eq!(sel.range().end, p(2, 5));

        sel.extend(p(1, 0), p(3, 0), SelectionDirection::Forward);
        let range = sel.range();
        assert!(range.start <= range.end);
        assert_eq!(range.start, p(2, 5));
        assert_eq!(range.end, p(3, 0));
        assert_eq!(sel.state(), Some(SelectionDirection::Forward));
    }

    #[test]
    fn test_returning_to_anchor_goes_idle() {
        let mut sel = SelectionModel::new();
        sel.extend(p(0, 1), p(0, 2), SelectionDirection::Forward);
        sel.extend(p(0, 2), p(0, 1), SelectionDirection::Backward);
        assert!(!sel.is_active());
        assert!(!sel.contains(0, 1));
    }

    #[test]
    fn test_reset_collapses_to_cursor() {
        let mut sel = SelectionModel::new();
        sel.extend(p(0, 0), p(4, 0), SelectionDirection::Forward);
        sel.reset(p(7, 3));
        assert_eq!(sel.range(), SelectionRange::new(p(7, 3), p(7, 3)));
        assert!(sel.range().is_empty());
        assert_eq!(sel.state(), None);
    }
}
