//! Virtual row window.

use std::ops::Range;

/// Inclusive range of display rows to materialize, plus the number of rows the body
/// can show at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleRowRange {
    pub start: usize,
    /// Inclusive
    pub end: usize,
    pub visible_count: usize,
    empty: bool,
}

impl VisibleRowRange {
    /// A range that materializes nothing.
    pub fn empty(visible_count: usize) -> Self {
        Self {
            start: 0,
            end: 0,
            visible_count,
            empty: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Number of rows materialized.
    pub fn len(&self) -> usize {
        if self.empty {
            0
        } else {
            self.end - self.start + 1
        }
    }

    /// Display row indices to render.
    pub fn rows(&self) -> Range<usize> {
        if self.empty {
            0..0
        } else {
            self.start..self.end + 1
        }
    }

    pub fn contains(&self, row: usize) -> bool {
        !self.empty && row >= self.start && row <= self.end
    }
}

/// Compute the rows to materialize for a body of `body_height` pixels scrolled to
/// `scroll_y`, with `buffer_rows` extra rows on each side.
///
/// The range is empty when there are no rows or the row height is not positive.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn compute_visible_rows(
    scroll_y: f64,
    body_height: f64,
    row_height: f64,
    buffer_rows: usize,
    total_rows: usize,
) -> VisibleRowRange {
    if row_height <= 0.0 {
        return VisibleRowRange::empty(0);
    }
    let visible_count = (body_height.max(0.0) / row_height).ceil() as usize;
    if total_rows == 0 {
        return VisibleRowRange::empty(visible_count);
    }

    let start_row = (scroll_y.max(0.0) / row_height).floor() as usize;
    let last = total_rows - 1;
    let end = start_row
        .saturating_add(visible_count)
        .saturating_add(buffer_rows)
        .min(last);
    let start = start_row.saturating_sub(buffer_rows).min(end);

    VisibleRowRange {
        start,
        end,
        visible_count,
        empty: false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ten_thousand_rows_at_top() {
        let range = compute_visible_rows(0.0, 300.0, 30.0, 2, 10_000);
        assert_eq!(range.visible_count, 10);
        assert_eq!(range.start, 0);
        assert_eq!(range.end, 12);
        assert_eq!(range.len(), 13);
    }

    #[test]
    fn buffer_extends_above_when_scrolled() {
        let range = compute_visible_rows(3000.0, 300.0, 30.0, 5, 10_000);
        assert_eq!(range.start, 95);
        assert_eq!(range.end, 115);
    }

    #[test]
    fn no_rows_is_empty() {
        let range = compute_visible_rows(0.0, 300.0, 30.0, 2, 0);
        assert!(range.is_empty());
        assert_eq!(range.rows().count(), 0);
    }

    #[test]
    fn overscrolled_input_still_yields_ordered_range() {
        let range = compute_visible_rows(1.0e9, 300.0, 30.0, 2, 50);
        assert!(range.start <= range.end);
        assert_eq!(range.end, 49);
    }

    #[test]
    fn identical_inputs_are_equal() {
        let a = compute_visible_rows(450.0, 280.0, 30.0, 3, 400);
        let b = compute_visible_rows(450.0, 280.0, 30.0, 3, 400);
        assert_eq!(a, b);
    }
}
