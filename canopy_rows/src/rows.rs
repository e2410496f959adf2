// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform row strip and the visible-window computation.

/// Result of a visibility query over a row strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRows {
    /// First visible row (inclusive).
    pub start: usize,
    /// One past the last visible row (exclusive).
    pub end: usize,

    /// Total height of rows before `start`.
    pub before_extent: f64,
    /// Total height of rows after `end`.
    pub after_extent: f64,
    /// Total height of all rows.
    pub content_extent: f64,
}

impl VisibleRows {
    /// A window with no rows and no extent.
    pub const EMPTY: Self = Self {
        start: 0,
        end: 0,
        before_extent: 0.0,
        after_extent: 0.0,
        content_extent: 0.0,
    };

    /// Returns `true` if there are no visible rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of visible rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }
}

/// A strip of `len` rows that all share the same height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRows {
    len: usize,
    row_height: f64,
}

impl FixedRows {
    /// Creates a strip of `len` rows of `row_height` each.
    ///
    /// Negative heights are clamped to `0.0`.
    #[must_use]
    pub fn new(len: usize, row_height: f64) -> Self {
        Self {
            len,
            row_height: row_height.max(0.0),
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there are no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sets the number of rows.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
    }

    /// Height shared by every row.
    #[must_use]
    pub const fn row_height(&self) -> f64 {
        self.row_height
    }

    /// Sets the uniform row height.
    pub fn set_row_height(&mut self, row_height: f64) {
        debug_assert!(
            row_height.is_finite(),
            "row heights must be finite; got {row_height:?}"
        );
        self.row_height = row_height.max(0.0);
    }

    /// Total height of the strip.
    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.row_height * self.len as f64
    }

    /// Offset of the top of `row` from the top of the strip.
    #[must_use]
    pub fn offset_of(&self, row: usize) -> f64 {
        self.row_height * row as f64
    }

    /// Row whose span contains `offset`, clamped into `0..len`.
    ///
    /// Returns `0` for an empty strip or a zero row height.
    #[must_use]
    pub fn row_at_offset(&self, offset: f64) -> usize {
        if self.len == 0 || self.row_height <= 0.0 {
            return 0;
        }
        let ratio = (offset / self.row_height).max(0.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ratio is non-negative, truncation is floor; clamped right after"
        )]
        let row = ratio as usize;
        row.min(self.len - 1)
    }
}

/// Computes which rows of `rows` intersect the viewport, extended by overscan.
///
/// - `scroll_offset`: top of the viewport in strip coordinates.
/// - `viewport_extent`: height of the viewport.
/// - `overscan_before` / `overscan_after`: extra margin realized above and
///   below the viewport to reduce popping while scrolling.
///
/// Negative inputs are treated as `0.0`.
#[must_use]
pub fn compute_visible_rows(
    rows: &FixedRows,
    scroll_offset: f64,
    viewport_extent: f64,
    overscan_before: f64,
    overscan_after: f64,
) -> VisibleRows {
    let content_extent = rows.total_height();
    if rows.is_empty() || content_extent <= 0.0 {
        return VisibleRows::EMPTY;
    }

    let scroll_offset = scroll_offset.max(0.0);
    let min = (scroll_offset - overscan_before.max(0.0)).max(0.0);
    let max = (scroll_offset + viewport_extent.max(0.0) + overscan_after.max(0.0))
        .min(content_extent);

    if max <= min {
        return VisibleRows {
            start: 0,
            end: 0,
            before_extent: min.min(content_extent),
            after_extent: (content_extent - min).max(0.0),
            content_extent,
        };
    }

    let start = rows.row_at_offset(min);
    let mut end = rows.row_at_offset(max);
    if rows.offset_of(end) < max {
        end += 1;
    }
    let end = end.min(rows.len());

    VisibleRows {
        start,
        end,
        before_extent: rows.offset_of(start),
        after_extent: (content_extent - rows.offset_of(end)).max(0.0),
        content_extent,
    }
}

#[cfg(test)]
mod tests {
    use super::{FixedRows, VisibleRows, compute_visible_rows};

    #[test]
    fn offsets_and_rows() {
        let rows = FixedRows::new(5, 10.0);
        assert_eq!(rows.total_height(), 50.0);
        assert_eq!(rows.offset_of(3), 30.0);
        assert_eq!(rows.row_at_offset(0.0), 0);
        assert_eq!(rows.row_at_offset(9.9), 0);
        assert_eq!(rows.row_at_offset(10.0), 1);
        assert_eq!(rows.row_at_offset(49.9), 4);
        assert_eq!(rows.row_at_offset(100.0), 4);
        assert_eq!(rows.row_at_offset(-5.0), 0);
    }

    #[test]
    fn negative_height_is_clamped() {
        let mut rows = FixedRows::new(3, -5.0);
        assert_eq!(rows.row_height(), 0.0);
        rows.set_row_height(-1.0);
        assert_eq!(rows.row_height(), 0.0);
        assert_eq!(compute_visible_rows(&rows, 0.0, 100.0, 0.0, 0.0), VisibleRows::EMPTY);
    }

    #[test]
    fn empty_strip_has_empty_window() {
        let rows = FixedRows::new(0, 20.0);
        let window = compute_visible_rows(&rows, 0.0, 100.0, 10.0, 10.0);
        assert!(window.is_empty());
        assert_eq!(window, VisibleRows::EMPTY);
    }

    #[test]
    fn window_covers_partial_rows() {
        let rows = FixedRows::new(10, 10.0);
        // Viewport 5..35 touches rows 0..=3.
        let window = compute_visible_rows(&rows, 5.0, 30.0, 0.0, 0.0);
        assert_eq!(window.start, 0);
        assert_eq!(window.end, 4);
        assert_eq!(window.before_extent, 0.0);
        assert_eq!(window.after_extent, 60.0);
        assert_eq!(window.content_extent, 100.0);
    }

    #[test]
    fn overscan_extends_window_and_stays_in_bounds() {
        let rows = FixedRows::new(10, 10.0);
        let window = compute_visible_rows(&rows, 50.0, 20.0, 15.0, 100.0);
        assert_eq!(window.start, 3);
        assert_eq!(window.end, 10);
        assert_eq!(window.before_extent, 30.0);
        assert_eq!(window.after_extent, 0.0);
        assert_eq!(window.len(), 7);
    }
}
