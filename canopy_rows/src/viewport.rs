// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll state over a [`FixedRows`] strip.

use crate::{FixedRows, VisibleRows, compute_visible_rows};

/// Alignment used when scrolling a row into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAlign {
    /// Align the top of the row with the top of the viewport.
    Start,
    /// Center the row within the viewport.
    Center,
    /// Align the bottom of the row with the bottom of the viewport.
    End,
    /// Move just enough to make the row fully visible.
    #[default]
    Nearest,
}

/// Scroll offset, viewport height and overscan over a uniform row strip.
///
/// Caches the last computed [`VisibleRows`] until something that affects it
/// changes.
#[derive(Debug, Clone)]
pub struct RowViewport {
    rows: FixedRows,
    scroll_offset: f64,
    viewport_extent: f64,
    overscan: f64,

    dirty: bool,
    last_rows: VisibleRows,
}

impl RowViewport {
    /// Creates a viewport over `rows` with the given height and symmetric overscan.
    #[must_use]
    pub fn new(rows: FixedRows, viewport_extent: f64, overscan: f64) -> Self {
        Self {
            rows,
            scroll_offset: 0.0,
            viewport_extent: viewport_extent.max(0.0),
            overscan: overscan.max(0.0),
            dirty: true,
            last_rows: VisibleRows::EMPTY,
        }
    }

    /// The underlying row strip.
    #[must_use]
    pub fn rows(&self) -> &FixedRows {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sets the number of rows.
    pub fn set_len(&mut self, len: usize) {
        if len != self.rows.len() {
            self.rows.set_len(len);
            self.dirty = true;
        }
    }

    /// Uniform height of a row.
    #[must_use]
    pub fn row_height(&self) -> f64 {
        self.rows.row_height()
    }

    /// Sets the uniform row height.
    pub fn set_row_height(&mut self, row_height: f64) {
        self.rows.set_row_height(row_height);
        self.dirty = true;
    }

    /// Current scroll offset.
    #[must_use]
    pub const fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Sets the scroll offset; negative values are clamped to `0.0`.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        let offset = offset.max(0.0);
        if offset != self.scroll_offset {
            self.scroll_offset = offset;
            self.dirty = true;
        }
    }

    /// Adjusts the scroll offset by `delta` and clamps it to the content.
    pub fn scroll_by(&mut self, delta: f64) {
        self.set_scroll_offset(self.scroll_offset + delta);
        self.clamp_scroll_to_content();
    }

    /// Current viewport height.
    #[must_use]
    pub const fn viewport_extent(&self) -> f64 {
        self.viewport_extent
    }

    /// Sets the viewport height.
    pub fn set_viewport_extent(&mut self, extent: f64) {
        let extent = extent.max(0.0);
        if extent != self.viewport_extent {
            self.viewport_extent = extent;
            self.dirty = true;
        }
    }

    /// Sets the overscan realized above and below the viewport.
    pub fn set_overscan(&mut self, overscan: f64) {
        let overscan = overscan.max(0.0);
        if overscan != self.overscan {
            self.overscan = overscan;
            self.dirty = true;
        }
    }

    /// Largest scroll offset that keeps the viewport within the content.
    #[must_use]
    pub fn max_scroll_offset(&self) -> f64 {
        (self.rows.total_height() - self.viewport_extent).max(0.0)
    }

    /// Computes or returns the cached visible window.
    pub fn visible_rows(&mut self) -> VisibleRows {
        if self.dirty {
            self.last_rows = compute_visible_rows(
                &self.rows,
                self.scroll_offset,
                self.viewport_extent,
                self.overscan,
                self.overscan,
            );
            self.dirty = false;
        }
        self.last_rows
    }

    /// Row under viewport-relative `y`, or `None` for blank space.
    ///
    /// `y` is measured from the top of the viewport, as pointer positions are.
    #[must_use]
    pub fn row_at(&self, y: f64) -> Option<usize> {
        let height = self.rows.row_height();
        if height <= 0.0 || y < 0.0 {
            return None;
        }
        let content_y = self.scroll_offset + y;
        if content_y >= self.rows.total_height() {
            return None;
        }
        Some(self.rows.row_at_offset(content_y))
    }

    /// Returns `true` if `row` lies entirely inside the viewport.
    #[must_use]
    pub fn is_row_fully_visible(&self, row: usize) -> bool {
        if row >= self.rows.len() {
            return false;
        }
        let top = self.rows.offset_of(row);
        let bottom = top + self.rows.row_height();
        top >= self.scroll_offset && bottom <= self.scroll_offset + self.viewport_extent
    }

    /// Clamps the scroll offset so the viewport stays within the content.
    pub fn clamp_scroll_to_content(&mut self) {
        let max = self.max_scroll_offset();
        if self.scroll_offset > max {
            self.set_scroll_offset(max);
        }
    }

    /// Scrolls so that `row` is brought into view with the given alignment.
    ///
    /// The row index is clamped to the strip; the result is clamped to the content.
    pub fn scroll_to_row(&mut self, row: usize, align: ScrollAlign) {
        let len = self.rows.len();
        if len == 0 {
            self.set_scroll_offset(0.0);
            return;
        }
        let row = row.min(len - 1);
        let top = self.rows.offset_of(row);
        let bottom = top + self.rows.row_height();
        let viewport = self.viewport_extent;

        let offset = match align {
            ScrollAlign::Start => top,
            ScrollAlign::End => bottom - viewport,
            ScrollAlign::Center => (top + bottom) / 2.0 - viewport / 2.0,
            ScrollAlign::Nearest => {
                let current = self.scroll_offset;
                if top >= current && bottom <= current + viewport {
                    current
                } else if top < current {
                    top
                } else {
                    bottom - viewport
                }
            }
        };
        self.set_scroll_offset(offset.clamp(0.0, self.max_scroll_offset()));
    }
}

#[cfg(test)]
mod tests {
    use super::{RowViewport, ScrollAlign};
    use crate::FixedRows;

    #[test]
    fn visible_rows_track_scroll() {
        let mut viewport = RowViewport::new(FixedRows::new(100, 10.0), 50.0, 0.0);
        let rows = viewport.visible_rows();
        assert_eq!((rows.start, rows.end), (0, 5));

        viewport.scroll_by(10.0);
        let rows = viewport.visible_rows();
        assert_eq!((rows.start, rows.end), (1, 6));
    }

    #[test]
    fn scroll_to_row_alignments() {
        let mut viewport = RowViewport::new(FixedRows::new(10, 10.0), 30.0, 0.0);

        viewport.scroll_to_row(3, ScrollAlign::Start);
        assert_eq!(viewport.scroll_offset(), 30.0);

        viewport.scroll_to_row(3, ScrollAlign::End);
        assert_eq!(viewport.scroll_offset(), 10.0);

        viewport.scroll_to_row(3, ScrollAlign::Center);
        assert_eq!(viewport.scroll_offset(), 20.0);

        viewport.scroll_to_row(3, ScrollAlign::Nearest);
        assert_eq!(viewport.scroll_offset(), 20.0);

        viewport.scroll_to_row(9, ScrollAlign::Nearest);
        assert_eq!(viewport.scroll_offset(), 70.0);

        // Start alignment near the end is limited by the content.
        viewport.scroll_to_row(9, ScrollAlign::Start);
        assert_eq!(viewport.scroll_offset(), 70.0);
    }

    #[test]
    fn shrinking_content_clamps_scroll() {
        let mut viewport = RowViewport::new(FixedRows::new(10, 10.0), 30.0, 0.0);
        viewport.set_scroll_offset(70.0);
        viewport.set_len(5);
        viewport.clamp_scroll_to_content();
        assert_eq!(viewport.scroll_offset(), 20.0);

        viewport.set_len(2);
        viewport.clamp_scroll_to_content();
        assert_eq!(viewport.scroll_offset(), 0.0);
    }

    #[test]
    fn row_at_maps_pointer_to_rows() {
        let mut viewport = RowViewport::new(FixedRows::new(4, 10.0), 100.0, 0.0);
        assert_eq!(viewport.row_at(0.0), Some(0));
        assert_eq!(viewport.row_at(25.0), Some(2));
        assert_eq!(viewport.row_at(45.0), None, "blank space below the last row");
        assert_eq!(viewport.row_at(-1.0), None);

        viewport.set_len(20);
        viewport.set_scroll_offset(50.0);
        assert_eq!(viewport.row_at(5.0), Some(5));
        assert!(viewport.is_row_fully_visible(5));
        assert!(!viewport.is_row_fully_visible(4));
    }
}
