// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Rows: virtualization for lists of uniform-height rows.
//!
//! A hierarchy view shows an arbitrarily large flattened tree through a small,
//! fixed pool of recycled row widgets. This crate answers the geometric half of
//! that: given the row count, a uniform row height, the scroll offset and the
//! viewport height, which rows should be realized and how much spacer goes
//! before and after them.
//!
//! - [`FixedRows`]: a strip of `len` rows of the same height.
//! - [`compute_visible_rows`]: the visible `[start, end)` window with overscan.
//! - [`RowViewport`]: scroll state plus a cached [`VisibleRows`], with
//!   row-aligned scrolling via [`ScrollAlign`] and hit testing via
//!   [`RowViewport::row_at`].
//!
//! The crate knows nothing about what a row shows; the hierarchy maps each
//! realized index back to an entity through its flattened index.
//!
//! ## Minimal example
//!
//! ```rust
//! use canopy_rows::{FixedRows, RowViewport, ScrollAlign};
//!
//! // 100 rows, 20 logical pixels each, in a 200px viewport with 40px overscan.
//! let mut viewport = RowViewport::new(FixedRows::new(100, 20.0), 200.0, 40.0);
//!
//! viewport.set_scroll_offset(100.0);
//! let rows = viewport.visible_rows();
//! assert_eq!(rows.start, 3);
//! assert_eq!(rows.end, 17);
//!
//! // Bring row 50 to the top of the viewport.
//! viewport.scroll_to_row(50, ScrollAlign::Start);
//! assert_eq!(viewport.scroll_offset(), 1000.0);
//! assert_eq!(viewport.row_at(5.0), Some(50));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod rows;
mod viewport;

pub use rows::{FixedRows, VisibleRows, compute_visible_rows};
pub use viewport::{RowViewport, ScrollAlign};
