// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controller and drag-and-drop settings.

use alloc::string::String;
use alloc::vec::Vec;

/// Settings of a [`Hierarchy`](crate::Hierarchy).
///
/// Times are in milliseconds of the host clock passed to
/// [`Hierarchy::update`](crate::Hierarchy::update). An interval of `0`
/// means "every update".
#[derive(Clone, Debug, PartialEq)]
pub struct HierarchyConfig {
    /// Interval of the structural refresh.
    pub refresh_interval_ms: u64,
    /// Interval at which cached display names are dropped and re-read.
    pub name_refresh_interval_ms: u64,
    /// Interval of the search refresh while a query is active.
    pub search_refresh_interval_ms: u64,
    /// Two clicks on a selected row within this time activate it.
    pub double_click_ms: u64,
    /// Whether holding the pointer on a row starts a drag.
    pub drag_on_hold: bool,
    /// How long the pointer must be held before a drag starts.
    pub hold_ms: u64,
    /// Uniform row height in logical pixels.
    pub row_height: f64,
    /// Extra height realized above and below the viewport.
    pub overscan: f64,
    /// Whether loaded scenes get a collection of their own.
    pub expose_scenes: bool,
    /// Whether collections render a header row.
    pub collection_headers: bool,
    /// Display order of virtual groups, by name.
    pub virtual_order: Vec<String>,
    /// Drag-and-drop behavior.
    pub drop: DropConfig,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 0,
            name_refresh_interval_ms: 10_000,
            search_refresh_interval_ms: 5_000,
            double_click_ms: 500,
            drag_on_hold: true,
            hold_ms: 400,
            row_height: 30.0,
            overscan: 0.0,
            expose_scenes: true,
            collection_headers: true,
            virtual_order: Vec::new(),
            drop: DropConfig::default(),
        }
    }
}

impl HierarchyConfig {
    /// Sets the structural refresh interval.
    #[must_use]
    pub fn with_refresh_interval(mut self, ms: u64) -> Self {
        self.refresh_interval_ms = ms;
        self
    }

    /// Sets the display-name refresh interval.
    #[must_use]
    pub fn with_name_refresh_interval(mut self, ms: u64) -> Self {
        self.name_refresh_interval_ms = ms;
        self
    }

    /// Sets the search refresh interval.
    #[must_use]
    pub fn with_search_refresh_interval(mut self, ms: u64) -> Self {
        self.search_refresh_interval_ms = ms;
        self
    }

    /// Sets the double-click threshold.
    #[must_use]
    pub fn with_double_click(mut self, ms: u64) -> Self {
        self.double_click_ms = ms;
        self
    }

    /// Enables or disables hold-to-drag and sets its delay.
    #[must_use]
    pub fn with_drag_on_hold(mut self, enabled: bool, hold_ms: u64) -> Self {
        self.drag_on_hold = enabled;
        self.hold_ms = hold_ms;
        self
    }

    /// Sets the row height.
    #[must_use]
    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.row_height = row_height;
        self
    }

    /// Sets the overscan.
    #[must_use]
    pub fn with_overscan(mut self, overscan: f64) -> Self {
        self.overscan = overscan;
        self
    }

    /// Sets whether loaded scenes are shown.
    #[must_use]
    pub fn with_expose_scenes(mut self, expose: bool) -> Self {
        self.expose_scenes = expose;
        self
    }

    /// Sets whether collections render a header row.
    #[must_use]
    pub fn with_collection_headers(mut self, headers: bool) -> Self {
        self.collection_headers = headers;
        self
    }

    /// Sets the display order of virtual groups.
    #[must_use]
    pub fn with_virtual_order<I, N>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.virtual_order = order.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the drag-and-drop behavior.
    #[must_use]
    pub fn with_drop(mut self, drop: DropConfig) -> Self {
        self.drop = drop;
        self
    }
}

/// Drag-and-drop behavior.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DropConfig {
    /// Whether drops may reparent, reorder or move objects at all.
    pub can_reorganize: bool,
    /// Whether an object may be dropped onto its own descendant, swapping
    /// the two so the descendant takes the object's place.
    pub parent_on_child: bool,
    /// Whether drops may add objects to virtual groups.
    pub add_to_virtual: bool,
    /// Height of the band at the top and bottom of a row that drops
    /// above or below it instead of onto it.
    pub edge_area: f64,
    /// Height of the band at the top and bottom of the viewport that
    /// auto-scrolls while dragging.
    pub scroll_area: f64,
    /// Auto-scroll speed, in rows per second at the very edge.
    pub scroll_speed: f64,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            can_reorganize: false,
            parent_on_child: false,
            add_to_virtual: false,
            edge_area: 5.0,
            scroll_area: 75.0,
            scroll_speed: 75.0,
        }
    }
}

impl DropConfig {
    /// Enables or disables reorganizing by drag-and-drop.
    #[must_use]
    pub fn with_reorganize(mut self, enabled: bool) -> Self {
        self.can_reorganize = enabled;
        self
    }

    /// Allows or forbids dropping an object onto its own descendant.
    #[must_use]
    pub fn with_parent_on_child(mut self, allowed: bool) -> Self {
        self.parent_on_child = allowed;
        self
    }

    /// Allows or forbids adding objects to virtual groups by dropping.
    #[must_use]
    pub fn with_add_to_virtual(mut self, allowed: bool) -> Self {
        self.add_to_virtual = allowed;
        self
    }

    /// Sets the above/below band height.
    #[must_use]
    pub fn with_edge_area(mut self, edge_area: f64) -> Self {
        self.edge_area = edge_area;
        self
    }

    /// Sets the auto-scroll band height and speed.
    #[must_use]
    pub fn with_auto_scroll(mut self, area: f64, speed: f64) -> Self {
        self.scroll_area = area;
        self.scroll_speed = speed;
        self
    }
}
