// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input modifiers, outgoing events and per-row render data.

use alloc::string::String;
use alloc::vec::Vec;

use canopy_outline::{NodeRole, Row};

bitflags::bitflags! {
    /// Modifier keys held during a click.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ClickModifiers: u8 {
        /// Toggle the clicked object in and out of the selection.
        const MULTI = 0b0000_0001;
        /// Select every row between the anchor and the clicked row.
        const RANGE = 0b0000_0010;
    }
}

/// Notifications produced by a [`Hierarchy`](crate::Hierarchy).
///
/// Drained with [`Hierarchy::drain_events`](crate::Hierarchy::drain_events).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HierarchyEvent<K> {
    /// The selection changed; carries the new selection in insertion order.
    SelectionChanged(Vec<K>),
    /// A selected object was clicked again within the double-click threshold.
    Activated(K),
    /// Holding the pointer on a row started a drag of these objects.
    DragStarted(Vec<K>),
    /// Path of an object clicked in search mode: its name, its ancestors'
    /// names, then the collection name.
    SearchPath(Vec<String>),
    /// A removal request completed; carries the handles that are gone.
    RemovalConfirmed(Vec<K>),
}

/// What a recycled row widget needs to draw one row.
#[derive(Clone, Debug, PartialEq)]
pub struct RowInfo<'a, K> {
    /// The entity on the row.
    pub row: Row,
    /// Bound object; `None` for collection headers.
    pub key: Option<K>,
    /// Display label.
    pub label: &'a str,
    /// Indentation level; headers are at `0`.
    pub indent: usize,
    /// Whether the row shows an expand arrow.
    pub can_expand: bool,
    /// Whether the row is expanded.
    pub expanded: bool,
    /// Whether the bound object is selected.
    pub selected: bool,
    /// Whether the bound object is active in the hierarchy.
    pub active: bool,
    /// Node role; `None` for collection headers.
    pub role: Option<NodeRole>,
}
