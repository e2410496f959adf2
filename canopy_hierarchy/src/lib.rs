// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Hierarchy: a runtime hierarchy controller over a host scene graph.
//!
//! [`Hierarchy`] composes the Canopy building blocks into the state behind an
//! in-application object browser:
//!
//! - an [`Outline`](canopy_outline::Outline) of the loaded scenes and
//!   user-defined virtual groups, kept in sync by three timers
//!   (structure, display names, search);
//! - a [`SelectionSet`](canopy_selection::SelectionSet) driven by clicks with
//!   [`ClickModifiers`], double-click activation and hold-to-drag;
//! - a fixed-height [`RowViewport`](canopy_rows::RowViewport) that pools row
//!   widgets, scrolls to the selection and auto-scrolls while dragging;
//! - drop reparenting that validates the whole move before touching the
//!   graph, reporting refusals as [`DropRejected`];
//! - two-phase removal, confirmed on the frame after the host destroys the
//!   objects.
//!
//! The host owns the graph and the clock. It forwards scene signals to
//! [`Hierarchy::handle_scene_event`], calls [`Hierarchy::update`] once per
//! frame with the current time in milliseconds, and drains
//! [`HierarchyEvent`]s.
//!
//! [`HierarchyRegistry`] owns the node pools shared by every instance.
//!
//! ## Minimal example
//!
//! ```rust
//! use canopy_graph::{LoadMode, SceneTree};
//! use canopy_hierarchy::{ClickModifiers, HierarchyConfig, HierarchyEvent, HierarchyRegistry};
//!
//! let mut tree = SceneTree::new();
//! let scene = tree.load_scene("Main", LoadMode::Single);
//! let player = tree.spawn(scene, "Player").unwrap();
//! tree.spawn(scene, "Light").unwrap();
//!
//! let mut registry = HierarchyRegistry::new();
//! let mut hierarchy = registry.register(HierarchyConfig::default());
//! let signals: Vec<_> = tree.drain_events().collect();
//! for signal in signals {
//!     hierarchy.handle_scene_event(&tree, signal);
//! }
//! hierarchy.update(&tree, 0);
//!
//! // Scene header, then the two roots.
//! assert_eq!(hierarchy.row_count(), 3);
//!
//! hierarchy.on_item_clicked(&tree, Some(1), ClickModifiers::empty(), 10);
//! assert_eq!(hierarchy.selection().items(), &[player]);
//! assert_eq!(
//!     hierarchy.drain_events().collect::<Vec<_>>(),
//!     [HierarchyEvent::SelectionChanged(vec![player])]
//! );
//!
//! registry.unregister(hierarchy);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod click;
mod config;
mod controller;
mod drop;
mod event;
mod registry;
mod removal;
mod timer;

pub use config::{DropConfig, HierarchyConfig};
pub use controller::Hierarchy;
pub use drop::{DropOutcome, DropPosition, DropRejected};
pub use event::{ClickModifiers, HierarchyEvent, RowInfo};
pub use registry::HierarchyRegistry;
