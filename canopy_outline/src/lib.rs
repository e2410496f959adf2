// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Outline: a lazily expanded tree mirroring a live scene graph.
//!
//! The outline caches just enough of an external [`SceneGraph`](canopy_graph::SceneGraph) to render a
//! flattened, virtualized list of it:
//!
//! - **Collections** are the top-level groupings: one per exposed scene,
//!   followed by user-managed virtual groups listing objects from any scene.
//!   Each may render a header row of its own.
//! - **Nodes** are materialized only under expanded parents. Collapsing a
//!   node frees its subtree back into a recycling [`NodePool`].
//! - Every node caches its **height**, the number of rows it contributes:
//!   `1 + sum(child heights)` when expanded and `1` otherwise. The row
//!   index ([`Outline::node_at`], [`Outline::row_of`]) is computed from those
//!   heights without flattening the tree.
//! - [`Outline::refresh`] reconciles the cache against the live graph,
//!   reusing the nodes of objects that persist so expand state survives
//!   reordering.
//! - A second, parallel **search projection** holds the objects matching a
//!   query plus their ancestors; it never disturbs the primary tree.
//!
//! Handles of destroyed objects are tolerated everywhere: such rows read as
//! [`DESTROYED_NAME`] until the next refresh drops them.
//!
//! ## Minimal example
//!
//! ```rust
//! use canopy_graph::{LoadMode, SceneTree};
//! use canopy_outline::{Outline, Projection, Row};
//!
//! let mut tree = SceneTree::new();
//! let scene = tree.load_scene("Main", LoadMode::Single);
//! let player = tree.spawn(scene, "Player").unwrap();
//! tree.spawn_child(player, "Camera").unwrap();
//! tree.spawn(scene, "Light").unwrap();
//!
//! let mut outline = Outline::new();
//! outline.add_scene(&tree, scene);
//!
//! // Header + two collapsed roots.
//! assert_eq!(outline.row_count(Projection::Primary), 3);
//!
//! let Some(Row::Node(node)) = outline.node_at(Projection::Primary, 1) else {
//!     unreachable!()
//! };
//! outline.set_expanded(&tree, Projection::Primary, Row::Node(node), true);
//! assert_eq!(outline.row_count(Projection::Primary), 4);
//!
//! // Search shows the match together with its ancestors.
//! outline.refresh_search(&tree, "cam");
//! assert_eq!(outline.row_count(Projection::Search), 3);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod collection;
mod index;
mod node;
mod outline;
mod refresh;
mod search;

pub use collection::{Collection, CollectionId, CollectionSource, Projection, RefreshState};
pub use index::Row;
pub use node::{NodeId, NodePool, NodeRole, TreeNode};
pub use outline::{DESTROYED_NAME, KeyFilter, Outline};
pub use search::normalize_query;
