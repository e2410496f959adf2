// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Graph: the scene-graph interface consumed by the hierarchy.
//!
//! A hierarchy view mirrors an external, mutable object graph that it does not
//! own. This crate names the questions the view asks of that graph
//! ([`SceneGraph`]) and the mutations drag-and-drop needs ([`SceneGraphMut`]).
//! Hosts implement the traits over their engine's scene graph; everything
//! else in Canopy is generic over them.
//!
//! The graph is organised as a list of loaded **scenes**, each holding an
//! ordered list of **root objects**; every object has an ordered list of
//! children. Object handles are opaque, copyable, and stable across renames
//! and reparenting; they only become invalid when the object is destroyed.
//!
//! [`SceneTree`] is a small in-memory implementation with generational
//! handles. It is used by tests and benchmarks and is good enough for hosts
//! without an engine of their own.
//!
//! ## Minimal example
//!
//! ```rust
//! use canopy_graph::{LoadMode, SceneGraph, SceneGraphMut, SceneTree, is_ancestor_or_self};
//!
//! let mut tree = SceneTree::new();
//! let scene = tree.load_scene("Main", LoadMode::Single);
//! let player = tree.spawn(scene, "Player").unwrap();
//! let camera = tree.spawn_child(player, "Camera").unwrap();
//!
//! assert_eq!(tree.root_count(scene), 1);
//! assert_eq!(tree.child(player, 0), Some(camera));
//! assert!(is_ancestor_or_self(&tree, player, camera));
//!
//! // Reparenting an object under its own descendant is rejected.
//! assert!(tree.set_parent(player, Some(camera)).is_err());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

use core::fmt::Debug;
use core::hash::Hash;

pub use tree::SceneTree;
pub use types::{GraphError, LoadMode, ObjectId, SceneEvent, SceneId};

/// Read access to a live scene graph.
///
/// Every query tolerates stale handles: it returns `None`, `false`, or `0`
/// rather than panicking, since the hierarchy routinely holds handles to
/// objects that were destroyed since its last refresh.
pub trait SceneGraph {
    /// Stable handle to an object.
    type Key: Copy + Eq + Hash + Debug;
    /// Handle to a loaded scene.
    type Scene: Copy + Eq + Debug;

    /// Returns `true` if `key` still refers to a live object.
    fn is_alive(&self, key: Self::Key) -> bool;

    /// Display name of the object, or `None` if it is gone.
    fn name(&self, key: Self::Key) -> Option<&str>;

    /// Whether the object is active in the hierarchy (itself and all ancestors).
    fn is_active(&self, key: Self::Key) -> bool;

    /// Parent of the object, or `None` for scene roots and stale handles.
    fn parent(&self, key: Self::Key) -> Option<Self::Key>;

    /// Number of direct children.
    fn child_count(&self, key: Self::Key) -> usize;

    /// Child at `index` in sibling order.
    fn child(&self, key: Self::Key, index: usize) -> Option<Self::Key>;

    /// Position of the object among its siblings (or among the scene roots).
    fn sibling_index(&self, key: Self::Key) -> Option<usize>;

    /// Scene that owns the object.
    fn scene_of(&self, key: Self::Key) -> Option<Self::Scene>;

    /// Name of a loaded scene.
    fn scene_name(&self, scene: Self::Scene) -> Option<&str>;

    /// Number of root objects in a scene; `0` for unknown scenes.
    fn root_count(&self, scene: Self::Scene) -> usize;

    /// Root object at `index` in a scene.
    fn root(&self, scene: Self::Scene, index: usize) -> Option<Self::Key>;
}

/// Structural mutations used by drag-and-drop reparenting.
pub trait SceneGraphMut: SceneGraph {
    /// Reparents `key` under `parent`, appending it as the last child.
    ///
    /// `None` makes the object a root of its current scene (appended last).
    /// Fails with [`GraphError::Cycle`] if `parent` is `key` or one of its
    /// descendants, and with [`GraphError::Stale`] if either handle is dead.
    /// A parent in another scene moves the whole subtree to that scene.
    fn set_parent(&mut self, key: Self::Key, parent: Option<Self::Key>) -> Result<(), GraphError>;

    /// Moves the object to `index` among its siblings; the index is clamped.
    fn set_sibling_index(&mut self, key: Self::Key, index: usize) -> Result<(), GraphError>;

    /// Moves a root object (and its subtree) to the end of another scene's roots.
    fn move_to_scene(&mut self, key: Self::Key, scene: Self::Scene) -> Result<(), GraphError>;
}

/// Iterator over the strict ancestors of an object, nearest first.
///
/// Created by [`ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a, G: SceneGraph + ?Sized> {
    graph: &'a G,
    next: Option<G::Key>,
}

impl<G: SceneGraph + ?Sized> Iterator for Ancestors<'_, G> {
    type Item = G::Key;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.graph.parent(current);
        Some(current)
    }
}

/// Walks the parent chain of `key`, nearest ancestor first.
pub fn ancestors<G: SceneGraph + ?Sized>(graph: &G, key: G::Key) -> Ancestors<'_, G> {
    Ancestors {
        graph,
        next: graph.parent(key),
    }
}

/// Returns `true` if `ancestor` is `key` itself or one of its ancestors.
///
/// This is the check drag-and-drop runs before reparenting: dropping `a` onto
/// `b` is a cycle exactly when `is_ancestor_or_self(graph, a, b)`.
pub fn is_ancestor_or_self<G: SceneGraph + ?Sized>(graph: &G, ancestor: G::Key, key: G::Key) -> bool {
    key == ancestor || ancestors(graph, key).any(|k| k == ancestor)
}

/// Number of strict ancestors of `key` (0 for scene roots).
pub fn depth_of<G: SceneGraph + ?Sized>(graph: &G, key: G::Key) -> usize {
    ancestors(graph, key).count()
}
