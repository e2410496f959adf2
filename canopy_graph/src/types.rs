// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handles, scene signals, and the graph mutation error.

use core::fmt;

/// Identifier for an object in a [`SceneTree`](crate::SceneTree).
///
/// A small, copyable handle made of a slot index and a generation counter.
///
/// - On spawn, a fresh slot is allocated with generation `1`.
/// - On destroy, the slot is freed; any `ObjectId` pointing to it is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new,
///   distinct `ObjectId`.
///
/// Stale handles never alias a different live object because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u32, pub(crate) u32);

impl ObjectId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Identifier for a loaded scene in a [`SceneTree`](crate::SceneTree).
///
/// Generational like [`ObjectId`]: a scene that is unloaded and a later scene
/// loaded into the same slot get distinct ids.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SceneId(pub(crate) u32, pub(crate) u32);

impl SceneId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// How a scene was loaded.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum LoadMode {
    /// The scene replaced every previously loaded scene.
    #[default]
    Single,
    /// The scene was loaded next to the already loaded scenes.
    Additive,
}

/// Scene lifecycle signal published by a scene graph.
///
/// Hierarchy controllers consume these to create and destroy the collection
/// bound to each scene.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SceneEvent<S> {
    /// A scene finished loading.
    Loaded {
        /// The scene that was loaded.
        scene: S,
        /// How it was loaded.
        mode: LoadMode,
    },
    /// A scene was unloaded; its objects are gone.
    Unloaded {
        /// The scene that was unloaded.
        scene: S,
    },
}

/// Error returned by [`SceneGraphMut`](crate::SceneGraphMut) operations.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub enum GraphError {
    /// The object (or the proposed parent) is no longer alive.
    Stale,
    /// The proposed parent is the object itself or one of its descendants.
    Cycle,
    /// The target scene is not loaded.
    UnknownScene,
    /// The operation requires a root object, but the object has a parent.
    NotRoot,
}

impl fmt::Debug for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stale => "Stale",
            Self::Cycle => "Cycle",
            Self::UnknownScene => "UnknownScene",
            Self::NotRoot => "NotRoot",
        };
        write!(f, "GraphError::{name}")
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stale => f.write_str("object handle is stale"),
            Self::Cycle => f.write_str("reparenting would create a cycle"),
            Self::UnknownScene => f.write_str("scene is not loaded"),
            Self::NotRoot => f.write_str("object is not a scene root"),
        }
    }
}

impl core::error::Error for GraphError {}
