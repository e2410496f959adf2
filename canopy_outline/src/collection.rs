// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Root collections: one per scene, plus user-managed virtual groups.

use alloc::string::String;
use alloc::vec::Vec;

use crate::node::NodeId;

/// Identifier for a collection within one [`Outline`](crate::Outline).
///
/// Ids come from a per-outline counter and are never reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct CollectionId(pub(crate) u32);

/// Which of the two parallel trees a query addresses.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum Projection {
    /// The browsable tree mirroring the scene graph.
    #[default]
    Primary,
    /// The filtered tree of search results and their ancestors.
    Search,
}

/// Where a collection takes its top-level objects from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CollectionSource<K, S> {
    /// The root objects of a loaded scene.
    Scene(S),
    /// An explicit, user-managed list of objects from any scene.
    Virtual(Vec<K>),
}

/// Structural refresh state of a collection.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum RefreshState {
    /// Cached heights agree with the last structural refresh.
    #[default]
    Clean,
    /// Something changed that requires a structural refresh.
    Dirty,
    /// A refresh pass is running.
    Refreshing,
}

/// Top-level nodes and expand state of one projection of a collection.
#[derive(Clone, Debug, Default)]
pub(crate) struct RootState {
    pub(crate) children: Vec<NodeId>,
    pub(crate) expanded: bool,
    /// Sum of the heights of `children`.
    pub(crate) content: usize,
    pub(crate) hidden: bool,
}

/// A top-level grouping of the hierarchy.
#[derive(Clone, Debug)]
pub struct Collection<K, S> {
    pub(crate) id: CollectionId,
    pub(crate) name: String,
    pub(crate) source: CollectionSource<K, S>,
    pub(crate) header: bool,
    pub(crate) primary: RootState,
    pub(crate) search: RootState,
    pub(crate) state: RefreshState,
}

impl<K: Copy + Eq, S: Copy + Eq> Collection<K, S> {
    pub(crate) fn new(id: CollectionId, name: String, source: CollectionSource<K, S>, header: bool) -> Self {
        Self {
            id,
            name,
            source,
            header,
            primary: RootState {
                expanded: true,
                ..RootState::default()
            },
            search: RootState {
                hidden: true,
                ..RootState::default()
            },
            state: RefreshState::Dirty,
        }
    }

    /// Identifier of the collection.
    #[must_use]
    pub fn id(&self) -> CollectionId {
        self.id
    }

    /// Display name (the scene name, or the virtual group name).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source of the top-level objects.
    #[must_use]
    pub fn source(&self) -> &CollectionSource<K, S> {
        &self.source
    }

    /// Scene backing the collection, if it is scene-backed.
    #[must_use]
    pub fn scene(&self) -> Option<S> {
        match self.source {
            CollectionSource::Scene(scene) => Some(scene),
            CollectionSource::Virtual(_) => None,
        }
    }

    /// Returns `true` for user-managed virtual groups.
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        matches!(self.source, CollectionSource::Virtual(_))
    }

    /// Explicit object list of a virtual group; empty for scenes.
    #[must_use]
    pub fn virtual_keys(&self) -> &[K] {
        match &self.source {
            CollectionSource::Virtual(keys) => keys,
            CollectionSource::Scene(_) => &[],
        }
    }

    /// Whether the collection renders a header row of its own.
    #[must_use]
    pub fn has_header(&self) -> bool {
        self.header
    }

    /// Structural refresh state.
    #[must_use]
    pub fn refresh_state(&self) -> RefreshState {
        self.state
    }

    /// Whether the collection is expanded in `projection`.
    ///
    /// Headerless collections are always shown expanded.
    #[must_use]
    pub fn is_expanded(&self, projection: Projection) -> bool {
        !self.header || self.root(projection).expanded
    }

    /// Whether the collection is hidden (contributes no rows) in `projection`.
    #[must_use]
    pub fn is_hidden(&self, projection: Projection) -> bool {
        self.root(projection).hidden
    }

    /// Top-level nodes in `projection`.
    #[must_use]
    pub fn children(&self, projection: Projection) -> &[NodeId] {
        &self.root(projection).children
    }

    /// Number of rows the collection contributes in `projection`.
    ///
    /// Hidden collections contribute nothing. With a header row the height is
    /// `1 + content` when expanded and `1` when collapsed; without one it is
    /// the content alone.
    #[must_use]
    pub fn height(&self, projection: Projection) -> usize {
        let root = self.root(projection);
        if root.hidden {
            0
        } else if !self.header {
            root.content
        } else if root.expanded {
            1 + root.content
        } else {
            1
        }
    }

    pub(crate) fn root(&self, projection: Projection) -> &RootState {
        match projection {
            Projection::Primary => &self.primary,
            Projection::Search => &self.search,
        }
    }

    pub(crate) fn root_mut(&mut self, projection: Projection) -> &mut RootState {
        match projection {
            Projection::Primary => &mut self.primary,
            Projection::Search => &mut self.search,
        }
    }

    pub(crate) fn keys_mut(&mut self) -> Option<&mut Vec<K>> {
        match &mut self.source {
            CollectionSource::Virtual(keys) => Some(keys),
            CollectionSource::Scene(_) => None,
        }
    }

    /// Position of `key` in a virtual group's list.
    #[must_use]
    pub fn index_of(&self, key: K) -> Option<usize> {
        self.virtual_keys().iter().position(|&k| k == key)
    }

    /// Appends `key` to a virtual group unless it is already listed.
    pub(crate) fn add_key(&mut self, key: K) -> bool {
        let Some(keys) = self.keys_mut() else {
            return false;
        };
        if keys.contains(&key) {
            return false;
        }
        keys.push(key);
        true
    }

    /// Inserts `key` at `index` (clamped), removing an older copy of it.
    pub(crate) fn insert_key(&mut self, index: usize, key: K) -> bool {
        let Some(keys) = self.keys_mut() else {
            return false;
        };
        let index = index.min(keys.len());
        keys.insert(index, key);
        if let Some(old) = keys
            .iter()
            .enumerate()
            .rposition(|(i, &k)| i != index && k == key)
        {
            keys.remove(old);
        }
        true
    }

    pub(crate) fn remove_key(&mut self, key: K) -> bool {
        let Some(keys) = self.keys_mut() else {
            return false;
        };
        let before = keys.len();
        keys.retain(|&k| k != key);
        keys.len() != before
    }
}
