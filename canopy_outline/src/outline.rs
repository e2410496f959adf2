// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The outline: collections, filtering, expansion, and lookups.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::fmt::Debug;
use core::hash::Hash;
use core::mem;

use canopy_graph::{SceneGraph, ancestors};
use hashbrown::HashSet;
use log::debug;
use smallvec::SmallVec;

use crate::collection::{Collection, CollectionId, CollectionSource, Projection, RefreshState};
use crate::index::Row;
use crate::node::{NodeId, NodePool, TreeNode};

/// Display name used for rows whose object has been destroyed.
pub const DESTROYED_NAME: &str = "<destroyed>";

/// Predicate deciding whether an object appears in the hierarchy.
pub type KeyFilter<K> = Box<dyn Fn(K) -> bool>;

/// A lazily expanded mirror of a scene graph.
///
/// See the [crate documentation](crate) for an overview.
pub struct Outline<K, S> {
    pub(crate) pool: NodePool<K>,
    pub(crate) collections: Vec<Collection<K, S>>,
    next_id: u32,
    headers: bool,
    virtual_order: Vec<String>,
    filter: Option<KeyFilter<K>>,
    ignored: HashSet<K>,
}

impl<K: Debug, S: Debug> Debug for Outline<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outline")
            .field("collections", &self.collections)
            .field("nodes", &self.pool.len())
            .field("headers", &self.headers)
            .field("virtual_order", &self.virtual_order)
            .field("filtered", &self.filter.is_some())
            .field("ignored", &self.ignored)
            .finish_non_exhaustive()
    }
}

impl<K, S> Default for Outline<K, S>
where
    K: Copy + Eq + Hash + Debug,
    S: Copy + Eq + Debug,
{
    fn default() -> Self {
        Self::with_pool(NodePool::new())
    }
}

impl<K, S> Outline<K, S>
where
    K: Copy + Eq + Hash + Debug,
    S: Copy + Eq + Debug,
{
    /// Creates an empty outline with collection header rows enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty outline that allocates its nodes from `pool`.
    #[must_use]
    pub fn with_pool(mut pool: NodePool<K>) -> Self {
        pool.clear();
        Self {
            pool,
            collections: Vec::new(),
            next_id: 0,
            headers: true,
            virtual_order: Vec::new(),
            filter: None,
            ignored: HashSet::new(),
        }
    }

    /// Tears the outline down and hands back its (cleared) node pool.
    #[must_use]
    pub fn into_pool(self) -> NodePool<K> {
        let mut pool = self.pool;
        pool.clear();
        pool
    }

    /// The node pool backing this outline.
    #[must_use]
    pub fn pool(&self) -> &NodePool<K> {
        &self.pool
    }

    /// Returns the node for `id`, or `None` if it was freed.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&TreeNode<K>> {
        self.pool.get(id)
    }

    /// All collections in display order: scenes first, then virtual groups.
    #[must_use]
    pub fn collections(&self) -> &[Collection<K, S>] {
        &self.collections
    }

    /// Returns the collection for `id`.
    #[must_use]
    pub fn collection(&self, id: CollectionId) -> Option<&Collection<K, S>> {
        self.collections.iter().find(|c| c.id == id)
    }

    pub(crate) fn collection_index(&self, id: CollectionId) -> Option<usize> {
        self.collections.iter().position(|c| c.id == id)
    }

    /// Collection bound to `scene`, if the scene is exposed.
    #[must_use]
    pub fn scene_collection(&self, scene: S) -> Option<CollectionId> {
        self.collections
            .iter()
            .find(|c| c.scene() == Some(scene))
            .map(|c| c.id)
    }

    /// Virtual group called `name`, if it exists.
    #[must_use]
    pub fn virtual_collection(&self, name: &str) -> Option<CollectionId> {
        self.collections
            .iter()
            .find(|c| c.is_virtual() && c.name == name)
            .map(|c| c.id)
    }

    /// Number of scene-backed collections.
    #[must_use]
    pub fn scene_count(&self) -> usize {
        self.collections.iter().filter(|c| !c.is_virtual()).count()
    }

    /// Whether new and existing collections render a header row.
    #[must_use]
    pub fn headers(&self) -> bool {
        self.headers
    }

    /// Turns collection header rows on or off for every collection.
    pub fn set_headers(&mut self, headers: bool) {
        self.headers = headers;
        for c in &mut self.collections {
            c.header = headers;
        }
    }

    /// Sets the explicit display order of virtual groups, by name.
    ///
    /// Applies to groups created afterwards; groups not named in the list
    /// are placed after those that are.
    pub fn set_virtual_order<I, N>(&mut self, order: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.virtual_order = order.into_iter().map(Into::into).collect();
    }

    fn alloc_collection_id(&mut self) -> CollectionId {
        let id = CollectionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Adds the collection for a loaded scene, or returns the existing one.
    ///
    /// Scene collections are placed after every other scene collection and
    /// before the virtual groups. The new collection is refreshed right away.
    pub fn add_scene<G>(&mut self, graph: &G, scene: S) -> CollectionId
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        if let Some(id) = self.scene_collection(scene) {
            return id;
        }
        let id = self.alloc_collection_id();
        let name = graph.scene_name(scene).unwrap_or_default().to_string();
        debug!("adding scene collection {name:?} for {scene:?}");
        let collection = Collection::new(id, name, CollectionSource::Scene(scene), self.headers);
        let index = self.scene_count();
        self.collections.insert(index, collection);
        self.refresh_at(graph, index);
        id
    }

    /// Removes the collection bound to `scene`; returns `false` if there was none.
    pub fn remove_scene(&mut self, scene: S) -> bool {
        let Some(index) = self.collections.iter().position(|c| c.scene() == Some(scene)) else {
            return false;
        };
        let collection = self.collections.remove(index);
        debug!("removing scene collection {:?}", collection.name);
        self.release(collection);
        true
    }

    /// Removes every scene collection, keeping the virtual groups.
    pub fn remove_all_scenes(&mut self) {
        let mut index = 0;
        while index < self.collections.len() {
            if self.collections[index].is_virtual() {
                index += 1;
            } else {
                let collection = self.collections.remove(index);
                debug!("removing scene collection {:?}", collection.name);
                self.release(collection);
            }
        }
    }

    fn release(&mut self, collection: Collection<K, S>) {
        self.pool.free_all(collection.primary.children);
        self.pool.free_all(collection.search.children);
    }

    /// Creates an empty virtual group, or returns the existing one of that name.
    ///
    /// Groups honor the order set by [`Outline::set_virtual_order`], falling
    /// back to creation order.
    pub fn create_virtual(&mut self, name: &str) -> CollectionId {
        if let Some(id) = self.virtual_collection(name) {
            return id;
        }
        let offset = if self.virtual_order.is_empty() {
            self.collections.len() - self.scene_count()
        } else {
            let mut offset = 0;
            for listed in &self.virtual_order {
                if listed == name {
                    break;
                }
                if self.virtual_collection(listed).is_some() {
                    offset += 1;
                }
            }
            offset
        };
        let id = self.alloc_collection_id();
        debug!("creating virtual collection {name:?}");
        let collection = Collection::new(
            id,
            name.to_string(),
            CollectionSource::Virtual(Vec::new()),
            self.headers,
        );
        let index = self.scene_count() + offset;
        self.collections.insert(index, collection);
        id
    }

    /// Deletes the virtual group called `name`.
    pub fn delete_virtual(&mut self, name: &str) -> bool {
        let Some(index) = self
            .collections
            .iter()
            .position(|c| c.is_virtual() && c.name == name)
        else {
            return false;
        };
        debug!("deleting virtual collection {name:?}");
        let collection = self.collections.remove(index);
        self.release(collection);
        true
    }

    /// Deletes every virtual group.
    pub fn delete_all_virtual(&mut self) {
        let scenes = self.scene_count();
        let removed: Vec<_> = self.collections.drain(scenes..).collect();
        if !removed.is_empty() {
            debug!("deleting {} virtual collections", removed.len());
        }
        for collection in removed {
            self.release(collection);
        }
    }

    fn virtual_index(&self, name: &str) -> Option<usize> {
        self.collections
            .iter()
            .position(|c| c.is_virtual() && c.name == name)
    }

    /// Appends `key` to the virtual group `name`, creating the group if needed.
    ///
    /// Keys already listed are left where they are.
    pub fn add_to_virtual(&mut self, name: &str, key: K) -> CollectionId {
        self.add_all_to_virtual(name, [key])
    }

    /// Appends every key of `keys` to the virtual group `name`.
    pub fn add_all_to_virtual<I>(&mut self, name: &str, keys: I) -> CollectionId
    where
        I: IntoIterator<Item = K>,
    {
        let id = self.create_virtual(name);
        if let Some(index) = self.virtual_index(name) {
            let c = &mut self.collections[index];
            let mut added = false;
            for key in keys {
                added |= c.add_key(key);
            }
            if added {
                c.state = RefreshState::Dirty;
            }
        }
        id
    }

    /// Inserts `keys` into the existing virtual group `name` starting at `index`.
    ///
    /// The index is clamped; keys already listed elsewhere are moved.
    pub fn insert_into_virtual<I>(&mut self, name: &str, index: usize, keys: I) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        let Some(position) = self.virtual_index(name) else {
            return false;
        };
        let c = &mut self.collections[position];
        let mut at = index;
        for key in keys {
            c.insert_key(at, key);
            at = c.index_of(key).map_or(at, |i| i + 1);
        }
        c.state = RefreshState::Dirty;
        true
    }

    /// Removes `key` from the virtual group `name`.
    ///
    /// With `delete_if_empty`, a group left without entries is deleted.
    pub fn remove_from_virtual(&mut self, name: &str, key: K, delete_if_empty: bool) -> bool {
        let Some(position) = self.virtual_index(name) else {
            return false;
        };
        let c = &mut self.collections[position];
        let removed = c.remove_key(key);
        if removed {
            c.state = RefreshState::Dirty;
        }
        if delete_if_empty && c.virtual_keys().is_empty() {
            self.delete_virtual(name);
        }
        removed
    }

    /// Replaces the filter predicate and marks every collection dirty.
    pub fn set_filter(&mut self, filter: Option<KeyFilter<K>>) {
        self.filter = filter;
        self.mark_all_dirty();
    }

    /// Excludes `key` (and its subtree) from the hierarchy.
    pub fn ignore(&mut self, key: K) -> bool {
        let inserted = self.ignored.insert(key);
        if inserted {
            self.mark_all_dirty();
        }
        inserted
    }

    /// Lifts a previous [`Outline::ignore`].
    pub fn unignore(&mut self, key: K) -> bool {
        let removed = self.ignored.remove(&key);
        if removed {
            self.mark_all_dirty();
        }
        removed
    }

    /// Returns `true` if `key` is in the ignore set.
    #[must_use]
    pub fn is_ignored(&self, key: K) -> bool {
        self.ignored.contains(&key)
    }

    /// Whether `key` passes the filter predicate and the ignore set.
    #[must_use]
    pub fn passes(&self, key: K) -> bool {
        !self.ignored.contains(&key) && self.filter.as_ref().is_none_or(|f| f(key))
    }

    /// Marks one collection as needing a structural refresh.
    pub fn mark_dirty(&mut self, id: CollectionId) {
        if let Some(index) = self.collection_index(id) {
            self.collections[index].state = RefreshState::Dirty;
        }
    }

    /// Marks every collection as needing a structural refresh.
    pub fn mark_all_dirty(&mut self) {
        for c in &mut self.collections {
            c.state = RefreshState::Dirty;
        }
    }

    /// Live children of `key` that pass the filter, in sibling order.
    pub(crate) fn live_children<G>(&self, graph: &G, key: K) -> Vec<K>
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        (0..graph.child_count(key))
            .filter_map(|i| graph.child(key, i))
            .filter(|&child| self.passes(child))
            .collect()
    }

    /// Live top-level objects of the collection at `index` that pass the filter.
    pub(crate) fn top_level_keys<G>(&self, graph: &G, index: usize) -> Vec<K>
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        match &self.collections[index].source {
            CollectionSource::Scene(scene) => (0..graph.root_count(*scene))
                .filter_map(|i| graph.root(*scene, i))
                .filter(|&k| self.passes(k))
                .collect(),
            CollectionSource::Virtual(keys) => keys
                .iter()
                .copied()
                .filter(|&k| graph.is_alive(k) && self.passes(k))
                .collect(),
        }
    }

    /// Whether `row` is expanded. Headerless collections count as expanded.
    #[must_use]
    pub fn is_expanded(&self, projection: Projection, row: Row) -> bool {
        match row {
            Row::Collection(id) => self
                .collection(id)
                .is_some_and(|c| c.is_expanded(projection)),
            Row::Node(id) => self.pool.get(id).is_some_and(|n| n.expanded),
        }
    }

    /// Whether `row` has something to expand.
    ///
    /// Object nodes need at least one child passing the filter; search nodes
    /// need at least one search child; collections need a header row and at
    /// least one top-level entry.
    pub fn can_expand<G>(&self, graph: &G, projection: Projection, row: Row) -> bool
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        match row {
            Row::Collection(id) => {
                let Some(index) = self.collection_index(id) else {
                    return false;
                };
                let c = &self.collections[index];
                if !c.header {
                    return false;
                }
                match projection {
                    Projection::Primary => !self.top_level_keys(graph, index).is_empty(),
                    Projection::Search => !c.search.children.is_empty(),
                }
            }
            Row::Node(id) => {
                let Some(node) = self.pool.get(id) else {
                    return false;
                };
                if node.role.is_search() {
                    return !node.children.is_empty();
                }
                let key = node.key;
                graph.is_alive(key)
                    && (0..graph.child_count(key))
                        .filter_map(|i| graph.child(key, i))
                        .any(|child| self.passes(child))
            }
        }
    }

    /// Expands or collapses `row`; returns `false` if nothing changed.
    ///
    /// In the primary tree, expanding a node materializes its children and
    /// collapsing frees them. Search nodes keep their children either way.
    /// The height change is propagated up the ancestor chain in O(depth),
    /// so the row index stays exact even while a refresh is pending.
    pub fn set_expanded<G>(&mut self, graph: &G, projection: Projection, row: Row, expanded: bool) -> bool
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        match row {
            Row::Collection(id) => self.set_collection_expanded(graph, id, projection, expanded),
            Row::Node(id) => self.set_node_expanded(graph, id, expanded),
        }
    }

    /// Flips the expand state of `row`.
    pub fn toggle_expanded<G>(&mut self, graph: &G, projection: Projection, row: Row) -> bool
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let expanded = self.is_expanded(projection, row);
        self.set_expanded(graph, projection, row, !expanded)
    }

    fn set_collection_expanded<G>(
        &mut self,
        graph: &G,
        id: CollectionId,
        projection: Projection,
        expanded: bool,
    ) -> bool
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let Some(index) = self.collection_index(id) else {
            return false;
        };
        let c = &mut self.collections[index];
        if !c.header {
            return false;
        }
        let root = c.root_mut(projection);
        if root.expanded == expanded {
            return false;
        }
        root.expanded = expanded;
        if projection == Projection::Primary {
            if expanded {
                self.refresh_at(graph, index);
            } else {
                let children = mem::take(&mut root.children);
                root.content = 0;
                self.pool.free_all(children);
            }
        }
        true
    }

    fn set_node_expanded<G>(&mut self, graph: &G, id: NodeId, expanded: bool) -> bool
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let Some(node) = self.pool.get(id) else {
            return false;
        };
        if node.expanded == expanded {
            return false;
        }
        let (key, role, depth, collection, old_height) =
            (node.key, node.role, node.depth, node.collection, node.height);

        let new_height = if role.is_search() {
            if expanded {
                1 + self.sum_heights(&node.children)
            } else {
                1
            }
        } else if expanded {
            if graph.is_alive(key) {
                let live = self.live_children(graph, key);
                let (children, _) =
                    self.reconcile(graph, collection, Some(id), depth + 1, Vec::new(), &live);
                let height = 1 + self.sum_heights(&children);
                let old = self
                    .pool
                    .get_mut(id)
                    .map(|n| mem::replace(&mut n.children, children));
                if let Some(old) = old {
                    self.pool.recycle_list(old);
                }
                height
            } else {
                1
            }
        } else {
            let children = self
                .pool
                .get_mut(id)
                .map(|n| mem::take(&mut n.children))
                .unwrap_or_default();
            self.pool.free_all(children);
            1
        };

        if let Some(node) = self.pool.get_mut(id) {
            node.expanded = expanded;
            node.height = new_height;
        }

        let projection = if role.is_search() {
            Projection::Search
        } else {
            Projection::Primary
        };
        self.propagate(id, old_height, new_height, projection, collection);
        true
    }

    /// Replaces `old` by `new` in the heights of every expanded ancestor of `id`.
    fn propagate(
        &mut self,
        id: NodeId,
        old: usize,
        new: usize,
        projection: Projection,
        collection: CollectionId,
    ) {
        if old == new {
            return;
        }
        let mut current = self.pool.get(id).and_then(|n| n.parent);
        while let Some(parent) = current {
            let Some(node) = self.pool.get_mut(parent) else {
                return;
            };
            if !node.expanded {
                return;
            }
            node.height = (node.height + new).saturating_sub(old);
            current = node.parent;
        }
        if let Some(index) = self.collection_index(collection) {
            let root = self.collections[index].root_mut(projection);
            root.content = (root.content + new).saturating_sub(old);
        }
    }

    pub(crate) fn sum_heights(&self, ids: &[NodeId]) -> usize {
        ids.iter()
            .filter_map(|&id| self.pool.get(id))
            .map(|n| n.height)
            .sum()
    }

    /// Depth-first search for the node bound to `key` in `projection`.
    #[must_use]
    pub fn find(&self, projection: Projection, key: K) -> Option<NodeId> {
        self.collections
            .iter()
            .find_map(|c| self.find_below(c.children(projection), key))
    }

    /// Like [`Outline::find`], restricted to one collection.
    #[must_use]
    pub fn find_in(&self, collection: CollectionId, projection: Projection, key: K) -> Option<NodeId> {
        let c = self.collection(collection)?;
        self.find_below(c.children(projection), key)
    }

    fn find_below(&self, roots: &[NodeId], key: K) -> Option<NodeId> {
        let mut stack: SmallVec<[NodeId; 32]> = roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.pool.get(id) else {
                continue;
            };
            if node.key == key {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Expands the primary tree down to `key` and returns its node.
    ///
    /// Walks the scene-graph ancestors of `key`, expanding the owning
    /// collection and every ancestor node on the way. The first collection
    /// (in display order) that contains the object wins: its scene collection,
    /// or a virtual group listing the object or one of its ancestors.
    /// Returns `None` if the object is gone or filtered out.
    pub fn reveal<G>(&mut self, graph: &G, key: K) -> Option<NodeId>
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        if !graph.is_alive(key) {
            return None;
        }
        let mut chain: SmallVec<[K; 16]> = SmallVec::new();
        chain.push(key);
        chain.extend(ancestors(graph, key));
        chain.reverse();
        let scene = graph.scene_of(key);

        'collections: for index in 0..self.collections.len() {
            let c = &self.collections[index];
            let start = match &c.source {
                CollectionSource::Scene(s) => (Some(*s) == scene).then_some(0),
                CollectionSource::Virtual(keys) => chain.iter().position(|k| keys.contains(k)),
            };
            let Some(start) = start else {
                continue;
            };
            let id = c.id;
            let dirty = c.state == RefreshState::Dirty;
            if dirty {
                self.refresh_at(graph, index);
            }
            if !self.collections[index].is_expanded(Projection::Primary) {
                self.set_collection_expanded(graph, id, Projection::Primary, true);
            }
            let Some(mut current) = self.child_with_key(self.collections[index].children(Projection::Primary), chain[start])
            else {
                continue;
            };
            for &next in &chain[start + 1..] {
                if !self.pool.get(current).is_some_and(|n| n.expanded) {
                    self.set_node_expanded(graph, current, true);
                }
                let children = self.pool.get(current).map(|n| n.children.as_slice()).unwrap_or(&[]);
                match self.child_with_key(children, next) {
                    Some(child) => current = child,
                    None => continue 'collections,
                }
            }
            return Some(current);
        }
        None
    }

    fn child_with_key(&self, children: &[NodeId], key: K) -> Option<NodeId> {
        children
            .iter()
            .copied()
            .find(|&id| self.pool.get(id).is_some_and(|n| n.key == key))
    }

    /// Drops every cached display name; they are re-read on next access.
    pub fn reset_cached_names(&mut self) {
        self.pool.for_each_mut(|node| node.name = None);
    }

    /// Re-reads the cached name of every node bound to `key`.
    ///
    /// Returns `true` if at least one node was updated.
    pub fn refresh_name_of<G>(&mut self, graph: &G, key: K) -> bool
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let name = match graph.name(key) {
            Some(name) => name.to_string(),
            None => DESTROYED_NAME.to_string(),
        };
        let mut found = false;
        self.pool.for_each_mut(|node| {
            if node.key == key {
                node.name = Some(name.clone());
                found = true;
            }
        });
        found
    }

    /// Display label of `row`: the collection name, or the object's cached name.
    ///
    /// Object names are read from the graph on first access after a reset and
    /// then served from the cache. Destroyed objects read as [`DESTROYED_NAME`].
    pub fn display_name<G>(&mut self, graph: &G, row: Row) -> Option<&str>
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        match row {
            Row::Collection(id) => self.collection(id).map(Collection::name),
            Row::Node(id) => {
                let node = self.pool.get_mut(id)?;
                if !graph.is_alive(node.key) {
                    return Some(DESTROYED_NAME);
                }
                if node.name.is_none() {
                    node.name = Some(graph.name(node.key).unwrap_or_default().to_string());
                }
                node.name.as_deref()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_graph::{LoadMode, ObjectId, SceneId, SceneTree};

    #[test]
    fn virtual_groups_follow_priority_order() {
        let mut outline = Outline::<ObjectId, SceneId>::new();
        outline.set_virtual_order(["Cameras", "Lights", "Audio"]);
        outline.create_virtual("Audio");
        outline.create_virtual("Cameras");
        outline.create_virtual("Lights");
        let names: Vec<_> = outline.collections().iter().map(Collection::name).collect();
        assert_eq!(names, ["Cameras", "Lights", "Audio"]);
    }

    #[test]
    fn scenes_precede_virtual_groups() {
        let mut tree = SceneTree::new();
        let mut outline = Outline::<ObjectId, SceneId>::new();
        outline.create_virtual("Pinned");
        let main = tree.load_scene("Main", LoadMode::Single);
        let extra = tree.load_scene("Extra", LoadMode::Additive);
        outline.add_scene(&tree, main);
        outline.add_scene(&tree, extra);
        let names: Vec<_> = outline.collections().iter().map(Collection::name).collect();
        assert_eq!(names, ["Main", "Extra", "Pinned"]);
        assert_eq!(outline.scene_count(), 2);

        outline.delete_all_virtual();
        assert_eq!(outline.collections().len(), 2);
        outline.remove_all_scenes();
        assert!(outline.collections().is_empty());
    }

    #[test]
    fn debug_output_summarizes_the_pool() {
        let mut tree = SceneTree::new();
        let scene = tree.load_scene("S", LoadMode::Single);
        tree.spawn(scene, "a").unwrap();
        let mut outline = Outline::<ObjectId, SceneId>::new();
        outline.add_scene(&tree, scene);
        let text = alloc::format!("{outline:?}");
        assert!(text.starts_with("Outline"), "{text}");
        assert!(text.contains("nodes: 1"), "{text}");
    }

    #[test]
    fn remove_from_virtual_can_delete_empty_group() {
        let mut tree = SceneTree::new();
        let scene = tree.load_scene("S", LoadMode::Single);
        let a = tree.spawn(scene, "a").unwrap();
        let mut outline = Outline::<ObjectId, SceneId>::new();
        outline.add_to_virtual("Group", a);
        assert!(outline.remove_from_virtual("Group", a, true));
        assert_eq!(outline.virtual_collection("Group"), None);
        assert!(!outline.remove_from_virtual("Group", a, true));
    }

    #[test]
    fn filter_changes_mark_collections_dirty() {
        let mut tree = SceneTree::new();
        let scene = tree.load_scene("S", LoadMode::Single);
        let mut outline = Outline::<ObjectId, SceneId>::new();
        let id = outline.add_scene(&tree, scene);
        assert_eq!(outline.collection(id).unwrap().refresh_state(), RefreshState::Clean);
        let a = tree.spawn(scene, "a").unwrap();
        assert!(outline.ignore(a));
        assert_eq!(outline.collection(id).unwrap().refresh_state(), RefreshState::Dirty);
        assert!(!outline.passes(a));
        outline.refresh(&tree);
        assert_eq!(outline.row_count(Projection::Primary), 1);
    }
}
