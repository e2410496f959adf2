// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental structural refresh of the primary tree.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;
use core::mem;

use canopy_graph::SceneGraph;
use hashbrown::HashMap;
use log::trace;

use crate::Outline;
use crate::collection::{CollectionId, Projection, RefreshState};
use crate::node::{NodeId, NodeRole};

impl<K, S> Outline<K, S>
where
    K: Copy + Eq + Hash + Debug,
    S: Copy + Eq + Debug,
{
    /// Reconciles every collection against the live graph.
    ///
    /// Returns `true` if anything visible changed: an object appeared,
    /// disappeared or moved, or a height changed.
    pub fn refresh<G>(&mut self, graph: &G) -> bool
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let mut changed = false;
        for index in 0..self.collections.len() {
            changed |= self.refresh_at(graph, index);
        }
        changed
    }

    /// Reconciles only the collections marked [`RefreshState::Dirty`].
    ///
    /// Returns `true` if anything visible changed.
    pub fn refresh_dirty<G>(&mut self, graph: &G) -> bool
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let mut changed = false;
        for index in 0..self.collections.len() {
            if self.collections[index].state == RefreshState::Dirty {
                changed |= self.refresh_at(graph, index);
            }
        }
        changed
    }

    /// Reconciles one collection against the live graph.
    pub fn refresh_collection<G>(&mut self, graph: &G, id: CollectionId) -> bool
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        match self.collection_index(id) {
            Some(index) => self.refresh_at(graph, index),
            None => false,
        }
    }

    pub(crate) fn refresh_at<G>(&mut self, graph: &G, index: usize) -> bool
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let c = &mut self.collections[index];
        c.state = RefreshState::Refreshing;
        let mut changed = false;
        if let Some(keys) = c.keys_mut() {
            let before = keys.len();
            keys.retain(|&k| graph.is_alive(k));
            changed |= keys.len() != before;
        }
        if !c.is_expanded(Projection::Primary) {
            c.state = RefreshState::Clean;
            return changed;
        }
        let id = c.id;
        let old = mem::take(&mut c.primary.children);
        let old_content = c.primary.content;

        let live = self.top_level_keys(graph, index);
        let (children, reconciled) = self.reconcile(graph, id, None, 0, old, &live);
        let content = self.sum_heights(&children);

        let c = &mut self.collections[index];
        c.primary.children = children;
        c.primary.content = content;
        c.state = RefreshState::Clean;
        changed |= reconciled || content != old_content;
        trace!(
            "refreshed collection {:?}: {} rows, changed: {changed}",
            c.name,
            c.height(Projection::Primary)
        );
        changed
    }

    /// Matches `old` child nodes against the `live` child keys.
    ///
    /// Walks both lists in lock-step while the keys agree; from the first
    /// mismatch on, the remaining old nodes are indexed by key so that
    /// persisting objects keep their node (and its expand state), newcomers
    /// get fresh nodes and leftovers are freed. Expanded survivors are then
    /// refreshed recursively.
    pub(crate) fn reconcile<G>(
        &mut self,
        graph: &G,
        collection: CollectionId,
        parent: Option<NodeId>,
        depth: usize,
        old: Vec<NodeId>,
        live: &[K],
    ) -> (Vec<NodeId>, bool)
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let mut children = self.pool.take_list();
        let mut changed = false;

        let mut i = 0;
        while i < old.len()
            && i < live.len()
            && self.pool.get(old[i]).is_some_and(|n| n.key == live[i])
        {
            children.push(old[i]);
            i += 1;
        }

        if i < old.len() || i < live.len() {
            changed = true;
            let mut remaining: HashMap<K, NodeId> = old[i..]
                .iter()
                .filter_map(|&id| self.pool.get(id).map(|n| (n.key, id)))
                .collect();
            for &key in &live[i..] {
                let id = remaining.remove(&key).unwrap_or_else(|| {
                    self.pool
                        .alloc(key, NodeRole::Object, depth, parent, collection)
                });
                children.push(id);
            }
            for (_, id) in remaining.drain() {
                self.pool.free(id);
            }
        }
        self.pool.recycle_list(old);

        for &id in &children {
            changed |= self.refresh_node(graph, id);
        }
        (children, changed)
    }

    /// Brings one node in line with its object; returns whether it changed.
    ///
    /// A node whose object is gone is kept as a tombstone of height 1 until
    /// its parent drops it. Collapsed nodes are not walked.
    fn refresh_node<G>(&mut self, graph: &G, id: NodeId) -> bool
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let Some(node) = self.pool.get_mut(id) else {
            return false;
        };
        let (key, depth, collection, old_height) = (node.key, node.depth, node.collection, node.height);

        if !graph.is_alive(key) {
            let children = mem::take(&mut node.children);
            node.height = 1;
            let had_children = !children.is_empty();
            self.pool.free_all(children);
            return had_children || old_height != 1;
        }
        if !node.expanded {
            return false;
        }

        let old = mem::take(&mut node.children);
        let live = self.live_children(graph, key);
        let (children, changed) = self.reconcile(graph, collection, Some(id), depth + 1, old, &live);
        let height = 1 + self.sum_heights(&children);
        if let Some(node) = self.pool.get_mut(id) {
            node.children = children;
            node.height = height;
        }
        changed || height != old_height
    }
}
