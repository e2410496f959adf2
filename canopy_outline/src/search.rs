// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The search projection: a parallel tree of matches and their ancestors.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;
use core::mem;

use canopy_graph::SceneGraph;
use hashbrown::HashSet;
use log::trace;

use crate::Outline;
use crate::collection::{CollectionId, Projection};
use crate::node::{NodeId, NodeRole};

/// Normalizes a user query: trimmed and lowercased.
///
/// An empty result means "no search".
#[must_use]
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

struct SearchPass<'q, K> {
    needle: &'q str,
    collapsed: HashSet<K>,
}

impl<K, S> Outline<K, S>
where
    K: Copy + Eq + Hash + Debug,
    S: Copy + Eq + Debug,
{
    /// Rebuilds the search tree of every collection for `query`.
    ///
    /// Each collection gets the objects whose name contains the query
    /// (case-insensitive) plus their ancestors as context. Objects filtered
    /// out of the primary tree are filtered here too, and the primary tree's
    /// expand state is never touched. Search nodes the user collapsed stay
    /// collapsed across rebuilds. A collection without matches is hidden; one
    /// that gains matches is expanded.
    ///
    /// Returns `true` if the set of rows changed.
    pub fn refresh_search<G>(&mut self, graph: &G, query: &str) -> bool
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let needle = normalize_query(query);
        let mut changed = false;
        for index in 0..self.collections.len() {
            changed |= self.refresh_search_at(graph, index, &needle);
        }
        trace!(
            "search {needle:?}: {} rows, changed: {changed}",
            self.row_count(Projection::Search)
        );
        changed
    }

    fn refresh_search_at<G>(&mut self, graph: &G, index: usize, needle: &str) -> bool
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let (id, was_hidden) = {
            let c = &self.collections[index];
            (c.id, c.search.hidden)
        };
        let old_roots = mem::take(&mut self.collections[index].search.children);
        let mut before = Vec::new();
        self.signature(&old_roots, &mut before);
        let mut pass = SearchPass {
            needle,
            collapsed: HashSet::new(),
        };
        self.collect_collapsed(&old_roots, &mut pass.collapsed);
        self.pool.free_all(old_roots);

        let mut roots = self.pool.take_list();
        if !needle.is_empty() {
            for key in self.top_level_keys(graph, index) {
                if let Some(node) = self.build_search(graph, &pass, id, key, 0) {
                    roots.push(node);
                }
            }
        }
        let content = self.sum_heights(&roots);
        let mut after = Vec::new();
        self.signature(&roots, &mut after);

        let hidden = roots.is_empty();
        let search = &mut self.collections[index].search;
        search.children = roots;
        search.content = content;
        search.hidden = hidden;
        if was_hidden && !hidden {
            search.expanded = true;
        }
        before != after || was_hidden != hidden
    }

    /// Builds the search subtree rooted at `key`, or `None` if nothing in it matches.
    fn build_search<G>(
        &mut self,
        graph: &G,
        pass: &SearchPass<'_, K>,
        collection: CollectionId,
        key: K,
        depth: usize,
    ) -> Option<NodeId>
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let mut children = self.pool.take_list();
        for child in self.live_children(graph, key) {
            if let Some(node) = self.build_search(graph, pass, collection, child, depth + 1) {
                children.push(node);
            }
        }
        let hit = graph
            .name(key)
            .is_some_and(|name| name.to_lowercase().contains(pass.needle));
        if !hit && children.is_empty() {
            self.pool.recycle_list(children);
            return None;
        }

        let role = if hit {
            NodeRole::SearchHit
        } else {
            NodeRole::SearchContext
        };
        let id = self.pool.alloc(key, role, depth, None, collection);
        let expanded = !children.is_empty() && !pass.collapsed.contains(&key);
        let height = if expanded {
            1 + self.sum_heights(&children)
        } else {
            1
        };
        for &child in &children {
            if let Some(node) = self.pool.get_mut(child) {
                node.parent = Some(id);
            }
        }
        if let Some(node) = self.pool.get_mut(id) {
            let spare = mem::replace(&mut node.children, children);
            node.expanded = expanded;
            node.height = height;
            self.pool.recycle_list(spare);
        }
        Some(id)
    }

    /// Frees every search node and hides the search projection.
    pub fn clear_search(&mut self) {
        for c in &mut self.collections {
            let roots = mem::take(&mut c.search.children);
            c.search.content = 0;
            c.search.hidden = true;
            c.search.expanded = false;
            self.pool.free_all(roots);
        }
    }

    /// Expands every search collection (used when search mode is entered).
    pub fn expand_search_collections(&mut self) {
        for c in &mut self.collections {
            c.search.expanded = true;
        }
    }

    /// Rows that are actual matches, in row order.
    #[must_use]
    pub fn search_hits(&self) -> Vec<K> {
        let mut hits = Vec::new();
        for c in &self.collections {
            let mut stack: Vec<NodeId> = c.search.children.iter().rev().copied().collect();
            while let Some(id) = stack.pop() {
                let Some(node) = self.pool.get(id) else {
                    continue;
                };
                if node.role == NodeRole::SearchHit {
                    hits.push(node.key);
                }
                stack.extend(node.children.iter().rev().copied());
            }
        }
        hits
    }

    fn signature(&self, ids: &[NodeId], out: &mut Vec<(K, NodeRole, usize, bool)>) {
        for &id in ids {
            if let Some(node) = self.pool.get(id) {
                out.push((node.key, node.role, node.depth, node.expanded));
                self.signature(&node.children, out);
            }
        }
    }

    fn collect_collapsed(&self, ids: &[NodeId], out: &mut HashSet<K>) {
        for &id in ids {
            if let Some(node) = self.pool.get(id) {
                if !node.expanded && !node.children.is_empty() {
                    out.insert(node.key);
                }
                self.collect_collapsed(&node.children, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{NodeRole, Outline, Projection, Row};
    use canopy_graph::{LoadMode, ObjectId, SceneId, SceneTree};

    struct Fixture {
        tree: SceneTree,
        outline: Outline<ObjectId, SceneId>,
        player: ObjectId,
        camera: ObjectId,
    }

    fn fixture() -> Fixture {
        let mut tree = SceneTree::new();
        let scene = tree.load_scene("Main", LoadMode::Single);
        let player = tree.spawn(scene, "Player").unwrap();
        let camera = tree.spawn_child(player, "Camera").unwrap();
        tree.spawn_child(player, "Body").unwrap();
        tree.spawn(scene, "Light").unwrap();
        let mut outline = Outline::new();
        outline.add_scene(&tree, scene);
        Fixture {
            tree,
            outline,
            player,
            camera,
        }
    }

    #[test]
    fn hits_come_with_their_ancestors() {
        let Fixture {
            tree,
            mut outline,
            player,
            camera,
        } = fixture();
        assert!(outline.refresh_search(&tree, "  CAM "));
        let rows = outline.flatten(Projection::Search);
        assert_eq!(rows.len(), 3, "header, Player, Camera");
        let Row::Node(p) = rows[1] else {
            panic!("expected a node row");
        };
        let p = outline.node(p).unwrap();
        assert_eq!(p.key(), player);
        assert_eq!(p.role(), NodeRole::SearchContext);
        assert_eq!(outline.search_hits(), [camera]);
        assert!(!outline.refresh_search(&tree, "cam"), "same results");
    }

    #[test]
    fn primary_expand_state_is_untouched() {
        let Fixture {
            tree, mut outline, ..
        } = fixture();
        let before = outline.flatten(Projection::Primary);
        outline.refresh_search(&tree, "body");
        assert_eq!(outline.flatten(Projection::Primary), before);
        outline.clear_search();
        assert_eq!(outline.row_count(Projection::Search), 0);
        assert_eq!(outline.flatten(Projection::Primary), before);
    }

    #[test]
    fn collapsed_search_nodes_stay_collapsed() {
        let Fixture {
            tree,
            mut outline,
            player,
            ..
        } = fixture();
        outline.refresh_search(&tree, "a");
        let node = outline.find(Projection::Search, player).unwrap();
        assert!(outline.set_expanded(&tree, Projection::Search, Row::Node(node), false));
        let collapsed = outline.row_count(Projection::Search);

        outline.refresh_search(&tree, "a");
        let node = outline.find(Projection::Search, player).unwrap();
        assert!(!outline.is_expanded(Projection::Search, Row::Node(node)));
        assert_eq!(outline.row_count(Projection::Search), collapsed);
    }

    #[test]
    fn collections_without_results_are_hidden() {
        let Fixture {
            tree, mut outline, ..
        } = fixture();
        assert!(!outline.refresh_search(&tree, "nothing matches"));
        assert_eq!(outline.row_count(Projection::Search), 0);
        assert_eq!(outline.node_at(Projection::Search, 0), None);
        assert!(!outline.refresh_search(&tree, "   "));
        assert!(outline.collections()[0].is_hidden(Projection::Search));
    }
}
