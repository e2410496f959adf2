// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The flattened row index, computed from cached heights.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use crate::Outline;
use crate::collection::{CollectionId, Projection};
use crate::node::NodeId;

/// The entity shown on one row.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Row {
    /// A collection header.
    Collection(CollectionId),
    /// A tree node.
    Node(NodeId),
}

impl<K, S> Outline<K, S>
where
    K: Copy + Eq + Hash + Debug,
    S: Copy + Eq + Debug,
{
    /// Total number of rows in `projection`.
    #[must_use]
    pub fn row_count(&self, projection: Projection) -> usize {
        self.collections.iter().map(|c| c.height(projection)).sum()
    }

    /// Entity on `row`, or `None` past the end.
    ///
    /// Subtracts collection heights in order, then descends through child
    /// heights; the cost is proportional to depth times sibling count, never
    /// to the size of the tree.
    #[must_use]
    pub fn node_at(&self, projection: Projection, row: usize) -> Option<Row> {
        let mut remaining = row;
        for c in &self.collections {
            let height = c.height(projection);
            if remaining >= height {
                remaining -= height;
                continue;
            }
            if c.header {
                if remaining == 0 {
                    return Some(Row::Collection(c.id));
                }
                remaining -= 1;
            }
            return self.node_below(c.children(projection), remaining).map(Row::Node);
        }
        None
    }

    fn node_below(&self, roots: &[NodeId], mut remaining: usize) -> Option<NodeId> {
        let mut siblings = roots;
        'levels: loop {
            for &id in siblings {
                let node = self.pool.get(id)?;
                if remaining < node.height {
                    if remaining == 0 {
                        return Some(id);
                    }
                    remaining -= 1;
                    siblings = &node.children;
                    continue 'levels;
                }
                remaining -= node.height;
            }
            return None;
        }
    }

    /// Row currently showing `entity`, or `None` if it is not visible.
    ///
    /// Inverse of [`Outline::node_at`]: a node inside a collapsed ancestor,
    /// in a hidden collection, or a headerless collection's header has no row.
    #[must_use]
    pub fn row_of(&self, projection: Projection, entity: Row) -> Option<usize> {
        let (collection, mut row, top) = match entity {
            Row::Collection(id) => {
                let c = self.collection(id)?;
                if !c.header {
                    return None;
                }
                (id, 0, None)
            }
            Row::Node(id) => {
                let mut row = 0;
                let mut current = id;
                let mut node = self.pool.get(id)?;
                while let Some(parent_id) = node.parent {
                    let parent = self.pool.get(parent_id)?;
                    if !parent.expanded {
                        return None;
                    }
                    row += 1 + self.height_before(&parent.children, current)?;
                    current = parent_id;
                    node = parent;
                }
                (node.collection, row, Some(current))
            }
        };

        let mut before = 0;
        for c in &self.collections {
            if c.id != collection {
                before += c.height(projection);
                continue;
            }
            if c.is_hidden(projection) {
                return None;
            }
            if let Some(top) = top {
                if !c.is_expanded(projection) {
                    return None;
                }
                row += self.height_before(c.children(projection), top)?;
                if c.header {
                    row += 1;
                }
            }
            return Some(before + row);
        }
        None
    }

    /// Sum of the heights of the siblings before `id`; `None` if absent.
    fn height_before(&self, siblings: &[NodeId], id: NodeId) -> Option<usize> {
        let mut sum = 0;
        for &sibling in siblings {
            if sibling == id {
                return Some(sum);
            }
            sum += self.pool.get(sibling).map_or(0, |n| n.height);
        }
        None
    }

    /// Every row of `projection`, in order.
    ///
    /// A full walk of the visible tree; `flatten(p)[i] == node_at(p, i)` for
    /// every `i`.
    #[must_use]
    pub fn flatten(&self, projection: Projection) -> Vec<Row> {
        let mut rows = Vec::with_capacity(self.row_count(projection));
        for c in &self.collections {
            if c.is_hidden(projection) {
                continue;
            }
            if c.header {
                rows.push(Row::Collection(c.id));
            }
            if c.is_expanded(projection) {
                self.flatten_into(c.children(projection), &mut rows);
            }
        }
        rows
    }

    fn flatten_into(&self, ids: &[NodeId], rows: &mut Vec<Row>) {
        for &id in ids {
            let Some(node) = self.pool.get(id) else {
                continue;
            };
            rows.push(Row::Node(id));
            if node.expanded {
                self.flatten_into(&node.children, rows);
            }
        }
    }
}
