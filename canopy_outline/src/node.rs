// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree nodes and the slot pool that recycles them.

use alloc::string::String;
use alloc::vec::Vec;

use crate::collection::CollectionId;

/// Identifier for a [`TreeNode`] in a [`NodePool`].
///
/// Slot index plus generation, like the object handles of the scene graph:
/// a freed id never aliases the node that later reuses its slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// What a node stands for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum NodeRole {
    /// A plain object in the primary tree.
    #[default]
    Object,
    /// A search result: the object's name matched the query.
    SearchHit,
    /// An ancestor of a search result, shown only for context.
    SearchContext,
}

impl NodeRole {
    /// Returns `true` for nodes that belong to the search projection.
    #[must_use]
    pub const fn is_search(self) -> bool {
        matches!(self, Self::SearchHit | Self::SearchContext)
    }
}

/// One row-producing entry of the cached tree.
///
/// The invariant every operation maintains:
/// `height == 1 + sum(child heights)` when expanded, `1` otherwise.
#[derive(Clone, Debug)]
pub struct TreeNode<K> {
    pub(crate) key: K,
    pub(crate) role: NodeRole,
    pub(crate) name: Option<String>,
    pub(crate) depth: usize,
    pub(crate) height: usize,
    pub(crate) expanded: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) collection: CollectionId,
    pub(crate) children: Vec<NodeId>,
}

impl<K: Copy> TreeNode<K> {
    /// Handle of the bound object.
    #[must_use]
    pub fn key(&self) -> K {
        self.key
    }

    /// Role of the node.
    #[must_use]
    pub fn role(&self) -> NodeRole {
        self.role
    }

    /// Nesting depth; `0` for the top-level objects of a collection.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of rows the node contributes, itself included.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the node is expanded.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Parent node, or `None` for top-level nodes.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Collection the node belongs to.
    #[must_use]
    pub fn collection(&self) -> CollectionId {
        self.collection
    }

    /// Child nodes in sibling order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Cached display name, if it has been resolved since the last reset.
    #[must_use]
    pub fn cached_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Clone, Debug)]
struct Slot<K> {
    generation: u32,
    node: Option<TreeNode<K>>,
}

/// Arena of tree nodes with slot and child-list recycling.
///
/// Expanding and collapsing large subtrees allocates and frees many nodes;
/// the pool keeps freed slots and the backing storage of freed child lists
/// so that steady-state browsing does not allocate.
#[derive(Clone, Debug)]
pub struct NodePool<K> {
    slots: Vec<Slot<K>>,
    free: Vec<u32>,
    spare_lists: Vec<Vec<NodeId>>,
}

impl<K> Default for NodePool<K> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            spare_lists: Vec::new(),
        }
    }
}

impl<K> NodePool<K> {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Returns `true` if no node is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots ever allocated, live or free.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<K: Copy> NodePool<K> {
    /// Returns the node for `id`, or `None` if it was freed.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&TreeNode<K>> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.node.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut TreeNode<K>> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.node.as_mut()
    }

    /// Allocates a collapsed leaf node of height 1.
    pub(crate) fn alloc(
        &mut self,
        key: K,
        role: NodeRole,
        depth: usize,
        parent: Option<NodeId>,
        collection: CollectionId,
    ) -> NodeId {
        let node = TreeNode {
            key,
            role,
            name: None,
            depth,
            height: 1,
            expanded: false,
            parent,
            collection,
            children: self.take_list(),
        };
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.node = Some(node);
            NodeId(idx, slot.generation)
        } else {
            #[allow(clippy::cast_possible_truncation, reason = "slot count fits in u32")]
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                node: Some(node),
            });
            NodeId(idx, 1)
        }
    }

    /// Frees `id` and its whole subtree. Stale ids are ignored.
    pub(crate) fn free(&mut self, id: NodeId) {
        let mut stack = self.take_list();
        stack.push(id);
        while let Some(id) = stack.pop() {
            let Some(slot) = self.slots.get_mut(id.idx()) else {
                continue;
            };
            if slot.generation != id.1 {
                continue;
            }
            if let Some(mut node) = slot.node.take() {
                stack.append(&mut node.children);
                self.spare_lists.push(node.children);
                self.free.push(id.0);
            }
        }
        self.spare_lists.push(stack);
    }

    /// Frees every node in `ids` (and their subtrees), then recycles the list itself.
    pub(crate) fn free_all(&mut self, mut ids: Vec<NodeId>) {
        for id in ids.drain(..) {
            self.free(id);
        }
        self.spare_lists.push(ids);
    }

    /// An empty child list, reusing freed storage when available.
    pub(crate) fn take_list(&mut self) -> Vec<NodeId> {
        self.spare_lists.pop().unwrap_or_default()
    }

    /// Returns a list's storage to the pool.
    pub(crate) fn recycle_list(&mut self, mut list: Vec<NodeId>) {
        list.clear();
        self.spare_lists.push(list);
    }

    /// Calls `f` on every live node.
    pub(crate) fn for_each_mut(&mut self, mut f: impl FnMut(&mut TreeNode<K>)) {
        for slot in &mut self.slots {
            if let Some(node) = slot.node.as_mut() {
                f(node);
            }
        }
    }

    /// Frees every node while keeping the allocated storage.
    ///
    /// Generations are kept, so ids handed out before the reset stay stale.
    pub fn clear(&mut self) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if let Some(mut node) = slot.node.take() {
                node.children.clear();
                self.spare_lists.push(node.children);
                #[allow(clippy::cast_possible_truncation, reason = "slot count fits in u32")]
                let idx = idx as u32;
                self.free.push(idx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const C: CollectionId = CollectionId(0);

    #[test]
    fn freeing_a_subtree_recycles_slots_and_lists() {
        let mut pool = NodePool::<u32>::new();
        let root = pool.alloc(1, NodeRole::Object, 0, None, C);
        let child = pool.alloc(2, NodeRole::Object, 1, Some(root), C);
        let grandchild = pool.alloc(3, NodeRole::Object, 2, Some(child), C);
        pool.get_mut(child).unwrap().children.push(grandchild);
        pool.get_mut(root).unwrap().children.push(child);
        assert_eq!(pool.len(), 3);

        pool.free(root);
        assert!(pool.is_empty());
        assert!(pool.get(grandchild).is_none());

        let again = pool.alloc(4, NodeRole::Object, 0, None, C);
        assert_eq!(pool.capacity(), 3, "freed slots are reused");
        assert_ne!(again, root);
        assert_ne!(again, child);
        assert_ne!(again, grandchild);
    }

    #[test]
    fn size_queries_do_not_need_copy_keys() {
        let pool = NodePool::<alloc::string::String>::new();
        assert!(pool.is_empty());
        assert_eq!(pool.len(), 0);
        assert_eq!(pool.capacity(), 0);
    }

    #[test]
    fn clear_keeps_generations() {
        let mut pool = NodePool::<u32>::new();
        let a = pool.alloc(1, NodeRole::Object, 0, None, C);
        pool.clear();
        assert!(pool.get(a).is_none());
        let b = pool.alloc(1, NodeRole::Object, 0, None, C);
        assert_ne!(a, b);
        assert_eq!(pool.len(), 1);
    }
}
