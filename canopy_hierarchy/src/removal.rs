// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-phase removal: request now, confirm on the next frame.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use canopy_graph::SceneGraph;
use hashbrown::HashSet;
use log::debug;

use crate::Hierarchy;
use crate::event::HierarchyEvent;

/// Progress of a removal request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum RemovalState<K> {
    Idle,
    /// The host was asked to destroy `keys` during `frame`.
    AwaitingConfirmation { keys: Vec<K>, frame: u64 },
}

impl<K, S> Hierarchy<K, S>
where
    K: Copy + Eq + Hash + Debug,
    S: Copy + Eq + Debug,
{
    /// Records that the host is destroying `keys`.
    ///
    /// The host releases the objects at the end of its frame; the next
    /// [`update`](Self::update) confirms which handles are gone, drops them
    /// from the selection, refreshes and publishes
    /// [`HierarchyEvent::RemovalConfirmed`].
    ///
    /// Returns `false` if `keys` is empty or another request is pending.
    pub fn request_removal<I>(&mut self, keys: I) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        if !matches!(self.removal, RemovalState::Idle) {
            return false;
        }
        let mut seen = HashSet::new();
        let keys: Vec<K> = keys.into_iter().filter(|&k| seen.insert(k)).collect();
        if keys.is_empty() {
            return false;
        }
        debug!("removal of {} objects requested in frame {}", keys.len(), self.frame);
        self.removal = RemovalState::AwaitingConfirmation {
            keys,
            frame: self.frame,
        };
        true
    }

    /// Whether a removal request is waiting for confirmation.
    #[must_use]
    pub fn removal_pending(&self) -> bool {
        matches!(self.removal, RemovalState::AwaitingConfirmation { .. })
    }

    /// Confirms a pending removal once a later frame has started.
    pub(crate) fn resume_removal<G>(&mut self, graph: &G)
    where
        G: SceneGraph<Key = K, Scene = S> + ?Sized,
    {
        let RemovalState::AwaitingConfirmation { frame, .. } = self.removal else {
            return;
        };
        if self.frame <= frame {
            return;
        }
        let RemovalState::AwaitingConfirmation { keys, .. } =
            core::mem::replace(&mut self.removal, RemovalState::Idle)
        else {
            return;
        };

        let gone: Vec<K> = keys.into_iter().filter(|&k| !graph.is_alive(k)).collect();
        let gone_set: HashSet<K> = gone.iter().copied().collect();
        self.selection.retain(|key| !gone_set.contains(&key));
        self.refresh(graph);
        if self.is_searching() {
            self.refresh_search_results(graph);
        }
        self.set_list_dirty();
        debug!("removal confirmed for {} objects", gone.len());
        self.emit(HierarchyEvent::RemovalConfirmed(gone));
        self.notify_selection();
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use canopy_graph::{LoadMode, ObjectId, SceneId, SceneTree};

    use crate::{Hierarchy, HierarchyConfig, HierarchyEvent};

    #[test]
    fn second_request_is_refused_while_pending() {
        let mut tree = SceneTree::new();
        let scene = tree.load_scene("Main", LoadMode::Single);
        let a = tree.spawn(scene, "A").unwrap();
        let mut h: Hierarchy<ObjectId, SceneId> = Hierarchy::new(HierarchyConfig::default());
        assert!(h.request_removal([a]));
        assert!(!h.request_removal([a]), "only one request may be pending");

        let mut idle: Hierarchy<ObjectId, SceneId> = Hierarchy::new(HierarchyConfig::default());
        assert!(!idle.request_removal([]), "empty requests are ignored");
    }

    #[test]
    fn confirmation_waits_for_next_frame() {
        let mut tree = SceneTree::new();
        let scene = tree.load_scene("Main", LoadMode::Single);
        let a = tree.spawn(scene, "A").unwrap();
        let b = tree.spawn(scene, "B").unwrap();
        let mut h = Hierarchy::new(HierarchyConfig::default());
        let events: Vec<_> = tree.drain_events().collect();
        for event in events {
            h.handle_scene_event(&tree, event);
        }
        h.update(&tree, 0);
        h.select(&tree, [a, b], false);
        h.drain_events().for_each(drop);

        assert!(h.request_removal([a]));
        tree.destroy(a);
        h.update(&tree, 16);
        assert!(!h.removal_pending(), "confirmed on the frame after the request");
        let events: Vec<_> = h.drain_events().collect();
        assert!(events.contains(&HierarchyEvent::RemovalConfirmed(alloc::vec![a])));
        assert!(events.contains(&HierarchyEvent::SelectionChanged(alloc::vec![b])));
        assert_eq!(h.selection().items(), &[b]);
    }
}
