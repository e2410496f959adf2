// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Selection: the selected-object set of a hierarchy view.
//!
//! [`SelectionSet`] tracks which object handles are selected. It is the
//! bookkeeping half of selection: the hierarchy controller maps clicks to
//! concrete batches of handles and hands them to this type.
//!
//! The set keeps:
//! - the selected handles in insertion order (the last one is the **primary**,
//!   the object a property inspector would show);
//! - a hashed membership index, so `contains` stays cheap for large selections;
//! - a **revision** counter that bumps once per effective mutation, and the
//!   [`ChangeKind`] of the most recent one.
//!
//! Replacing the selection with a set that is equal to the current one,
//! regardless of order, is a no-op and leaves the revision untouched. Observers
//! that compare revisions therefore see exactly one change per logical update.
//!
//! ## Minimal example
//!
//! ```rust
//! use canopy_selection::{ChangeKind, SelectionSet};
//!
//! let mut selection = SelectionSet::<u32>::new();
//! assert!(selection.replace_with([1, 2, 3]));
//! assert_eq!(selection.revision(), 1);
//!
//! // Same set in a different order: nothing happens.
//! assert!(!selection.replace_with([3, 1, 2]));
//! assert_eq!(selection.revision(), 1);
//!
//! // Multi-modifier click on a selected item removes it.
//! selection.toggle(2);
//! assert_eq!(selection.items(), &[1, 3]);
//! assert_eq!(selection.last_change(), Some(ChangeKind::Removed));
//! assert_eq!(selection.primary(), Some(3));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashSet;

/// What the most recent effective mutation did.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// One or more handles were added.
    Added,
    /// One or more handles were removed.
    Removed,
    /// The contents were replaced by a different set.
    Replaced,
    /// The selection was emptied.
    Cleared,
}

/// An ordered set of selected handles with a change revision.
#[derive(Clone, Debug)]
pub struct SelectionSet<K> {
    items: Vec<K>,
    members: HashSet<K>,
    revision: u64,
    last_change: Option<ChangeKind>,
}

impl<K> Default for SelectionSet<K> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            members: HashSet::new(),
            revision: 0,
            last_change: None,
        }
    }
}

impl<K> SelectionSet<K> {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of selected handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Selected handles in insertion order.
    #[must_use]
    pub fn items(&self) -> &[K] {
        &self.items
    }

    /// Iterates the selected handles in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, K> {
        self.items.iter()
    }

    /// Monotonic counter bumped once per effective mutation.
    ///
    /// No-op calls leave it unchanged.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Kind of the most recent effective mutation, if any.
    #[must_use]
    pub fn last_change(&self) -> Option<ChangeKind> {
        self.last_change
    }

    fn bump(&mut self, kind: ChangeKind) {
        self.revision = self.revision.wrapping_add(1);
        self.last_change = Some(kind);
    }
}

impl<K: Copy + Eq + Hash> SelectionSet<K> {
    /// Returns `true` if `key` is selected.
    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.members.contains(&key)
    }

    /// The most recently added handle.
    #[must_use]
    pub fn primary(&self) -> Option<K> {
        self.items.last().copied()
    }

    /// Returns `true` if `keys` (duplicates ignored) is exactly the current set.
    pub fn set_equals<I>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        let mut seen: HashSet<K> = HashSet::with_capacity(self.items.len());
        for key in keys {
            if !self.members.contains(&key) {
                return false;
            }
            seen.insert(key);
        }
        seen.len() == self.members.len()
    }

    /// Replaces the selection with `keys`, keeping first-occurrence order.
    ///
    /// Returns `false` (and changes nothing) when the new set equals the
    /// current one. An empty batch clears the selection.
    pub fn replace_with<I>(&mut self, keys: I) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        let mut items = Vec::new();
        let mut members = HashSet::new();
        for key in keys {
            if members.insert(key) {
                items.push(key);
            }
        }
        if members == self.members {
            return false;
        }
        let kind = if items.is_empty() {
            ChangeKind::Cleared
        } else {
            ChangeKind::Replaced
        };
        self.items = items;
        self.members = members;
        self.bump(kind);
        true
    }

    /// Adds `key`; returns `true` if it was not selected before.
    pub fn add(&mut self, key: K) -> bool {
        if !self.members.insert(key) {
            return false;
        }
        self.items.push(key);
        self.bump(ChangeKind::Added);
        true
    }

    /// Adds every key of the batch that is not yet selected.
    ///
    /// The revision bumps once if anything was added.
    pub fn extend_with<I>(&mut self, keys: I) -> bool
    where
        I: IntoIterator<Item = K>,
    {
        let before = self.items.len();
        for key in keys {
            if self.members.insert(key) {
                self.items.push(key);
            }
        }
        let changed = self.items.len() != before;
        if changed {
            self.bump(ChangeKind::Added);
        }
        changed
    }

    /// Removes `key`; returns `true` if it was selected.
    pub fn remove(&mut self, key: K) -> bool {
        if !self.members.remove(&key) {
            return false;
        }
        self.items.retain(|&k| k != key);
        self.bump(ChangeKind::Removed);
        true
    }

    /// Adds `key` if it is not selected, removes it otherwise.
    ///
    /// Returns `true` if the key is selected afterwards.
    pub fn toggle(&mut self, key: K) -> bool {
        if self.contains(key) {
            self.remove(key);
            false
        } else {
            self.add(key);
            true
        }
    }

    /// Keeps only the handles for which `keep` returns `true`.
    ///
    /// Used to drop handles of destroyed objects; bumps the revision once if
    /// anything was removed.
    pub fn retain(&mut self, mut keep: impl FnMut(K) -> bool) -> bool {
        let before = self.items.len();
        let members = &mut self.members;
        self.items.retain(|&k| {
            let kept = keep(k);
            if !kept {
                members.remove(&k);
            }
            kept
        });
        let changed = self.items.len() != before;
        if changed {
            let kind = if self.items.is_empty() {
                ChangeKind::Cleared
            } else {
                ChangeKind::Removed
            };
            self.bump(kind);
        }
        changed
    }

    /// Empties the selection; returns `true` if anything was selected.
    pub fn clear(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.items.clear();
        self.members.clear();
        self.bump(ChangeKind::Cleared);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retain_keeps_index_in_sync() {
        let mut sel = SelectionSet::new();
        sel.replace_with([1_u32, 2, 3, 4]);
        assert!(sel.retain(|k| k % 2 == 0));
        assert_eq!(sel.items(), &[2, 4]);
        assert!(!sel.contains(1));
        assert!(sel.contains(4));
        assert_eq!(sel.last_change(), Some(ChangeKind::Removed));

        let rev = sel.revision();
        assert!(!sel.retain(|_| true));
        assert_eq!(sel.revision(), rev);
    }

    #[test]
    fn retain_everything_away_reports_cleared() {
        let mut sel = SelectionSet::new();
        sel.add(7_u32);
        sel.retain(|_| false);
        assert!(sel.is_empty());
        assert_eq!(sel.last_change(), Some(ChangeKind::Cleared));
    }
}
