// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instance registry owning the spare node pools.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use canopy_outline::NodePool;
use log::debug;

use crate::{Hierarchy, HierarchyConfig};

/// Manages every [`Hierarchy`] of a process and recycles their node pools.
///
/// Registering hands the new instance a spare pool when one exists.
/// Unregistering takes the instance's pool back. When the last instance
/// unregisters, every spare pool is dropped.
#[derive(Debug)]
pub struct HierarchyRegistry<K> {
    spare: Vec<NodePool<K>>,
    alive: usize,
}

impl<K> Default for HierarchyRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> HierarchyRegistry<K> {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            spare: Vec::new(),
            alive: 0,
        }
    }

    /// Number of registered instances.
    #[must_use]
    pub fn alive(&self) -> usize {
        self.alive
    }

    /// Number of pools waiting for an instance.
    #[must_use]
    pub fn spare_count(&self) -> usize {
        self.spare.len()
    }
}

impl<K> HierarchyRegistry<K>
where
    K: Copy + Eq + Hash + Debug,
{
    /// Creates and registers a hierarchy.
    pub fn register<S>(&mut self, config: HierarchyConfig) -> Hierarchy<K, S>
    where
        S: Copy + Eq + Debug,
    {
        self.alive += 1;
        let pool = self.spare.pop().unwrap_or_default();
        Hierarchy::with_pool(config, pool)
    }

    /// Unregisters `hierarchy`, keeping its pool for the next instance.
    pub fn unregister<S>(&mut self, hierarchy: Hierarchy<K, S>)
    where
        S: Copy + Eq + Debug,
    {
        let pool = hierarchy.into_pool();
        self.alive = self.alive.saturating_sub(1);
        if self.alive == 0 {
            debug!("last hierarchy unregistered, dropping {} spare pools", self.spare.len());
            self.spare.clear();
        } else {
            self.spare.push(pool);
        }
    }
}

#[cfg(test)]
mod tests {
    use canopy_graph::{ObjectId, SceneId};

    use super::*;

    #[test]
    fn pools_are_reused_then_dropped_with_the_last_instance() {
        let mut registry: HierarchyRegistry<ObjectId> = HierarchyRegistry::new();
        let a: Hierarchy<ObjectId, SceneId> = registry.register(HierarchyConfig::default());
        let b: Hierarchy<ObjectId, SceneId> = registry.register(HierarchyConfig::default());
        assert_eq!(registry.alive(), 2);

        registry.unregister(a);
        assert_eq!(registry.spare_count(), 1, "pool of the first instance is kept");
        let c: Hierarchy<ObjectId, SceneId> = registry.register(HierarchyConfig::default());
        assert_eq!(registry.spare_count(), 0, "spare pool handed to the new instance");

        registry.unregister(b);
        registry.unregister(c);
        assert_eq!(registry.alive(), 0);
        assert_eq!(registry.spare_count(), 0, "last unregister drops every pool");
    }
}
