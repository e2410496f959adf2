// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory scene graph with generational handles.

use alloc::string::String;
use alloc::vec::Vec;

use crate::types::{GraphError, LoadMode, ObjectId, SceneEvent, SceneId};
use crate::{SceneGraph, SceneGraphMut, is_ancestor_or_self};

#[derive(Clone, Debug, PartialEq)]
struct Object {
    name: String,
    active: bool,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    scene: SceneId,
}

#[derive(Clone, Debug, PartialEq)]
struct Scene {
    name: String,
    roots: Vec<ObjectId>,
}

#[derive(Clone, Debug, PartialEq)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// An in-memory scene graph.
///
/// Objects live in a slot arena addressed by [`ObjectId`]; destroyed slots
/// are recycled with a bumped generation. Scene load and unload signals are
/// queued and handed out by [`SceneTree::drain_events`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneTree {
    objects: Vec<Slot<Object>>,
    free_objects: Vec<u32>,
    scenes: Vec<Slot<Scene>>,
    free_scenes: Vec<u32>,
    events: Vec<SceneEvent<SceneId>>,
}

impl SceneTree {
    /// Creates an empty graph with no scenes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a new, empty scene.
    ///
    /// [`LoadMode::Single`] unloads every other scene first.
    pub fn load_scene(&mut self, name: impl Into<String>, mode: LoadMode) -> SceneId {
        if mode == LoadMode::Single {
            let loaded: Vec<SceneId> = self.scenes().collect();
            for scene in loaded {
                self.unload_scene(scene);
            }
        }
        let scene = Scene {
            name: name.into(),
            roots: Vec::new(),
        };
        let id = alloc_slot(&mut self.scenes, &mut self.free_scenes, scene);
        let id = SceneId::new(id.0, id.1);
        self.events.push(SceneEvent::Loaded { scene: id, mode });
        id
    }

    /// Unloads a scene and destroys every object in it.
    ///
    /// Returns `false` if the scene was not loaded.
    pub fn unload_scene(&mut self, scene: SceneId) -> bool {
        let Some(roots) = self.scene(scene).map(|s| s.roots.clone()) else {
            return false;
        };
        for root in roots {
            self.destroy(root);
        }
        let slot = &mut self.scenes[scene.idx()];
        slot.value = None;
        self.free_scenes.push(scene.0);
        self.events.push(SceneEvent::Unloaded { scene });
        true
    }

    /// Iterates the loaded scenes in load order of their slots.
    pub fn scenes(&self) -> impl Iterator<Item = SceneId> + '_ {
        self.scenes.iter().enumerate().filter_map(|(idx, slot)| {
            slot.value.as_ref()?;
            #[allow(clippy::cast_possible_truncation, reason = "slot count fits in u32")]
            let idx = idx as u32;
            Some(SceneId::new(idx, slot.generation))
        })
    }

    /// Returns `true` if the scene is loaded.
    pub fn is_loaded(&self, scene: SceneId) -> bool {
        self.scene(scene).is_some()
    }

    /// Spawns a new active root object at the end of `scene`'s roots.
    pub fn spawn(&mut self, scene: SceneId, name: impl Into<String>) -> Result<ObjectId, GraphError> {
        if !self.is_loaded(scene) {
            return Err(GraphError::UnknownScene);
        }
        let id = self.alloc_object(name.into(), None, scene);
        if let Some(s) = self.scene_mut(scene) {
            s.roots.push(id);
        }
        Ok(id)
    }

    /// Spawns a new active object as the last child of `parent`.
    pub fn spawn_child(
        &mut self,
        parent: ObjectId,
        name: impl Into<String>,
    ) -> Result<ObjectId, GraphError> {
        let scene = self.object(parent).ok_or(GraphError::Stale)?.scene;
        let id = self.alloc_object(name.into(), Some(parent), scene);
        if let Some(p) = self.object_mut(parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    /// Destroys an object and its whole subtree.
    ///
    /// Returns `false` if the handle was already stale.
    pub fn destroy(&mut self, key: ObjectId) -> bool {
        if !self.is_alive(key) {
            return false;
        }
        self.detach(key);
        let mut stack = alloc::vec![key];
        while let Some(id) = stack.pop() {
            let slot = &mut self.objects[id.idx()];
            if let Some(object) = slot.value.take() {
                stack.extend(object.children);
                self.free_objects.push(id.0);
            }
        }
        true
    }

    /// Renames a live object.
    pub fn rename(&mut self, key: ObjectId, name: impl Into<String>) -> bool {
        match self.object_mut(key) {
            Some(object) => {
                object.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Sets the object's own active flag.
    pub fn set_active(&mut self, key: ObjectId, active: bool) -> bool {
        match self.object_mut(key) {
            Some(object) => {
                object.active = active;
                true
            }
            None => false,
        }
    }

    /// Number of live objects across all scenes.
    pub fn object_count(&self) -> usize {
        self.objects.iter().filter(|s| s.value.is_some()).count()
    }

    /// Takes every queued scene signal, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = SceneEvent<SceneId>> + '_ {
        self.events.drain(..)
    }

    fn alloc_object(&mut self, name: String, parent: Option<ObjectId>, scene: SceneId) -> ObjectId {
        let object = Object {
            name,
            active: true,
            parent,
            children: Vec::new(),
            scene,
        };
        let (idx, generation) = alloc_slot(&mut self.objects, &mut self.free_objects, object);
        ObjectId::new(idx, generation)
    }

    fn object(&self, key: ObjectId) -> Option<&Object> {
        let slot = self.objects.get(key.idx())?;
        if slot.generation != key.1 {
            return None;
        }
        slot.value.as_ref()
    }

    fn object_mut(&mut self, key: ObjectId) -> Option<&mut Object> {
        let slot = self.objects.get_mut(key.idx())?;
        if slot.generation != key.1 {
            return None;
        }
        slot.value.as_mut()
    }

    fn scene(&self, scene: SceneId) -> Option<&Scene> {
        let slot = self.scenes.get(scene.idx())?;
        if slot.generation != scene.1 {
            return None;
        }
        slot.value.as_ref()
    }

    fn scene_mut(&mut self, scene: SceneId) -> Option<&mut Scene> {
        let slot = self.scenes.get_mut(scene.idx())?;
        if slot.generation != scene.1 {
            return None;
        }
        slot.value.as_mut()
    }

    /// Unlinks `key` from its parent's children or its scene's roots.
    fn detach(&mut self, key: ObjectId) {
        let Some(object) = self.object(key) else {
            return;
        };
        let (parent, scene) = (object.parent, object.scene);
        let siblings = match parent {
            Some(p) => self.object_mut(p).map(|p| &mut p.children),
            None => self.scene_mut(scene).map(|s| &mut s.roots),
        };
        if let Some(siblings) = siblings {
            siblings.retain(|&k| k != key);
        }
    }

    fn set_scene_recursive(&mut self, key: ObjectId, scene: SceneId) {
        let mut stack = alloc::vec![key];
        while let Some(id) = stack.pop() {
            if let Some(object) = self.object_mut(id) {
                object.scene = scene;
                stack.extend(object.children.iter().copied());
            }
        }
    }

    fn siblings(&self, key: ObjectId) -> Option<&Vec<ObjectId>> {
        let object = self.object(key)?;
        match object.parent {
            Some(p) => self.object(p).map(|p| &p.children),
            None => self.scene(object.scene).map(|s| &s.roots),
        }
    }
}

fn alloc_slot<T>(slots: &mut Vec<Slot<T>>, free: &mut Vec<u32>, value: T) -> (u32, u32) {
    if let Some(idx) = free.pop() {
        let slot = &mut slots[idx as usize];
        slot.generation = slot.generation.wrapping_add(1);
        slot.value = Some(value);
        (idx, slot.generation)
    } else {
        #[allow(clippy::cast_possible_truncation, reason = "slot count fits in u32")]
        let idx = slots.len() as u32;
        slots.push(Slot {
            generation: 1,
            value: Some(value),
        });
        (idx, 1)
    }
}

impl SceneGraph for SceneTree {
    type Key = ObjectId;
    type Scene = SceneId;

    fn is_alive(&self, key: ObjectId) -> bool {
        self.object(key).is_some()
    }

    fn name(&self, key: ObjectId) -> Option<&str> {
        self.object(key).map(|o| o.name.as_str())
    }

    fn is_active(&self, key: ObjectId) -> bool {
        let mut current = Some(key);
        while let Some(id) = current {
            match self.object(id) {
                Some(object) if object.active => current = object.parent,
                _ => return false,
            }
        }
        true
    }

    fn parent(&self, key: ObjectId) -> Option<ObjectId> {
        self.object(key)?.parent
    }

    fn child_count(&self, key: ObjectId) -> usize {
        self.object(key).map_or(0, |o| o.children.len())
    }

    fn child(&self, key: ObjectId, index: usize) -> Option<ObjectId> {
        self.object(key)?.children.get(index).copied()
    }

    fn sibling_index(&self, key: ObjectId) -> Option<usize> {
        self.siblings(key)?.iter().position(|&k| k == key)
    }

    fn scene_of(&self, key: ObjectId) -> Option<SceneId> {
        self.object(key).map(|o| o.scene)
    }

    fn scene_name(&self, scene: SceneId) -> Option<&str> {
        self.scene(scene).map(|s| s.name.as_str())
    }

    fn root_count(&self, scene: SceneId) -> usize {
        self.scene(scene).map_or(0, |s| s.roots.len())
    }

    fn root(&self, scene: SceneId, index: usize) -> Option<ObjectId> {
        self.scene(scene)?.roots.get(index).copied()
    }
}

impl SceneGraphMut for SceneTree {
    fn set_parent(&mut self, key: ObjectId, parent: Option<ObjectId>) -> Result<(), GraphError> {
        if !self.is_alive(key) {
            return Err(GraphError::Stale);
        }
        let scene = match parent {
            Some(p) => {
                let scene = self.object(p).ok_or(GraphError::Stale)?.scene;
                if is_ancestor_or_self(&*self, key, p) {
                    return Err(GraphError::Cycle);
                }
                scene
            }
            None => self.object(key).ok_or(GraphError::Stale)?.scene,
        };
        self.detach(key);
        if let Some(object) = self.object_mut(key) {
            object.parent = parent;
        }
        match parent {
            Some(p) => {
                if let Some(p) = self.object_mut(p) {
                    p.children.push(key);
                }
            }
            None => {
                if let Some(s) = self.scene_mut(scene) {
                    s.roots.push(key);
                }
            }
        }
        self.set_scene_recursive(key, scene);
        Ok(())
    }

    fn set_sibling_index(&mut self, key: ObjectId, index: usize) -> Result<(), GraphError> {
        let object = self.object(key).ok_or(GraphError::Stale)?;
        let (parent, scene) = (object.parent, object.scene);
        let siblings = match parent {
            Some(p) => self.object_mut(p).map(|p| &mut p.children),
            None => self.scene_mut(scene).map(|s| &mut s.roots),
        };
        let siblings = siblings.ok_or(GraphError::Stale)?;
        if let Some(from) = siblings.iter().position(|&k| k == key) {
            siblings.remove(from);
            let to = index.min(siblings.len());
            siblings.insert(to, key);
        }
        Ok(())
    }

    fn move_to_scene(&mut self, key: ObjectId, scene: SceneId) -> Result<(), GraphError> {
        let object = self.object(key).ok_or(GraphError::Stale)?;
        if object.parent.is_some() {
            return Err(GraphError::NotRoot);
        }
        if !self.is_loaded(scene) {
            return Err(GraphError::UnknownScene);
        }
        if object.scene == scene {
            return Ok(());
        }
        self.detach(key);
        if let Some(s) = self.scene_mut(scene) {
            s.roots.push(key);
        }
        self.set_scene_recursive(key, scene);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn destroyed_slot_reuse_bumps_generation() {
        let mut tree = SceneTree::new();
        let scene = tree.load_scene("S", LoadMode::Single);
        let a = tree.spawn(scene, "a").unwrap();
        assert!(tree.destroy(a));
        let b = tree.spawn(scene, "b").unwrap();
        assert_eq!(a.0, b.0, "slot should be reused");
        assert_ne!(a, b);
        assert!(!tree.is_alive(a));
        assert_eq!(tree.name(a), None);
        assert_eq!(tree.name(b), Some("b"));
    }

    #[test]
    fn destroy_removes_subtree_and_unlinks() {
        let mut tree = SceneTree::new();
        let scene = tree.load_scene("S", LoadMode::Single);
        let a = tree.spawn(scene, "a").unwrap();
        let b = tree.spawn_child(a, "b").unwrap();
        let c = tree.spawn_child(b, "c").unwrap();
        let d = tree.spawn_child(a, "d").unwrap();
        assert!(tree.destroy(b));
        assert!(!tree.is_alive(c));
        assert_eq!(tree.child_count(a), 1);
        assert_eq!(tree.child(a, 0), Some(d));
        assert_eq!(tree.object_count(), 2);
    }

    #[test]
    fn single_load_unloads_other_scenes() {
        let mut tree = SceneTree::new();
        let first = tree.load_scene("First", LoadMode::Single);
        let obj = tree.spawn(first, "obj").unwrap();
        let second = tree.load_scene("Second", LoadMode::Single);
        assert!(!tree.is_loaded(first));
        assert!(!tree.is_alive(obj));
        let events: Vec<_> = tree.drain_events().collect();
        assert_eq!(
            events,
            vec![
                SceneEvent::Loaded {
                    scene: first,
                    mode: LoadMode::Single
                },
                SceneEvent::Unloaded { scene: first },
                SceneEvent::Loaded {
                    scene: second,
                    mode: LoadMode::Single
                },
            ]
        );
    }

    #[test]
    fn active_in_hierarchy_follows_ancestors() {
        let mut tree = SceneTree::new();
        let scene = tree.load_scene("S", LoadMode::Single);
        let a = tree.spawn(scene, "a").unwrap();
        let b = tree.spawn_child(a, "b").unwrap();
        assert!(tree.is_active(b));
        tree.set_active(a, false);
        assert!(!tree.is_active(b));
        assert!(!tree.is_active(a));
    }

    #[test]
    fn sibling_index_is_clamped() {
        let mut tree = SceneTree::new();
        let scene = tree.load_scene("S", LoadMode::Single);
        let a = tree.spawn(scene, "a").unwrap();
        let b = tree.spawn(scene, "b").unwrap();
        tree.set_sibling_index(a, 99).unwrap();
        assert_eq!(tree.root(scene, 0), Some(b));
        assert_eq!(tree.root(scene, 1), Some(a));
        assert_eq!(tree.sibling_index(a), Some(1));
    }
}
