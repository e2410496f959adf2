// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reparenting and scene moves on the in-memory graph.

use canopy_graph::{
    GraphError, LoadMode, SceneGraph, SceneGraphMut, SceneTree, ancestors, depth_of,
    is_ancestor_or_self,
};

#[test]
fn reparent_onto_descendant_is_rejected_without_mutation() {
    let mut tree = SceneTree::new();
    let scene = tree.load_scene("S", LoadMode::Single);
    let d = tree.spawn(scene, "D").unwrap();
    let mid = tree.spawn_child(d, "Mid").unwrap();
    let p = tree.spawn_child(mid, "P").unwrap();
    let before = tree.clone();

    assert_eq!(tree.set_parent(d, Some(p)), Err(GraphError::Cycle));
    assert_eq!(tree.set_parent(d, Some(d)), Err(GraphError::Cycle));
    assert_eq!(tree, before, "rejected reparent must not mutate");
}

#[test]
fn reparent_appends_and_unparent_makes_root() {
    let mut tree = SceneTree::new();
    let scene = tree.load_scene("S", LoadMode::Single);
    let a = tree.spawn(scene, "A").unwrap();
    let b = tree.spawn(scene, "B").unwrap();
    let c = tree.spawn_child(a, "C").unwrap();

    tree.set_parent(b, Some(a)).unwrap();
    assert_eq!(tree.child(a, 0), Some(c));
    assert_eq!(tree.child(a, 1), Some(b));
    assert_eq!(tree.root_count(scene), 1);
    assert_eq!(depth_of(&tree, b), 1);

    tree.set_parent(c, None).unwrap();
    assert_eq!(tree.parent(c), None);
    assert_eq!(tree.root(scene, 1), Some(c));
    assert_eq!(tree.sibling_index(b), Some(0));
}

#[test]
fn reparent_across_scenes_moves_subtree() {
    let mut tree = SceneTree::new();
    let first = tree.load_scene("First", LoadMode::Single);
    let second = tree.load_scene("Second", LoadMode::Additive);
    let a = tree.spawn(first, "A").unwrap();
    let a1 = tree.spawn_child(a, "A1").unwrap();
    let target = tree.spawn(second, "Target").unwrap();

    tree.set_parent(a, Some(target)).unwrap();
    assert_eq!(tree.scene_of(a), Some(second));
    assert_eq!(tree.scene_of(a1), Some(second));
    assert_eq!(tree.root_count(first), 0);
}

#[test]
fn move_to_scene_requires_root() {
    let mut tree = SceneTree::new();
    let first = tree.load_scene("First", LoadMode::Single);
    let second = tree.load_scene("Second", LoadMode::Additive);
    let a = tree.spawn(first, "A").unwrap();
    let child = tree.spawn_child(a, "Child").unwrap();

    assert_eq!(tree.move_to_scene(child, second), Err(GraphError::NotRoot));
    tree.move_to_scene(a, second).unwrap();
    assert_eq!(tree.root(second, 0), Some(a));
    assert_eq!(tree.scene_of(child), Some(second));

    tree.unload_scene(first);
    assert_eq!(tree.move_to_scene(a, first), Err(GraphError::UnknownScene));
}

#[test]
fn ancestor_walk_is_nearest_first() {
    let mut tree = SceneTree::new();
    let scene = tree.load_scene("S", LoadMode::Single);
    let a = tree.spawn(scene, "A").unwrap();
    let b = tree.spawn_child(a, "B").unwrap();
    let c = tree.spawn_child(b, "C").unwrap();

    let chain: Vec<_> = ancestors(&tree, c).collect();
    assert_eq!(chain, vec![b, a]);
    assert!(is_ancestor_or_self(&tree, a, c));
    assert!(is_ancestor_or_self(&tree, c, c));
    assert!(!is_ancestor_or_self(&tree, c, a));
}

#[test]
fn stale_handles_are_tolerated() {
    let mut tree = SceneTree::new();
    let scene = tree.load_scene("S", LoadMode::Single);
    let a = tree.spawn(scene, "A").unwrap();
    tree.destroy(a);

    assert!(!tree.is_active(a));
    assert_eq!(tree.child_count(a), 0);
    assert_eq!(tree.sibling_index(a), None);
    assert_eq!(tree.set_parent(a, None), Err(GraphError::Stale));
    assert_eq!(tree.set_sibling_index(a, 0), Err(GraphError::Stale));
    assert!(!tree.rename(a, "again"));
}
