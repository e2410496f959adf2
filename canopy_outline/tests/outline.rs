// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row index and refresh behavior against a live `SceneTree`.

use canopy_graph::{LoadMode, ObjectId, SceneGraph, SceneGraphMut, SceneId, SceneTree};
use canopy_outline::{DESTROYED_NAME, NodeId, Outline, Projection, Row};

type TestOutline = Outline<ObjectId, SceneId>;

/// Checks the cached height of every node against its children, recursively.
fn assert_heights(outline: &TestOutline, projection: Projection) {
    fn check(outline: &TestOutline, id: NodeId) -> usize {
        let node = outline.node(id).expect("live node");
        let children: usize = node.children().iter().map(|&c| check(outline, c)).sum();
        let expected = if node.is_expanded() { 1 + children } else { 1 };
        assert_eq!(node.height(), expected, "height of {:?}", node.key());
        node.height()
    }
    for c in outline.collections() {
        for &id in c.children(projection) {
            check(outline, id);
        }
    }
}

/// `node_at` must agree with a full flatten for every row, and `row_of` must invert it.
fn assert_index(outline: &TestOutline, projection: Projection) {
    let rows = outline.flatten(projection);
    assert_eq!(rows.len(), outline.row_count(projection));
    for (i, &row) in rows.iter().enumerate() {
        assert_eq!(outline.node_at(projection, i), Some(row), "row {i}");
        assert_eq!(outline.row_of(projection, row), Some(i), "entity {row:?}");
    }
    assert_eq!(outline.node_at(projection, rows.len()), None);
}

struct Abc {
    tree: SceneTree,
    scene: SceneId,
    a: ObjectId,
    b: ObjectId,
    c: ObjectId,
    b1: ObjectId,
    b2: ObjectId,
}

fn abc() -> Abc {
    let mut tree = SceneTree::new();
    let scene = tree.load_scene("Main", LoadMode::Single);
    let a = tree.spawn(scene, "A").unwrap();
    let b = tree.spawn(scene, "B").unwrap();
    let c = tree.spawn(scene, "C").unwrap();
    let b1 = tree.spawn_child(b, "B.child1").unwrap();
    let b2 = tree.spawn_child(b, "B.child2").unwrap();
    Abc {
        tree,
        scene,
        a,
        b,
        c,
        b1,
        b2,
    }
}

fn key_at(outline: &TestOutline, row: usize) -> Option<ObjectId> {
    match outline.node_at(Projection::Primary, row)? {
        Row::Node(id) => outline.node(id).map(|n| n.key()),
        Row::Collection(_) => None,
    }
}

#[test]
fn abc_without_header_rows() {
    let Abc {
        tree, scene, b, b1, ..
    } = abc();
    let mut outline = TestOutline::new();
    outline.set_headers(false);
    outline.add_scene(&tree, scene);
    assert_eq!(outline.row_count(Projection::Primary), 3);

    let nb = outline.find(Projection::Primary, b).unwrap();
    outline.set_expanded(&tree, Projection::Primary, Row::Node(nb), true);
    assert_eq!(outline.row_count(Projection::Primary), 5);
    assert_eq!(key_at(&outline, 2), Some(b1));
    assert_heights(&outline, Projection::Primary);
    assert_index(&outline, Projection::Primary);
}

#[test]
fn abc_with_header_rows() {
    let Abc {
        tree,
        scene,
        a,
        b,
        c,
        b1,
        b2,
    } = abc();
    let mut outline = TestOutline::new();
    let collection = outline.add_scene(&tree, scene);
    assert_eq!(outline.row_count(Projection::Primary), 4);
    assert_eq!(
        outline.node_at(Projection::Primary, 0),
        Some(Row::Collection(collection))
    );

    let nb = outline.find(Projection::Primary, b).unwrap();
    outline.set_expanded(&tree, Projection::Primary, Row::Node(nb), true);
    assert_eq!(outline.row_count(Projection::Primary), 6);
    let keys: Vec<_> = (1..6).map(|row| key_at(&outline, row).unwrap()).collect();
    assert_eq!(keys, [a, b, b1, b2, c]);
    assert_eq!(key_at(&outline, 3), Some(b1));
    assert_index(&outline, Projection::Primary);

    // Collapsing the collection hides everything but its header.
    outline.set_expanded(&tree, Projection::Primary, Row::Collection(collection), false);
    assert_eq!(outline.row_count(Projection::Primary), 1);
    assert_eq!(outline.row_of(Projection::Primary, Row::Node(nb)), None);
    assert_index(&outline, Projection::Primary);
}

#[test]
fn index_agrees_with_flatten_across_collections() {
    let Abc {
        mut tree,
        scene,
        a,
        b,
        b1,
        ..
    } = abc();
    let extra = tree.load_scene("Extra", LoadMode::Additive);
    let deep = tree.spawn(extra, "Deep").unwrap();
    let mut parent = deep;
    for i in 0..4 {
        parent = tree.spawn_child(parent, format!("level {i}")).unwrap();
    }
    tree.spawn_child(b1, "leaf").unwrap();

    let mut outline = TestOutline::new();
    outline.add_scene(&tree, scene);
    outline.add_scene(&tree, extra);
    outline.add_all_to_virtual("Pinned", [a, b1]);
    outline.create_virtual("Empty");
    outline.refresh(&tree);

    // Expand everything reachable, one node at a time.
    while let Some(id) = (0..outline.row_count(Projection::Primary)).find_map(|row| {
        match outline.node_at(Projection::Primary, row)? {
            Row::Node(id)
                if !outline.is_expanded(Projection::Primary, Row::Node(id))
                    && outline.can_expand(&tree, Projection::Primary, Row::Node(id)) =>
            {
                Some(id)
            }
            _ => None,
        }
    }) {
        outline.set_expanded(&tree, Projection::Primary, Row::Node(id), true);
        assert_heights(&outline, Projection::Primary);
        assert_index(&outline, Projection::Primary);
    }
    assert!(outline.find(Projection::Primary, parent).is_some());

    // The search projection hides the collections without results.
    outline.refresh_search(&tree, "leaf");
    assert!(outline.collections().iter().any(|c| c.is_hidden(Projection::Search)));
    assert_heights(&outline, Projection::Search);
    assert_index(&outline, Projection::Search);

    let nb = outline.find(Projection::Primary, b).unwrap();
    outline.set_expanded(&tree, Projection::Primary, Row::Node(nb), false);
    assert_heights(&outline, Projection::Primary);
    assert_index(&outline, Projection::Primary);
}

#[test]
fn refresh_is_idempotent_and_keeps_identity_across_renames() {
    let Abc {
        mut tree,
        scene,
        b,
        b1,
        ..
    } = abc();
    let mut outline = TestOutline::new();
    outline.add_scene(&tree, scene);
    let nb = outline.find(Projection::Primary, b).unwrap();
    outline.set_expanded(&tree, Projection::Primary, Row::Node(nb), true);
    let before = outline.flatten(Projection::Primary);

    assert!(!outline.refresh(&tree));
    assert_eq!(outline.flatten(Projection::Primary), before);

    let row = Row::Node(outline.find(Projection::Primary, b1).unwrap());
    assert_eq!(outline.display_name(&tree, row), Some("B.child1"));

    tree.rename(b1, "renamed");
    assert!(!outline.refresh(&tree), "renames are not structural");
    assert_eq!(outline.flatten(Projection::Primary), before);
    assert_eq!(outline.display_name(&tree, row), Some("B.child1"), "cached");
    assert!(outline.refresh_name_of(&tree, b1));
    assert_eq!(outline.display_name(&tree, row), Some("renamed"));
}

#[test]
fn structural_changes_are_picked_up() {
    let Abc {
        mut tree,
        scene,
        a,
        b,
        c,
        b1,
        b2,
    } = abc();
    let mut outline = TestOutline::new();
    outline.add_scene(&tree, scene);
    let nb = outline.find(Projection::Primary, b).unwrap();
    outline.set_expanded(&tree, Projection::Primary, Row::Node(nb), true);

    // Move A under B, behind its children.
    tree.set_parent(a, Some(b)).unwrap();
    assert!(outline.refresh(&tree));
    let keys: Vec<_> = (1..outline.row_count(Projection::Primary))
        .map(|row| key_at(&outline, row).unwrap())
        .collect();
    assert_eq!(keys, [b, b1, b2, a, c]);
    assert_eq!(outline.find(Projection::Primary, b), Some(nb), "B kept its node");
    assert_heights(&outline, Projection::Primary);

    // A destroyed object reads as a tombstone until the next refresh.
    let row = Row::Node(outline.find(Projection::Primary, c).unwrap());
    tree.destroy(c);
    assert_eq!(outline.display_name(&tree, row), Some(DESTROYED_NAME));
    assert!(outline.refresh(&tree));
    assert_eq!(outline.find(Projection::Primary, c), None);
    assert_index(&outline, Projection::Primary);
}

#[test]
fn remove_then_readd_of_a_live_handle_is_unchanged() {
    let Abc { tree, a, c, .. } = abc();
    let mut outline = TestOutline::new();
    outline.add_all_to_virtual("Pinned", [a, c]);
    outline.refresh(&tree);
    let before: Vec<_> = (1..3).map(|row| key_at(&outline, row)).collect();

    outline.remove_from_virtual("Pinned", c, false);
    outline.add_to_virtual("Pinned", c);
    outline.refresh(&tree);
    let after: Vec<_> = (1..3).map(|row| key_at(&outline, row)).collect();
    assert_eq!(before, after);
}

#[test]
fn reveal_expands_the_path_to_an_object() {
    let Abc {
        mut tree,
        scene,
        b,
        b1,
        ..
    } = abc();
    let leaf = tree.spawn_child(b1, "leaf").unwrap();
    let mut outline = TestOutline::new();
    let collection = outline.add_scene(&tree, scene);
    outline.set_expanded(&tree, Projection::Primary, Row::Collection(collection), false);

    let node = outline.reveal(&tree, leaf).unwrap();
    assert_eq!(outline.node(node).unwrap().key(), leaf);
    assert_eq!(outline.node(node).unwrap().depth(), 2);
    let row = outline.row_of(Projection::Primary, Row::Node(node)).unwrap();
    assert_eq!(key_at(&outline, row), Some(leaf));
    assert!(outline.is_expanded(
        Projection::Primary,
        Row::Node(outline.find(Projection::Primary, b).unwrap())
    ));
    assert_heights(&outline, Projection::Primary);

    assert_eq!(tree.parent(leaf), Some(b1));
    tree.destroy(leaf);
    assert_eq!(outline.reveal(&tree, leaf), None);
}

#[test]
fn filter_and_ignore_set_prune_subtrees() {
    let Abc {
        tree, scene, b, b1, ..
    } = abc();
    let mut outline = TestOutline::new();
    outline.add_scene(&tree, scene);
    let nb = outline.find(Projection::Primary, b).unwrap();
    outline.set_expanded(&tree, Projection::Primary, Row::Node(nb), true);
    assert_eq!(outline.row_count(Projection::Primary), 6);

    outline.ignore(b1);
    outline.refresh(&tree);
    assert_eq!(outline.row_count(Projection::Primary), 5);
    assert_eq!(outline.find(Projection::Primary, b1), None);

    outline.unignore(b1);
    outline.set_filter(Some(Box::new(move |key: ObjectId| key != b)));
    outline.refresh(&tree);
    assert_eq!(outline.row_count(Projection::Primary), 3, "header, A, C");
    assert_heights(&outline, Projection::Primary);
}

#[test]
fn expanding_while_a_refresh_is_pending_keeps_the_index_exact() {
    let Abc {
        tree, scene, b, c, b1, b2, ..
    } = abc();
    let mut outline = TestOutline::new();
    outline.add_scene(&tree, scene);

    assert!(outline.ignore(c));
    let nb = outline.find(Projection::Primary, b).unwrap();
    assert!(outline.set_expanded(&tree, Projection::Primary, Row::Node(nb), true));
    // C is only dropped by the next refresh; until then it still has a row.
    assert_eq!(outline.row_count(Projection::Primary), 6);
    assert_index(&outline, Projection::Primary);
    assert_heights(&outline, Projection::Primary);
    assert_eq!(key_at(&outline, 3), Some(b1));
    assert_eq!(key_at(&outline, 4), Some(b2));

    assert!(outline.refresh(&tree));
    assert_eq!(outline.row_count(Projection::Primary), 5);
    assert_eq!(outline.find(Projection::Primary, c), None);
    assert_index(&outline, Projection::Primary);
    assert_heights(&outline, Projection::Primary);
}
