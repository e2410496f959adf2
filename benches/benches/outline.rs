// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_graph::{LoadMode, ObjectId, SceneGraphMut, SceneId, SceneTree, ancestors};
use canopy_outline::{Outline, Projection};
use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};

/// `roots` roots, each with `fanout` children, each with `fanout` leaves.
fn build(roots: usize, fanout: usize) -> (SceneTree, SceneId, Vec<ObjectId>) {
    let mut tree = SceneTree::new();
    let scene = tree.load_scene("Bench", LoadMode::Single);
    let mut leaves = Vec::with_capacity(roots * fanout * fanout);
    for r in 0..roots {
        let root = tree.spawn(scene, format!("Root {r}")).unwrap();
        for c in 0..fanout {
            let child = tree.spawn_child(root, format!("Child {r}.{c}")).unwrap();
            for l in 0..fanout {
                leaves.push(tree.spawn_child(child, format!("Leaf {r}.{c}.{l}")).unwrap());
            }
        }
    }
    (tree, scene, leaves)
}

/// An outline with every branch expanded.
fn expanded(tree: &SceneTree, scene: SceneId, leaves: &[ObjectId]) -> Outline<ObjectId, SceneId> {
    let mut outline = Outline::new();
    outline.add_scene(tree, scene);
    for &leaf in leaves {
        outline.reveal(tree, leaf);
    }
    outline
}

fn bench_row_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("outline/row_lookup");

    for roots in [16usize, 128, 1_024] {
        let (tree, scene, leaves) = build(roots, 8);
        let outline = expanded(&tree, scene, &leaves);
        let rows = outline.row_count(Projection::Primary);
        group.throughput(Throughput::Elements(rows as u64));

        group.bench_with_input(BenchmarkId::new("node_at", rows), &outline, |b, outline| {
            b.iter(|| {
                for row in 0..rows {
                    black_box(outline.node_at(Projection::Primary, row));
                }
            });
        });

        let entities = outline.flatten(Projection::Primary);
        group.bench_with_input(BenchmarkId::new("row_of", rows), &outline, |b, outline| {
            b.iter(|| {
                for &entity in &entities {
                    black_box(outline.row_of(Projection::Primary, entity));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("flatten", rows), &outline, |b, outline| {
            b.iter(|| black_box(outline.flatten(Projection::Primary)));
        });
    }

    group.finish();
}

fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("outline/refresh");

    for roots in [16usize, 128, 1_024] {
        let (tree, scene, leaves) = build(roots, 8);
        let rows = expanded(&tree, scene, &leaves).row_count(Projection::Primary);
        group.throughput(Throughput::Elements(rows as u64));

        // Nothing changed: the lock-step walk matches every level.
        group.bench_with_input(BenchmarkId::new("unchanged", roots), &tree, |b, tree| {
            b.iter_batched(
                || expanded(tree, scene, &leaves),
                |mut outline| black_box(outline.refresh(tree)),
                BatchSize::LargeInput,
            );
        });

        // The last root moved to the front: every top-level position shifts.
        let mut moved = tree.clone();
        let last_root = leaves
            .last()
            .and_then(|&leaf| ancestors(&moved, leaf).last());
        if let Some(root) = last_root {
            moved.set_sibling_index(root, 0).unwrap();
        }
        group.bench_with_input(BenchmarkId::new("root_moved", roots), &moved, |b, live| {
            b.iter_batched(
                || expanded(&tree, scene, &leaves),
                |mut outline| black_box(outline.refresh(live)),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("outline/search");
    group.sample_size(30);

    for roots in [16usize, 128, 1_024] {
        let (tree, scene, _) = build(roots, 8);
        group.throughput(Throughput::Elements((roots * 73) as u64));

        for query in ["leaf 3.", "root 1", "no match"] {
            group.bench_with_input(BenchmarkId::new(query, roots), &tree, |b, tree| {
                b.iter_batched(
                    || {
                        let mut outline = Outline::new();
                        outline.add_scene(tree, scene);
                        outline
                    },
                    |mut outline: Outline<ObjectId, SceneId>| {
                        black_box(outline.refresh_search(tree, query))
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_row_lookup, bench_refresh, bench_search);
criterion_main!(benches);
