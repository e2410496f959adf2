// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_graph::{LoadMode, ObjectId, SceneId, SceneTree};
use canopy_hierarchy::{ClickModifiers, Hierarchy, HierarchyConfig};
use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};

fn build(roots: usize) -> SceneTree {
    let mut tree = SceneTree::new();
    let scene = tree.load_scene("Bench", LoadMode::Single);
    for r in 0..roots {
        let root = tree.spawn(scene, format!("Root {r}")).unwrap();
        for c in 0..4 {
            tree.spawn_child(root, format!("Child {r}.{c}")).unwrap();
        }
    }
    tree
}

fn hierarchy(tree: &mut SceneTree, config: HierarchyConfig) -> Hierarchy<ObjectId, SceneId> {
    let mut h = Hierarchy::new(config);
    let signals: Vec<_> = tree.drain_events().collect();
    for signal in signals {
        h.handle_scene_event(&*tree, signal);
    }
    h.set_viewport_height(900.0);
    h.update(&*tree, 0);
    h
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchy/update");

    // Structural refresh every frame, the default.
    for roots in [256usize, 4_096] {
        let mut tree = build(roots);
        let mut h = hierarchy(&mut tree, HierarchyConfig::default());
        let mut now = 0;
        group.throughput(Throughput::Elements(roots as u64));
        group.bench_function(BenchmarkId::new("every_frame", roots), |b| {
            b.iter(|| {
                now += 16;
                h.update(&tree, now);
                black_box(h.visible_rows());
            });
        });
    }

    group.finish();
}

fn bench_range_click(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchy/range_click");

    for roots in [256usize, 4_096] {
        let mut tree = build(roots);
        let base = hierarchy(&mut tree, HierarchyConfig::default());
        let rows = base.row_count();
        drop(base);
        group.throughput(Throughput::Elements(rows as u64));

        group.bench_function(BenchmarkId::new("first_to_last", rows), |b| {
            b.iter_batched(
                || {
                    let mut fresh = build(roots);
                    let h = hierarchy(&mut fresh, HierarchyConfig::default());
                    (fresh, h)
                },
                |(tree, mut h)| {
                    h.on_item_clicked(&tree, Some(1), ClickModifiers::empty(), 0);
                    h.on_item_clicked(&tree, Some(rows - 1), ClickModifiers::RANGE, 100);
                    black_box(h.selection().len());
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_update, bench_range_click);
criterion_main!(benches);
