// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use canopy_selection::SelectionSet;

fn bench_replace_with(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection/replace_with");

    // Select-all style batches into an empty set.
    for len in [128usize, 2_048, 32_768] {
        let keys: Vec<u32> = (0..(len as u32)).collect();
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("fresh", len), &keys, |b, keys| {
            b.iter_batched(
                SelectionSet::<u32>::new,
                |mut sel| {
                    sel.replace_with(keys.iter().copied());
                    black_box(sel);
                },
                BatchSize::LargeInput,
            );
        });

        // Same set in reverse order: the no-op path that keeps the revision.
        let mut current = SelectionSet::new();
        current.replace_with(keys.iter().copied());
        let reversed: Vec<u32> = keys.iter().rev().copied().collect();
        group.bench_with_input(BenchmarkId::new("equal", len), &reversed, |b, keys| {
            b.iter(|| black_box(current.set_equals(keys.iter().copied())));
        });
    }

    group.finish();
}

fn bench_extend_with_duplicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection/extend_with");

    // Range clicks re-adding rows that are mostly selected already.
    for len in [128usize, 2_048, 32_768] {
        let keys: Vec<u32> = (0..(len as u32)).collect();
        let mut half = SelectionSet::new();
        half.replace_with(keys.iter().copied().step_by(2));
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("half_selected", len), &keys, |b, keys| {
            b.iter_batched(
                || half.clone(),
                |mut sel| {
                    sel.extend_with(keys.iter().copied());
                    black_box(sel);
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_replace_with, bench_extend_with_duplicates);
criterion_main!(benches);
