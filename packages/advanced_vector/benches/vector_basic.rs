//! Basic benchmarks for the `advanced_vector` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::iter;
use std::time::Instant;

use advanced_vector::Vector;
use alloc_tracker::Allocator;
use criterion::{Criterion, criterion_group, criterion_main};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

type TestItem = usize;
const TEST_VALUE: TestItem = 1024;

/// Number of values in the vectors that are pre-filled before the timed span.
const FILLED_LEN: usize = 1_000;

fn filled() -> Vector<TestItem> {
    (0..FILLED_LEN).collect()
}

fn entrypoint(c: &mut Criterion) {
    let allocs = alloc_tracker::Session::new();

    let mut group = c.benchmark_group("vector_basic");

    let allocs_op = allocs.operation("new_empty");
    group.bench_function("new_empty", |b| {
        b.iter_custom(|iters| {
            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(Vector::<TestItem>::new()));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("push_one_into_empty");
    group.bench_function("push_one_into_empty", |b| {
        b.iter_custom(|iters| {
            let mut vectors = iter::repeat_with(Vector::<TestItem>::new)
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for vector in &mut vectors {
                vector.push(black_box(TEST_VALUE));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("push_1000");
    group.bench_function("push_1000", |b| {
        b.iter_custom(|iters| {
            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                let mut vector = Vector::new();

                for value in 0..FILLED_LEN {
                    vector.push(black_box(value));
                }

                drop(black_box(vector));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("insert_front");
    group.bench_function("insert_front", |b| {
        b.iter_custom(|iters| {
            let mut vectors = iter::repeat_with(filled)
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for vector in &mut vectors {
                black_box(vector.insert(0, black_box(TEST_VALUE)));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("erase_front");
    group.bench_function("erase_front", |b| {
        b.iter_custom(|iters| {
            let mut vectors = iter::repeat_with(filled)
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for vector in &mut vectors {
                black_box(vector.erase(0));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("clone_1000");
    group.bench_function("clone_1000", |b| {
        b.iter_custom(|iters| {
            let vector = filled();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(vector.clone()));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("clone_from_reuse_1000");
    group.bench_function("clone_from_reuse_1000", |b| {
        b.iter_custom(|iters| {
            let source = filled();
            let mut target = filled();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                target.clone_from(black_box(&source));
            }

            start.elapsed()
        });
    });

    group.finish();

    allocs.print_to_stdout();
}
