//! Benchmark comparing `Vector` against `std::vec::Vec` for the operations
//! that dominate typical use:
//! 1. Appending many values to an empty collection.
//! 2. Inserting and erasing in the middle of a large collection.
#![allow(
    clippy::arithmetic_side_effects,
    missing_docs,
    reason = "duty of care is slightly lowered for benchmark code"
)]

use std::hint::black_box;
use std::time::Instant;

use advanced_vector::Vector;
use alloc_tracker::Allocator;
use criterion::{Criterion, criterion_group, criterion_main};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

/// Number of values appended per iteration.
const APPEND_COUNT: u64 = 10_000;

/// Number of values in the collection before the timed middle insertions start.
const INITIAL_ITEMS: u64 = 10_000;

/// Position of the timed insertions, halfway into the initial values.
const MIDDLE: usize = 5_000;

/// Number of insert + erase pairs per iteration.
const CHURN_COUNT: u64 = 100;

fn entrypoint(c: &mut Criterion) {
    let allocs = alloc_tracker::Session::new();

    let mut group = c.benchmark_group("vector_vs_std");

    let allocs_op = allocs.operation("Vec::push()");
    group.bench_function("Vec::push()", |b| {
        b.iter_custom(|iters| {
            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                let mut vec = Vec::new();

                for value in 0..APPEND_COUNT {
                    vec.push(black_box(value));
                }

                drop(black_box(vec));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("Vector::push()");
    group.bench_function("Vector::push()", |b| {
        b.iter_custom(|iters| {
            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                let mut vector = Vector::new();

                for value in 0..APPEND_COUNT {
                    vector.push(black_box(value));
                }

                drop(black_box(vector));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("Vec::insert() + remove()");
    group.bench_function("Vec::insert() + remove()", |b| {
        b.iter_custom(|iters| {
            let mut vec: Vec<u64> = (0..INITIAL_ITEMS).collect();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                for value in 0..CHURN_COUNT {
                    vec.insert(MIDDLE, black_box(value));
                    black_box(vec.remove(MIDDLE));
                }
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("Vector::insert() + erase()");
    group.bench_function("Vector::insert() + erase()", |b| {
        b.iter_custom(|iters| {
            let mut vector: Vector<u64> = (0..INITIAL_ITEMS).collect();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                for value in 0..CHURN_COUNT {
                    let position = vector.insert(MIDDLE, black_box(value));
                    black_box(vector.erase(position));
                }
            }

            start.elapsed()
        });
    });

    group.finish();

    allocs.print_to_stdout();
}
