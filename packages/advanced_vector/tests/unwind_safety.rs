//! Verifies that a panic in user code (constructor closures, `Clone`, iterators) leaves a
//! `Vector` exactly as it was before the operation, without leaking or double-dropping values.

use advanced_vector::Vector;
use testing::{CloneBudget, Fragile, InstanceCounter, Tracked, assert_unwinds};

type Item = Fragile<Tracked<usize>>;

/// Creates a vector of `len` values with a capacity of exactly `capacity`.
fn filled(
    budget: &CloneBudget,
    counter: &InstanceCounter,
    len: usize,
    capacity: usize,
) -> Vector<Item> {
    let mut vector = Vector::with_capacity(capacity);

    for value in 0..len {
        vector.push(budget.wrap(counter.track(value)));
    }

    vector
}

fn values(vector: &Vector<Item>) -> Vec<usize> {
    vector.iter().map(|item| ***item).collect()
}

#[test]
fn push_into_full_vector_with_panicking_constructor() {
    let budget = CloneBudget::unlimited();
    let counter = InstanceCounter::new();
    let mut vector = filled(&budget, &counter, 4, 4);
    let ptr = vector.as_ptr();

    assert_unwinds(|| {
        vector.push_with(|| panic!("constructor failed"));
    });

    assert_eq!(vector.len(), 4);
    assert_eq!(vector.capacity(), 4);
    assert_eq!(vector.as_ptr(), ptr);
    assert_eq!(values(&vector), [0, 1, 2, 3]);
    assert_eq!(counter.live(), 4);
}

#[test]
fn insert_into_full_vector_with_panicking_constructor() {
    let budget = CloneBudget::unlimited();
    let counter = InstanceCounter::new();
    let mut vector = filled(&budget, &counter, 3, 3);

    assert_unwinds(|| vector.insert_with(1, || panic!("constructor failed")));

    assert_eq!(vector.len(), 3);
    assert_eq!(vector.capacity(), 3);
    assert_eq!(values(&vector), [0, 1, 2]);
    assert_eq!(counter.live(), 3);
}

#[test]
fn insert_with_spare_capacity_and_panicking_constructor() {
    let budget = CloneBudget::unlimited();
    let counter = InstanceCounter::new();
    let mut vector = filled(&budget, &counter, 3, 8);

    assert_unwinds(|| vector.insert_with(0, || panic!("constructor failed")));

    assert_eq!(values(&vector), [0, 1, 2]);
    assert_eq!(vector.capacity(), 8);
    assert_eq!(counter.live(), 3);
}

#[test]
fn clone_failing_on_each_element() {
    const LEN: usize = 6;

    for failing_clone in 0..LEN {
        let budget = CloneBudget::unlimited();
        let counter = InstanceCounter::new();
        let vector = filled(&budget, &counter, LEN, LEN);

        budget.set_remaining(failing_clone);
        assert_unwinds(|| vector.clone());

        assert_eq!(values(&vector), [0, 1, 2, 3, 4, 5]);
        assert_eq!(vector.capacity(), LEN);
        assert_eq!(counter.live(), LEN, "clone #{failing_clone} leaked or double-dropped");
    }
}

#[test]
fn clone_from_needing_reallocation_is_all_or_nothing() {
    let budget = CloneBudget::unlimited();
    let counter = InstanceCounter::new();
    let source = filled(&budget, &counter, 5, 5);
    let mut target = filled(&budget, &counter, 2, 2);
    target.push(budget.wrap(counter.track(100)));

    budget.set_remaining(3);
    assert_unwinds(|| target.clone_from(&source));

    assert_eq!(values(&target), [0, 1, 100]);
    assert_eq!(target.capacity(), 4);
    assert_eq!(counter.live(), 8);
}

#[test]
fn clone_from_within_capacity_keeps_consistent_length() {
    let budget = CloneBudget::unlimited();
    let counter = InstanceCounter::new();
    let source = filled(&budget, &counter, 4, 4);
    let mut target = Vector::with_capacity(8);
    target.push(budget.wrap(counter.track(50)));

    // One clone for the overlapping value, one appended value, then failure.
    budget.set_remaining(2);
    assert_unwinds(|| target.clone_from(&source));

    // The overlapping prefix was assigned, the appended suffix was rolled back.
    assert_eq!(values(&target), [0]);
    assert_eq!(target.capacity(), 8);
    assert_eq!(counter.live(), 5);
}

#[test]
fn resize_with_panicking_constructor() {
    let budget = CloneBudget::unlimited();
    let counter = InstanceCounter::new();
    let mut vector = filled(&budget, &counter, 2, 2);

    let mut made = 0_usize;
    assert_unwinds(|| {
        vector.resize_with(10, || {
            made = made.wrapping_add(1);
            assert!(made <= 5, "sixth value fails");
            budget.wrap(counter.track(made))
        });
    });

    assert_eq!(values(&vector), [0, 1]);
    assert_eq!(vector.capacity(), 2);
    assert_eq!(counter.live(), 2);
}

#[test]
fn resize_with_panicking_constructor_within_capacity() {
    let budget = CloneBudget::unlimited();
    let counter = InstanceCounter::new();
    let mut vector = filled(&budget, &counter, 2, 8);

    let mut made = 0_usize;
    assert_unwinds(|| {
        vector.resize_with(6, || {
            made = made.wrapping_add(1);
            assert!(made <= 2, "third value fails");
            budget.wrap(counter.track(made))
        });
    });

    assert_eq!(values(&vector), [0, 1]);
    assert_eq!(vector.capacity(), 8);
    assert_eq!(counter.live(), 2);

    vector.resize_with(4, || budget.wrap(counter.track(9)));
    assert_eq!(values(&vector), [0, 1, 9, 9]);
    assert_eq!(counter.live(), 4);
}

#[test]
fn collect_from_panicking_iterator_drops_collected_values() {
    let counter = InstanceCounter::new();

    assert_unwinds(|| {
        (0..10_usize)
            .map(|value| {
                assert!(value < 7, "iterator failed");
                counter.track(value)
            })
            .collect::<Vector<_>>()
    });

    assert_eq!(counter.live(), 0);
}

#[test]
fn vector_remains_usable_after_panic() {
    let budget = CloneBudget::unlimited();
    let counter = InstanceCounter::new();
    let mut vector = filled(&budget, &counter, 2, 2);

    assert_unwinds(|| {
        vector.push_with(|| panic!("constructor failed"));
    });

    vector.push(budget.wrap(counter.track(2)));
    vector.insert(0, budget.wrap(counter.track(9)));
    vector.erase(0);

    assert_eq!(values(&vector), [0, 1, 2]);
    assert_eq!(vector.capacity(), 4);

    drop(vector);
    assert_eq!(counter.live(), 0);
}
