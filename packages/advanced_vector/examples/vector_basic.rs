//! Basic usage example for `Vector`.
//!
//! This example demonstrates how a `Vector` grows as values are appended, how values are
//! inserted and erased by position and how explicit sizing interacts with capacity.

use advanced_vector::{RawMemory, Vector};

fn main() {
    // A raw memory block owns capacity but no values.
    let block = RawMemory::<String>::with_capacity(4);
    println!("Raw block with capacity: {}", block.capacity());

    let mut words = Vector::new();
    println!("Created empty Vector with capacity: {}", words.capacity());

    // Appending to a full vector doubles its capacity.
    for word in ["alpha", "beta", "gamma", "delta", "epsilon"] {
        words.push(word.to_string());
        println!(
            "Pushed {word:?}: len = {}, capacity = {}",
            words.len(),
            words.capacity()
        );
    }

    // Inserting returns the position of the new value.
    let position = words.insert(1, "between".to_string());
    println!("Inserted at {position}: {words:?}");

    // Erasing returns the position of the value that followed the erased one.
    let next = words.erase(position);
    println!("Erased, the next value is now at {next}: {:?}", words[next]);

    // The value can also be built in place by a closure.
    let last = words.push_with(|| "zeta".to_string());
    last.make_ascii_uppercase();
    println!("Built in place: {words:?}");

    if let Some(popped) = words.pop() {
        println!("Popped {popped:?}, len = {}", words.len());
    }

    // Explicit reservation allocates exactly the requested capacity.
    words.reserve(32);
    println!("After reserve(32): capacity = {}", words.capacity());

    // Shrinking the length keeps the capacity.
    words.resize(2);
    println!(
        "After resize(2): {words:?}, capacity = {}",
        words.capacity()
    );

    // Cloning allocates exactly as many slots as there are values.
    let copy = words.clone();
    println!("Clone has capacity: {}", copy.capacity());
    assert_eq!(copy, words);

    let counts = Vector::<u32>::with_len(3);
    println!("Default-filled vector: {counts:?}");

    for (index, word) in words.into_iter().enumerate() {
        println!("Owned value {index}: {word}");
    }

    println!("Example completed successfully!");
}
