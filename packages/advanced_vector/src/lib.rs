#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A growable, contiguous array built directly on raw memory allocations.
//!
//! This crate provides [`Vector`], a dynamic array with the familiar operational contract
//! (amortized constant-time append, random access, insertion and removal in the middle, cloning
//! and moving), implemented on top of [`RawMemory`], a block of uninitialized memory that owns
//! bytes but never values.
//!
//! # Key Features
//!
//! - **Two-layer ownership**: [`RawMemory<T>`] owns an allocation, [`Vector<T>`] owns the values
//!   living in the first [`len()`][Vector::len] slots of it
//! - **Predictable growth**: appending to a full vector doubles its capacity, explicit
//!   [`reserve()`][Vector::reserve] allocates exactly what was asked for
//! - **Strong unwind safety**: a panic in a constructor closure, `Clone` or `Default` leaves the
//!   vector exactly as it was before the operation, capacity included (see [`Vector`] for the
//!   two documented exceptions)
//! - **Construct before moving**: the new values of an append, insert or resize are created in
//!   their final slots before any existing value is transferred to new storage
//! - **Fallible allocation**: [`try_reserve()`][Vector::try_reserve] and friends report
//!   allocation failure as an [`Error`] instead of aborting
//!
//! # Examples
//!
//! ## Appending and indexing
//!
//! ```rust
//! use advanced_vector::Vector;
//!
//! let mut names = Vector::new();
//! names.push("Alice".to_string());
//! names.push("Bob".to_string());
//!
//! assert_eq!(names.len(), 2);
//! assert_eq!(names[1], "Bob");
//!
//! for name in &mut names {
//!     name.make_ascii_uppercase();
//! }
//!
//! assert_eq!(names, ["ALICE".to_string(), "BOB".to_string()]);
//! ```
//!
//! ## Inserting and erasing by position
//!
//! ```rust
//! use advanced_vector::Vector;
//!
//! let mut numbers = Vector::from([1, 2, 4]);
//!
//! let position = numbers.insert(2, 3);
//! assert_eq!(numbers, [1, 2, 3, 4]);
//!
//! // Erasing the inserted value restores the original sequence.
//! numbers.erase(position);
//! assert_eq!(numbers, [1, 2, 4]);
//! ```
//!
//! ## Sizing explicitly
//!
//! ```rust
//! use advanced_vector::Vector;
//!
//! let mut buffer = Vector::<u8>::with_len(4);
//! assert_eq!(buffer, [0, 0, 0, 0]);
//!
//! buffer.reserve(16);
//! assert_eq!(buffer.capacity(), 16);
//!
//! buffer.resize(2);
//! assert_eq!(buffer.len(), 2);
//! assert_eq!(buffer.capacity(), 16);
//! ```
//!
//! ## Handling allocation failure
//!
//! ```rust
//! use advanced_vector::{Error, Vector};
//!
//! let mut huge = Vector::<u64>::new();
//!
//! match huge.try_reserve(usize::MAX) {
//!     Err(Error::CapacityOverflow { .. }) => {}
//!     other => panic!("unexpected result: {other:?}"),
//! }
//!
//! assert_eq!(huge.capacity(), 0);
//! ```
//!
//! # Thread safety
//!
//! The types perform no internal synchronization. [`Vector<T>`] is [`Send`] if `T` is [`Send`]
//! and [`Sync`] if `T` is [`Sync`], the same as the values it contains.

mod error;
mod into_iter;
mod raw_memory;
mod vector;

pub use error::Error;
pub(crate) use error::Result;
pub use into_iter::IntoIter;
pub use raw_memory::RawMemory;
pub use vector::Vector;
