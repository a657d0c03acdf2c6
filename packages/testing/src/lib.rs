#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))] // This is all test code, no need to test it.

//! Private helpers for testing `advanced_vector`.
//!
//! Containers that manage value lifetimes by hand need to be checked for two kinds of
//! mistakes: values that are dropped the wrong number of times, and values that are left in an
//! inconsistent state when user code panics halfway through an operation. The helpers here
//! make both observable:
//!
//! * [`InstanceCounter`] hands out [`Tracked`] values and counts how many are alive.
//! * [`CloneBudget`] hands out [`Fragile`] values whose `clone()` panics once the budget runs out.
//! * [`assert_unwinds`] runs a closure that is expected to panic and swallows the panic.

mod clone_budget;
mod instance_counter;
mod unwind;

pub use clone_budget::*;
pub use instance_counter::*;
pub use unwind::*;
