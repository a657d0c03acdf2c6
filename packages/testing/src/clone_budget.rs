use std::cell::Cell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// A shared allowance of successful clones for a family of [`Fragile`] values.
///
/// Every clone of a [`Fragile`] value consumes one unit of the budget. Once the budget is
/// exhausted, the next clone panics. This simulates a copy operation that fails partway through
/// a bulk transfer, e.g. on the k-th element of a collection being cloned.
///
/// # Example
///
/// ```rust
/// use testing::{CloneBudget, assert_unwinds};
///
/// let budget = CloneBudget::new(1);
/// let value = budget.wrap(42);
///
/// let first = value.clone();
/// assert_eq!(*first, 42);
///
/// assert_unwinds(|| value.clone());
/// ```
#[derive(Clone, Debug)]
pub struct CloneBudget {
    remaining: Rc<Cell<usize>>,
}

impl CloneBudget {
    /// Creates a budget that allows `clones` successful clones.
    #[must_use]
    pub fn new(clones: usize) -> Self {
        Self {
            remaining: Rc::new(Cell::new(clones)),
        }
    }

    /// Creates a budget that never runs out in practice.
    #[must_use]
    pub fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    /// Wraps `value` so that its clones draw from this budget.
    #[must_use]
    pub fn wrap<V>(&self, value: V) -> Fragile<V> {
        Fragile {
            value,
            remaining: Rc::clone(&self.remaining),
        }
    }

    /// Replaces the remaining allowance.
    pub fn set_remaining(&self, clones: usize) {
        self.remaining.set(clones);
    }

    /// Returns the number of clones that will still succeed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining.get()
    }
}

/// A value whose `clone()` panics once its [`CloneBudget`] is exhausted.
pub struct Fragile<V> {
    value: V,
    remaining: Rc<Cell<usize>>,
}

impl<V> Deref for Fragile<V> {
    type Target = V;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<V: Clone> Clone for Fragile<V> {
    fn clone(&self) -> Self {
        let Some(remaining) = self.remaining.get().checked_sub(1) else {
            panic!("clone budget exhausted");
        };

        self.remaining.set(remaining);

        Self {
            value: self.value.clone(),
            remaining: Rc::clone(&self.remaining),
        }
    }
}

impl<V: PartialEq> PartialEq for Fragile<V> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<V: PartialEq> PartialEq<V> for Fragile<V> {
    fn eq(&self, other: &V) -> bool {
        self.value == *other
    }
}

impl<V: fmt::Debug> fmt::Debug for Fragile<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.value, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_unwinds;

    #[test]
    fn clones_until_exhausted() {
        let budget = CloneBudget::new(2);
        let value = budget.wrap("x");

        let a = value.clone();
        let b = a.clone();
        assert_eq!(budget.remaining(), 0);
        assert_eq!(b, "x");

        assert_unwinds(|| value.clone());

        budget.set_remaining(1);
        let c = value.clone();
        assert_eq!(c, value);
    }
}
