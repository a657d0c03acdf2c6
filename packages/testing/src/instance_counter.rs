use std::cell::Cell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Counts the live [`Tracked`] values created through it.
///
/// Every tracked value increments the count when created (or cloned) and decrements it when
/// dropped. Dropping a value when the count is already zero panics, which is how a double drop
/// shows up in tests.
///
/// # Example
///
/// ```rust
/// use testing::InstanceCounter;
///
/// let counter = InstanceCounter::new();
///
/// let a = counter.track("a");
/// let b = a.clone();
/// assert_eq!(counter.live(), 2);
///
/// drop(a);
/// drop(b);
/// assert_eq!(counter.live(), 0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct InstanceCounter {
    live: Rc<Cell<usize>>,
}

impl InstanceCounter {
    /// Creates a counter with no live values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps `value` so that its lifetime is counted.
    #[must_use]
    pub fn track<V>(&self, value: V) -> Tracked<V> {
        increment(&self.live);

        Tracked {
            value,
            live: Rc::clone(&self.live),
        }
    }

    /// Returns the number of tracked values that are currently alive.
    #[must_use]
    pub fn live(&self) -> usize {
        self.live.get()
    }
}

fn increment(live: &Cell<usize>) {
    live.set(
        live.get()
            .checked_add(1)
            .expect("more live values than addressable memory is not plausible"),
    );
}

/// A value whose lifetime is counted by an [`InstanceCounter`].
pub struct Tracked<V> {
    value: V,
    live: Rc<Cell<usize>>,
}

impl<V> Deref for Tracked<V> {
    type Target = V;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<V: Clone> Clone for Tracked<V> {
    fn clone(&self) -> Self {
        increment(&self.live);

        Self {
            value: self.value.clone(),
            live: Rc::clone(&self.live),
        }
    }
}

impl<V> Drop for Tracked<V> {
    fn drop(&mut self) {
        let live = self.live.get();

        let remaining = live
            .checked_sub(1)
            .expect("tracked value dropped more often than it was created - double drop");

        self.live.set(remaining);
    }
}

impl<V: PartialEq> PartialEq for Tracked<V> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<V: PartialEq> PartialEq<V> for Tracked<V> {
    fn eq(&self, other: &V) -> bool {
        self.value == *other
    }
}

impl<V: fmt::Debug> fmt::Debug for Tracked<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.value, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_creation_clone_and_drop() {
        let counter = InstanceCounter::new();

        let a = counter.track(1);
        let b = a.clone();
        assert_eq!(counter.live(), 2);
        assert_eq!(a, b);

        drop(a);
        assert_eq!(counter.live(), 1);

        drop(b);
        assert_eq!(counter.live(), 0);
    }
}
