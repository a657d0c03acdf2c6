use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::{fmt, ptr, slice};

use crate::RawMemory;

/// An iterator that moves the values out of a [`Vector`][crate::Vector].
///
/// Values that are not consumed are dropped together with the iterator, after which the
/// storage is released.
///
/// # Examples
///
/// ```
/// use advanced_vector::Vector;
///
/// let words = Vector::from(["a".to_string(), "b".to_string(), "c".to_string()]);
///
/// let mut iter = words.into_iter();
/// assert_eq!(iter.next().as_deref(), Some("a"));
/// assert_eq!(iter.next_back().as_deref(), Some("c"));
/// assert_eq!(iter.as_slice(), ["b".to_string()]);
/// ```
pub struct IntoIter<T> {
    storage: RawMemory<T>,

    /// Index of the first value not yet yielded from the front.
    front: usize,

    /// One past the index of the last value not yet yielded from the back.
    back: usize,

    _owns: PhantomData<T>,
}

impl<T> IntoIter<T> {
    /// Takes over `storage`, whose first `len` slots hold live values.
    pub(crate) fn new(storage: RawMemory<T>, len: usize) -> Self {
        debug_assert!(len <= storage.capacity());

        Self {
            storage,
            front: 0,
            back: len,
            _owns: PhantomData,
        }
    }

    fn remaining(&self) -> usize {
        // Cannot underflow because front never passes back.
        self.back.wrapping_sub(self.front)
    }

    /// Returns the values that have not been yielded yet.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: front <= back <= capacity.
        let first = unsafe { self.storage.address_at(self.front) };

        // SAFETY: The slots in [front, back) hold live values that we own.
        unsafe { slice::from_raw_parts(first.as_ptr(), self.remaining()) }
    }

    /// Returns the values that have not been yielded yet, as a mutable slice.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: front <= back <= capacity.
        let first = unsafe { self.storage.address_at(self.front) };

        // SAFETY: The slots in [front, back) hold live values that we own exclusively.
        unsafe { slice::from_raw_parts_mut(first.as_ptr(), self.remaining()) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }

        let index = self.front;

        // Cannot overflow because front < back.
        self.front = self.front.wrapping_add(1);

        // SAFETY: The slot held a live value and has just left the live range, so the value is
        // moved out exactly once.
        Some(unsafe { self.storage.slot(index).assume_init_read() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }

        // Cannot underflow because back > front.
        self.back = self.back.wrapping_sub(1);

        // SAFETY: The slot held a live value and has just left the live range, so the value is
        // moved out exactly once.
        Some(unsafe { self.storage.slot(self.back).assume_init_read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // SAFETY: The values that were not yielded are still owned by us and are dropped exactly
        // once. The storage releases the memory in its own destructor afterwards.
        unsafe {
            ptr::drop_in_place(self.as_mut_slice());
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_impl_all;
    use testing::InstanceCounter;

    use crate::Vector;

    use super::*;

    assert_impl_all!(IntoIter<u32>: Send, Sync, ExactSizeIterator, DoubleEndedIterator);

    #[test]
    fn yields_values_in_order() {
        let vector = Vector::from([1, 2, 3]);

        let collected: Vec<_> = vector.into_iter().collect();

        assert_eq!(collected, [1, 2, 3]);
    }

    #[test]
    fn yields_from_both_ends() {
        let vector = Vector::from([1, 2, 3, 4]);
        let mut iter = vector.into_iter();

        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next_back(), Some(4));
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.as_slice(), &[2, 3]);
        assert_eq!(iter.next_back(), Some(3));
        assert_eq!(iter.next_back(), Some(2));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn drops_unconsumed_values() {
        let counter = InstanceCounter::new();
        let vector: Vector<_> = (0..5).map(|i| counter.track(i)).collect();

        let mut iter = vector.into_iter();
        let first = iter.next();
        assert_eq!(counter.live(), 5);

        drop(iter);
        assert_eq!(counter.live(), 1);

        drop(first);
        assert_eq!(counter.live(), 0);
    }

    #[test]
    fn as_mut_slice_modifies_remaining() {
        let vector = Vector::from([1, 2, 3]);
        let mut iter = vector.into_iter();
        _ = iter.next();

        for value in iter.as_mut_slice() {
            *value *= 2;
        }

        assert_eq!(iter.collect::<Vec<_>>(), [4, 6]);
    }

    #[test]
    fn empty_vector_yields_nothing() {
        let vector = Vector::<String>::new();

        assert_eq!(vector.into_iter().next(), None);
    }
}
