use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::slice::{self, SliceIndex};
use std::{fmt, iter, mem, ptr};

use scopeguard::ScopeGuard;

use crate::{Error, IntoIter, RawMemory, Result};

/// A growable, contiguous sequence of `T` built directly on top of a [`RawMemory`] block.
///
/// The vector keeps its live values in the first [`len()`][Self::len] slots of its block. The
/// remaining slots up to [`capacity()`][Self::capacity] are uninitialized memory.
///
/// # Growth
///
/// When a value is added to a full vector, a new block with double the capacity (or one slot,
/// if the vector had no capacity at all) is allocated. Explicit [`reserve()`][Self::reserve]
/// calls allocate exactly the requested capacity. The capacity never shrinks on its own;
/// removing values only ends their lifetime.
///
/// # Unwind safety
///
/// Every operation that runs user code (a constructor closure, `Clone`, `Default`) prepares
/// the new state on the side before committing it. If the user code panics, the vector is left
/// exactly as it was before the operation: same length, same capacity, same values, no value
/// leaked or dropped twice. The new value of an append or insert is always produced before any
/// existing value is moved.
///
/// There are two exceptions. [`clone_from()`][Clone::clone_from] with a source that fits into
/// the existing capacity assigns over the existing values one by one, so a panic in the middle
/// leaves some of them already overwritten (but all of them valid). [`Extend`] appends value by
/// value, so a panicking iterator leaves the values it yielded so far in place.
///
/// # Examples
///
/// ```
/// use advanced_vector::Vector;
///
/// let mut numbers = Vector::new();
/// numbers.push(1);
/// numbers.push(3);
/// numbers.insert(1, 2);
///
/// assert_eq!(numbers, [1, 2, 3]);
/// assert_eq!(numbers.capacity(), 4);
///
/// assert_eq!(numbers.erase(0), 0);
/// assert_eq!(numbers.pop(), Some(3));
/// assert_eq!(numbers, [2]);
/// ```
pub struct Vector<T> {
    storage: RawMemory<T>,

    /// Number of live values at the start of `storage`.
    len: usize,

    // The vector owns values of type `T` and drops them.
    _owns: PhantomData<T>,
}

impl<T> Vector<T> {
    /// Creates an empty vector without allocating.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            storage: RawMemory::new(),
            len: 0,
            _owns: PhantomData,
        }
    }

    /// Creates an empty vector with room for exactly `capacity` values.
    ///
    /// # Panics
    ///
    /// Panics if the total size of the storage would exceed `isize::MAX` bytes.
    ///
    /// Allocation failure is routed to [`std::alloc::handle_alloc_error`].
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::try_with_capacity(capacity).unwrap_or_else(|e| e.raise())
    }

    /// Creates an empty vector with room for exactly `capacity` values, reporting failure to
    /// acquire storage as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] if the total size of the storage would exceed
    /// `isize::MAX` bytes and [`Error::AllocationFailed`] if the allocator returns null.
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            storage: RawMemory::try_with_capacity(capacity)?,
            len: 0,
            _owns: PhantomData,
        })
    }

    /// Returns the number of live values.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector holds no values.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of values the vector can hold without reallocating.
    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Returns the live values as a slice.
    #[must_use]
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: The first `len` slots hold live values in sequence. The pointer is non-null
        // and aligned even when nothing is allocated.
        unsafe { slice::from_raw_parts(self.storage.as_ptr(), self.len) }
    }

    /// Returns the live values as a mutable slice.
    #[must_use]
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: The first `len` slots hold live values in sequence and we hold an exclusive
        // reference to the vector. The pointer is non-null and aligned even when nothing is
        // allocated.
        unsafe { slice::from_raw_parts_mut(self.storage.as_mut_ptr(), self.len) }
    }

    /// Returns a pointer to the first value.
    ///
    /// The pointer is invalidated by any operation that reallocates the storage.
    #[must_use]
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// Returns a mutable pointer to the first value.
    ///
    /// The pointer is invalidated by any operation that reallocates the storage.
    #[must_use]
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.as_mut_ptr()
    }

    /// Ensures that the capacity is at least `min_capacity`.
    ///
    /// Unlike [`Vec::reserve()`], the argument is the total capacity and not the additional
    /// capacity. If the capacity is already sufficient, nothing happens. Otherwise, the values
    /// are moved to a new block of exactly `min_capacity` slots. The length and the values are
    /// never changed.
    ///
    /// # Panics
    ///
    /// Panics if the total size of the storage would exceed `isize::MAX` bytes.
    ///
    /// Allocation failure is routed to [`std::alloc::handle_alloc_error`].
    ///
    /// # Examples
    ///
    /// ```
    /// use advanced_vector::Vector;
    ///
    /// let mut numbers = Vector::from([1, 2, 3]);
    ///
    /// numbers.reserve(10);
    /// assert_eq!(numbers.capacity(), 10);
    ///
    /// numbers.reserve(5);
    /// assert_eq!(numbers.capacity(), 10);
    /// ```
    pub fn reserve(&mut self, min_capacity: usize) {
        if let Err(e) = self.try_reserve(min_capacity) {
            e.raise();
        }
    }

    /// Ensures that the capacity is at least `min_capacity`, reporting failure to acquire
    /// storage as an error.
    ///
    /// On failure, the vector is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] if the total size of the storage would exceed
    /// `isize::MAX` bytes and [`Error::AllocationFailed`] if the allocator returns null.
    pub fn try_reserve(&mut self, min_capacity: usize) -> Result<()> {
        if min_capacity <= self.capacity() {
            return Ok(());
        }

        let mut new_storage = RawMemory::try_with_capacity(min_capacity)?;

        // SAFETY: The gap is at the end and the new block is larger than the old one, so it has
        // room for every live value.
        unsafe {
            self.transfer_into(&mut new_storage, self.len, 0);
        }

        // The old block only holds stale bits now and is released without dropping anything.
        self.storage.swap(&mut new_storage);

        #[cfg(debug_assertions)]
        self.integrity_check();

        Ok(())
    }

    /// Appends `value` to the end of the vector and returns a reference to it.
    ///
    /// If the vector is full, the capacity is doubled first.
    ///
    /// # Examples
    ///
    /// ```
    /// use advanced_vector::Vector;
    ///
    /// let mut words = Vector::new();
    ///
    /// let word = words.push("hello".to_string());
    /// word.push_str(" world");
    ///
    /// assert_eq!(words[0], "hello world");
    /// ```
    pub fn push(&mut self, value: T) -> &mut T {
        self.push_with(|| value)
    }

    /// Appends the value returned by `make` to the end of the vector and returns a reference
    /// to it.
    ///
    /// When the vector is full, the value is created directly in its slot in the new storage,
    /// before any existing value is moved. If `make` panics, the vector is unchanged.
    pub fn push_with(&mut self, make: impl FnOnce() -> T) -> &mut T {
        let index = self.insert_with(self.len, make);

        // SAFETY: The slot at `index` was initialized by `insert_with()` and is within the live
        // range, which we hold exclusively.
        unsafe { self.storage.slot_mut(index).assume_init_mut() }
    }

    /// Removes the last value and returns it, or `None` if the vector is empty.
    pub fn pop(&mut self) -> Option<T> {
        let last = self.len.checked_sub(1)?;

        self.len = last;

        // SAFETY: The slot held the last live value and has just left the live range, so the
        // value is moved out exactly once.
        Some(unsafe { self.storage.slot(last).assume_init_read() })
    }

    /// Inserts `value` at `index`, shifting all values after it to the right, and returns the
    /// index of the inserted value.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use advanced_vector::Vector;
    ///
    /// let mut letters = Vector::from(['a', 'c']);
    ///
    /// let index = letters.insert(1, 'b');
    ///
    /// assert_eq!(index, 1);
    /// assert_eq!(letters, ['a', 'b', 'c']);
    /// ```
    pub fn insert(&mut self, index: usize, value: T) -> usize {
        self.insert_with(index, || value)
    }

    /// Inserts the value returned by `make` at `index`, shifting all values after it to the
    /// right, and returns the index of the inserted value.
    ///
    /// The value is created before any existing value is moved. If `make` panics, the vector
    /// is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_with(&mut self, index: usize, make: impl FnOnce() -> T) -> usize {
        assert!(
            index <= self.len,
            "insertion index {index} out of bounds for vector of length {}",
            self.len
        );

        if self.len == self.capacity() {
            self.grow_with(index, make);
        } else {
            let value = make();

            // SAFETY: index <= len < capacity.
            let hole = unsafe { self.storage.address_at(index) };

            // SAFETY: index + 1 <= len < capacity.
            let shifted = unsafe { self.storage.address_at(index.wrapping_add(1)) };

            // SAFETY: The values in [index, len) move one slot right, which stays within
            // capacity because len < capacity. `ptr::copy()` permits the overlap.
            unsafe {
                ptr::copy(hole.as_ptr(), shifted.as_ptr(), self.len.wrapping_sub(index));
            }

            // SAFETY: The hole only holds the stale bits of a value that now lives one slot to
            // the right, so overwriting it without dropping is correct.
            unsafe {
                hole.write(value);
            }

            // Cannot overflow because len < capacity.
            self.len = self.len.wrapping_add(1);
        }

        #[cfg(debug_assertions)]
        self.integrity_check();

        index
    }

    /// Removes the value at `index`, shifting all values after it to the left, and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len,
            "removal index {index} out of bounds for vector of length {}",
            self.len
        );

        // SAFETY: index < len, so the slot holds a live value. It is moved out exactly once, as
        // the slot is overwritten by the shift below or leaves the live range.
        let value = unsafe { self.storage.slot(index).assume_init_read() };

        // SAFETY: index < len <= capacity.
        let hole = unsafe { self.storage.address_at(index) };

        // SAFETY: index + 1 <= len <= capacity.
        let next = unsafe { self.storage.address_at(index.wrapping_add(1)) };

        // Cannot underflow because index < len.
        let tail_len = self.len.wrapping_sub(index).wrapping_sub(1);

        // SAFETY: The values in (index, len) move one slot left, into the hole. `ptr::copy()`
        // permits the overlap.
        unsafe {
            ptr::copy(next.as_ptr(), hole.as_ptr(), tail_len);
        }

        // Cannot underflow because index < len.
        self.len = self.len.wrapping_sub(1);

        #[cfg(debug_assertions)]
        self.integrity_check();

        value
    }

    /// Drops the value at `index`, shifting all values after it to the left, and returns the
    /// index of the value that followed it (now at `index`, or the end of the vector).
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use advanced_vector::Vector;
    ///
    /// let mut numbers = Vector::from([1, 2, 3]);
    ///
    /// let next = numbers.erase(1);
    ///
    /// assert_eq!(numbers[next], 3);
    /// ```
    pub fn erase(&mut self, index: usize) -> usize {
        // The vector is consistent again before the removed value is dropped.
        drop(self.remove(index));

        index
    }

    /// Drops every value after the first `new_len` values.
    ///
    /// Does nothing if `new_len >= len`. The capacity is not changed.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }

        // Cannot underflow because new_len < len.
        let tail_len = self.len.wrapping_sub(new_len);

        // The tail leaves the live range before it is dropped.
        self.len = new_len;

        // SAFETY: new_len < len <= capacity.
        let tail = unsafe { self.storage.address_at(new_len) };

        // SAFETY: The tail slots hold live values that are no longer part of the live range, so
        // each is dropped exactly once.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(tail.as_ptr(), tail_len));
        }
    }

    /// Drops all values. The capacity is not changed.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes the vector to `new_len` values.
    ///
    /// Shrinking drops the values after `new_len`. Growing appends values returned by `make`;
    /// if more room is needed, exactly `new_len` slots are allocated and the new values are
    /// created in the new block before any existing value is moved. If `make` panics, the
    /// values it created so far are dropped and the vector is unchanged, capacity included.
    pub fn resize_with(&mut self, new_len: usize, make: impl FnMut() -> T) {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }

        // Cannot underflow because new_len > len.
        let additional = new_len.wrapping_sub(self.len);
        let values = iter::repeat_with(make).take(additional);

        if new_len <= self.capacity() {
            self.append_within_capacity(values);
            return;
        }

        let mut new_storage = RawMemory::with_capacity(new_len);

        // If `make` panics, the values created so far are dropped and the new block is
        // released without `self` having been touched.
        Self::fill_slots(&mut new_storage, self.len, values);

        // SAFETY: The gap is at the end and the new block has room for every live value
        // before the slots that were just filled.
        unsafe {
            self.transfer_into(&mut new_storage, self.len, 0);
        }

        // The old block only holds stale bits now and is released without dropping anything.
        self.storage.swap(&mut new_storage);

        self.len = new_len;

        #[cfg(debug_assertions)]
        self.integrity_check();
    }

    /// Exchanges the contents of two vectors without moving any values.
    pub fn swap(&mut self, other: &mut Self) {
        self.storage.swap(&mut other.storage);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Moves every live value into `target`, leaving `gap_len` uninitialized slots starting at
    /// `gap_index`.
    ///
    /// Afterwards the values are owned by `target` and the slots of `self.storage` only hold
    /// stale bits. The caller commits by swapping `target` in, without dropping anything.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `gap_index <= len` and that `target` has room for
    /// `len + gap_len` values.
    unsafe fn transfer_into(&self, target: &mut RawMemory<T>, gap_index: usize, gap_len: usize) {
        debug_assert!(gap_index <= self.len);
        debug_assert!(self.len.saturating_add(gap_len) <= target.capacity());

        // Cannot underflow, guaranteed by the caller.
        let tail_len = self.len.wrapping_sub(gap_index);

        // SAFETY: The first `gap_index` slots of our storage hold live values, the target has
        // room for them (guaranteed by the caller) and the two blocks do not overlap.
        unsafe {
            ptr::copy_nonoverlapping(self.storage.as_ptr(), target.as_mut_ptr(), gap_index);
        }

        // SAFETY: gap_index <= len <= capacity, guaranteed by the caller.
        let tail_source = unsafe { self.storage.address_at(gap_index) };

        // SAFETY: gap_index + gap_len <= len + gap_len <= target capacity, guaranteed by the
        // caller. Cannot overflow because that would exceed the target capacity.
        let tail_target = unsafe { target.address_at(gap_index.wrapping_add(gap_len)) };

        // SAFETY: The tail of our storage holds live values and the target has room for them
        // after the gap. The two blocks do not overlap.
        unsafe {
            ptr::copy_nonoverlapping(tail_source.as_ptr(), tail_target.as_ptr(), tail_len);
        }
    }

    /// The capacity to grow to when a value is added to a full vector.
    fn grown_capacity(&self) -> usize {
        self.capacity()
            .checked_mul(2)
            .unwrap_or_else(|| {
                Error::CapacityOverflow {
                    requested: usize::MAX,
                    item_size: size_of::<T>(),
                }
                .raise()
            })
            .max(1)
    }

    /// Moves the values to a larger block, with the value returned by `make` placed at `index`.
    fn grow_with(&mut self, index: usize, make: impl FnOnce() -> T) {
        debug_assert!(index <= self.len);
        debug_assert!(self.len == self.capacity());

        let mut new_storage = RawMemory::with_capacity(self.grown_capacity());

        // The new value is created in its final slot before anything else happens. If `make`
        // panics, the new block is released empty and `self` has not been touched.
        new_storage.slot_mut(index).write(make());

        // SAFETY: index <= len and the new block is larger than the full old block, so it has
        // room for len + 1 values.
        unsafe {
            self.transfer_into(&mut new_storage, index, 1);
        }

        // The old block only holds stale bits now and is released without dropping anything.
        self.storage.swap(&mut new_storage);

        // Cannot overflow because the new block had room for the new value.
        self.len = self.len.wrapping_add(1);
    }

    /// Appends values from `values` into the spare capacity, stopping when it is full.
    ///
    /// If producing a value panics, the values appended so far by this call are dropped and
    /// the length is left unchanged.
    fn append_within_capacity(&mut self, values: impl IntoIterator<Item = T>) {
        let start = self.len;

        let appended = Self::fill_slots(&mut self.storage, start, values);

        // Cannot overflow because it is bounded by the capacity.
        self.len = start.wrapping_add(appended);

        #[cfg(debug_assertions)]
        self.integrity_check();
    }

    /// Writes values from `values` into the uninitialized slots of `target` from `start`
    /// onward, stopping when the block is full, and returns how many were written.
    ///
    /// If producing a value panics, the values written so far by this call are dropped.
    fn fill_slots(
        target: &mut RawMemory<T>,
        start: usize,
        values: impl IntoIterator<Item = T>,
    ) -> usize {
        debug_assert!(start <= target.capacity());

        // Cannot underflow because start <= capacity.
        let spare = target.capacity().wrapping_sub(start);

        // SAFETY: start <= capacity, so the offset stays within the block or one past its end.
        let base = unsafe { target.as_mut_ptr().add(start) };

        let mut written = scopeguard::guard(0_usize, |written| {
            // SAFETY: Only reached while unwinding. The first `written` slots after `base` were
            // initialized below but are not part of any live range, so nobody else will drop
            // them.
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base, written));
            }
        });

        for value in values.into_iter().take(spare) {
            // SAFETY: written < spare, so the slot is within capacity and uninitialized.
            let slot = unsafe { base.add(*written) };

            // SAFETY: The slot is valid for writes and holds no value.
            unsafe {
                slot.write(value);
            }

            // Cannot overflow because it is bounded by `spare`.
            *written = written.wrapping_add(1);
        }

        ScopeGuard::into_inner(written)
    }

    #[cfg(debug_assertions)]
    #[cfg_attr(test, mutants::skip)] // This is essentially test logic, mutation is meaningless.
    fn integrity_check(&self) {
        assert!(
            self.len <= self.storage.capacity(),
            "vector length {} exceeds its capacity {}",
            self.len,
            self.storage.capacity()
        );
    }
}

impl<T: Default> Vector<T> {
    /// Creates a vector of `len` default values, with a capacity of exactly `len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use advanced_vector::Vector;
    ///
    /// let zeros = Vector::<u32>::with_len(3);
    ///
    /// assert_eq!(zeros, [0, 0, 0]);
    /// assert_eq!(zeros.capacity(), 3);
    /// ```
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        let mut vector = Self::with_capacity(len);
        vector.resize(len);
        vector
    }

    /// Resizes the vector to `new_len` values, appending default values when growing.
    ///
    /// See [`resize_with()`][Self::resize_with] for details.
    pub fn resize(&mut self, new_len: usize) {
        self.resize_with(new_len, T::default);
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Vector<T> {
    fn drop(&mut self) {
        // SAFETY: The live range holds values we exclusively own. Afterwards the storage only
        // holds stale bits and releases the memory in its own destructor.
        unsafe {
            ptr::drop_in_place(self.as_mut_slice());
        }
    }
}

impl<T: Clone> Clone for Vector<T> {
    /// Creates a vector with a capacity equal to the length of `self`, holding a clone of each
    /// value.
    ///
    /// If a clone panics, the clones made so far are dropped and the storage is released.
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity(self.len);
        copy.append_within_capacity(self.iter().cloned());
        copy
    }

    /// Makes `self` a copy of `source`, reusing the existing storage where possible.
    ///
    /// If `source` does not fit into the current capacity, a complete copy is made on the side
    /// and swapped in, so a panicking clone leaves `self` unchanged. Otherwise, the overlapping
    /// values are assigned via [`Clone::clone_from()`], then the surplus values are dropped or
    /// the missing values appended.
    fn clone_from(&mut self, source: &Self) {
        if source.len > self.capacity() {
            let mut copy = source.clone();
            self.swap(&mut copy);
            return;
        }

        for (target, value) in self.iter_mut().zip(source.iter()) {
            target.clone_from(value);
        }

        if source.len < self.len {
            self.truncate(source.len);
        } else {
            let overlap = self.len;
            self.append_within_capacity(source.iter().skip(overlap).cloned());
        }
    }
}

impl<T> Deref for Vector<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> DerefMut for Vector<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for Vector<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for Vector<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, I: SliceIndex<[T]>> Index<I> for Vector<T> {
    type Output = I::Output;

    /// # Panics
    ///
    /// Panics if the index is out of bounds of the live values.
    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>> IndexMut<I> for Vector<T> {
    /// # Panics
    ///
    /// Panics if the index is out of bounds of the live values.
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        // The vector is left empty and owning nothing, so its destructor is a no-op.
        let len = mem::replace(&mut self.len, 0);
        let storage = mem::take(&mut self.storage);

        IntoIter::new(storage, len)
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Vector<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> Extend<T> for Vector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();

        self.reserve(self.len.saturating_add(lower));

        for value in iter {
            self.push(value);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for Vector<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vector = Self::new();
        vector.extend(iter);
        vector
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T> {
    /// Creates a vector with a capacity of exactly `N`, holding the values of the array.
    fn from(array: [T; N]) -> Self {
        let mut vector = Self::with_capacity(N);
        vector.append_within_capacity(array);
        vector
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq<U>, U> PartialEq<Vector<U>> for Vector<T> {
    fn eq(&self, other: &Vector<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U> PartialEq<[U]> for Vector<T> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U> PartialEq<&[U]> for Vector<T> {
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for Vector<T> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Vector<T> {}

impl<T: Hash> Hash for Vector<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    reason = "test code doesn't need the same rigor as production code"
)]
mod tests {
    use std::cell::Cell;
    use std::hash::DefaultHasher;
    use std::rc::Rc;

    use static_assertions::{assert_impl_all, assert_not_impl_any};
    use testing::{CloneBudget, InstanceCounter, assert_unwinds};

    use super::*;

    assert_impl_all!(Vector<u32>: Send, Sync, Clone, Default);
    assert_impl_all!(Vector<Cell<u32>>: Send);
    assert_not_impl_any!(Vector<Cell<u32>>: Sync);
    assert_not_impl_any!(Vector<Rc<u32>>: Send, Sync);

    thread_local! {
        static LIVE_DEFAULTS: Cell<usize> = const { Cell::new(0) };
    }

    /// Counts its live instances on the current thread, including those made by `Default`.
    struct DefaultCounted {
        _payload: u64,
    }

    impl Default for DefaultCounted {
        fn default() -> Self {
            LIVE_DEFAULTS.set(LIVE_DEFAULTS.get() + 1);
            Self { _payload: 0 }
        }
    }

    impl Drop for DefaultCounted {
        fn drop(&mut self) {
            LIVE_DEFAULTS.set(LIVE_DEFAULTS.get() - 1);
        }
    }

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn new_is_empty() {
        let vector = Vector::<u32>::new();

        assert_eq!(vector.len(), 0);
        assert_eq!(vector.capacity(), 0);
        assert!(vector.is_empty());
        assert_eq!(vector.as_slice(), &[] as &[u32]);
    }

    #[test]
    fn with_len_creates_default_values() {
        let vector = Vector::<String>::with_len(4);

        assert_eq!(vector.len(), 4);
        assert_eq!(vector.capacity(), 4);
        assert!(vector.iter().all(String::is_empty));
    }

    #[test]
    fn with_capacity_has_no_values() {
        let vector = Vector::<u64>::with_capacity(7);

        assert_eq!(vector.len(), 0);
        assert_eq!(vector.capacity(), 7);
    }

    #[test]
    fn push_doubles_capacity_only_when_full() {
        let mut vector = Vector::new();
        let mut observed = Vec::new();

        for i in 0..17_u32 {
            let capacity_before = vector.capacity();
            vector.push(i);

            if vector.capacity() != capacity_before {
                assert_eq!(vector.len(), capacity_before + 1);
                observed.push(vector.capacity());
            }
        }

        assert_eq!(observed, [1, 2, 4, 8, 16, 32]);
    }

    #[test]
    fn push_returns_reference_to_new_value() {
        let mut vector = Vector::new();

        *vector.push(1) += 10;
        *vector.push(2) += 20;

        assert_eq!(vector, [11, 22]);
    }

    #[test]
    fn push_with_constructs_in_place() {
        let mut vector = Vector::new();

        let value = vector.push_with(|| String::from("made"));
        value.push('!');

        assert_eq!(vector, ["made!".to_string()]);
    }

    #[test]
    fn push_and_pop_keep_prefix() {
        let mut vector = Vector::new();

        for pushes in 0..20_usize {
            vector.clear();

            for value in 0..pushes {
                vector.push(value);
            }

            for pops in 0..=pushes {
                let mut copy = vector.clone();

                for _ in 0..pops {
                    assert!(copy.pop().is_some());
                }

                assert_eq!(copy.len(), pushes - pops);
                assert!(copy.iter().copied().eq(0..pushes - pops));
            }
        }
    }

    #[test]
    fn pop_returns_values_in_reverse() {
        let mut vector = Vector::from([1, 2, 3]);

        assert_eq!(vector.pop(), Some(3));
        assert_eq!(vector.pop(), Some(2));
        assert_eq!(vector.pop(), Some(1));
        assert_eq!(vector.pop(), None);
        assert_eq!(vector.capacity(), 3);
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut vector = Vector::<String>::new();

        assert_eq!(vector.pop(), None);
        assert_eq!(vector.len(), 0);
    }

    #[test]
    fn reserve_smaller_is_noop() {
        let mut vector = Vector::from([1, 2, 3]);
        vector.reserve(8);
        let ptr = vector.as_ptr();

        vector.reserve(5);
        vector.reserve(0);

        assert_eq!(vector.capacity(), 8);
        assert_eq!(vector.as_ptr(), ptr);
        assert_eq!(vector, [1, 2, 3]);
    }

    #[test]
    fn reserve_allocates_exactly() {
        let mut vector = Vector::from(["a".to_string(), "b".to_string()]);

        vector.reserve(13);

        assert_eq!(vector.capacity(), 13);
        assert_eq!(vector, ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn try_reserve_overflow_is_error_and_no_change() {
        let mut vector = Vector::from([1_u64, 2]);

        let result = vector.try_reserve(usize::MAX);

        assert!(matches!(result, Err(Error::CapacityOverflow { .. })));
        assert_eq!(vector, [1, 2]);
        assert_eq!(vector.capacity(), 2);
    }

    #[test]
    fn resize_grows_with_defaults() {
        let mut vector = Vector::from([5, 6]);

        vector.resize(5);

        assert_eq!(vector, [5, 6, 0, 0, 0]);
        assert_eq!(vector.capacity(), 5);
    }

    #[test]
    fn resize_shrinks_and_drops_tail() {
        let counter = InstanceCounter::new();
        let mut vector: Vector<_> = (0..6).map(|i| counter.track(i)).collect();
        let capacity = vector.capacity();

        vector.resize_with(2, || unreachable!());

        assert_eq!(vector.len(), 2);
        assert_eq!(vector.capacity(), capacity);
        assert_eq!(counter.live(), 2);
        assert_eq!(*vector[1], 1);
    }

    #[test]
    fn resize_reports_requested_len() {
        let mut vector = Vector::<u8>::new();

        for new_len in [3, 0, 10, 10, 4, 7] {
            vector.resize(new_len);
            assert_eq!(vector.len(), new_len);
        }
    }

    #[test]
    fn resize_with_panic_keeps_state() {
        let counter = InstanceCounter::new();
        let mut vector = Vector::new();
        vector.push(counter.track(1));
        vector.push(counter.track(2));

        let mut made = 0;
        assert_unwinds(|| {
            vector.resize_with(6, || {
                made += 1;
                assert!(made < 3, "third value fails");
                counter.track(0)
            });
        });

        assert_eq!(vector.len(), 2);
        assert_eq!(vector.capacity(), 2);
        assert_eq!(counter.live(), 2);
        assert_eq!(*vector[0], 1);
        assert_eq!(*vector[1], 2);
    }

    #[test]
    fn resize_creates_and_drops_default_values_once() {
        let mut vector = Vector::<DefaultCounted>::with_len(3);
        assert_eq!(LIVE_DEFAULTS.get(), 3);

        vector.resize(10);
        assert_eq!(vector.capacity(), 10);
        assert_eq!(LIVE_DEFAULTS.get(), 10);

        vector.resize(4);
        assert_eq!(vector.capacity(), 10);
        assert_eq!(LIVE_DEFAULTS.get(), 4);

        drop(vector);
        assert_eq!(LIVE_DEFAULTS.get(), 0);
    }

    #[test]
    fn insert_without_growth_shifts_right() {
        let mut vector = Vector::with_capacity(8);
        vector.extend([1, 2, 4, 5]);

        let index = vector.insert(2, 3);

        assert_eq!(index, 2);
        assert_eq!(vector, [1, 2, 3, 4, 5]);
        assert_eq!(vector.capacity(), 8);
    }

    #[test]
    fn insert_with_growth_shifts_right() {
        let mut vector = Vector::from([1, 2, 4, 5]);
        assert_eq!(vector.capacity(), 4);

        let index = vector.insert(2, 3);

        assert_eq!(index, 2);
        assert_eq!(vector, [1, 2, 3, 4, 5]);
        assert_eq!(vector.capacity(), 8);
    }

    #[test]
    fn insert_at_front_and_end() {
        let mut vector = Vector::new();

        vector.insert(0, "b");
        vector.insert(0, "a");
        vector.insert(2, "c");

        assert_eq!(vector, ["a", "b", "c"]);
    }

    #[test]
    #[should_panic]
    fn insert_past_end_panics() {
        let mut vector = Vector::from([1, 2]);

        vector.insert(3, 0);
    }

    #[test]
    fn insert_with_panic_keeps_state() {
        let mut vector = Vector::with_capacity(4);
        vector.extend(["x".to_string(), "y".to_string()]);

        assert_unwinds(|| vector.insert_with(1, || panic!("construction failed")));

        assert_eq!(vector, ["x".to_string(), "y".to_string()]);
        assert_eq!(vector.capacity(), 4);
    }

    #[test]
    fn erase_returns_following_index() {
        let mut vector = Vector::from([10, 20, 30, 40]);

        assert_eq!(vector.erase(1), 1);
        assert_eq!(vector[1], 30);

        assert_eq!(vector.erase(2), 2);
        assert_eq!(vector.len(), 2);
        assert_eq!(vector, [10, 30]);
    }

    #[test]
    fn erase_undoes_insert() {
        let original = Vector::from([1, 2, 3, 4, 5]);

        for index in 0..=original.len() {
            let mut vector = original.clone();

            let inserted = vector.insert(index, 99);
            vector.erase(inserted);

            assert_eq!(vector, original);
        }
    }

    #[test]
    fn erase_drops_exactly_one() {
        let counter = InstanceCounter::new();
        let mut vector: Vector<_> = (0..4).map(|i| counter.track(i)).collect();

        vector.erase(0);

        assert_eq!(counter.live(), 3);
        assert!(vector.iter().map(|v| **v).eq(1..4));
    }

    #[test]
    #[should_panic]
    fn erase_out_of_bounds_panics() {
        let mut vector = Vector::from([1]);

        vector.erase(1);
    }

    #[test]
    fn remove_returns_value() {
        let mut vector = Vector::from(["a", "b", "c"]);

        assert_eq!(vector.remove(0), "a");
        assert_eq!(vector, ["b", "c"]);
    }

    #[test]
    fn truncate_and_clear_keep_capacity() {
        let counter = InstanceCounter::new();
        let mut vector: Vector<_> = (0..5).map(|i| counter.track(i)).collect();
        let capacity = vector.capacity();

        vector.truncate(10);
        assert_eq!(vector.len(), 5);

        vector.truncate(3);
        assert_eq!(counter.live(), 3);

        vector.clear();
        assert_eq!(counter.live(), 0);
        assert!(vector.is_empty());
        assert_eq!(vector.capacity(), capacity);
    }

    #[test]
    fn clone_is_deep_and_independent() {
        let original = Vector::from(["a".to_string(), "b".to_string()]);

        let mut copy = original.clone();
        copy[0].push('!');
        copy.push("c".to_string());

        assert_eq!(original, ["a".to_string(), "b".to_string()]);
        assert_eq!(copy, ["a!".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(original.capacity(), 2);
    }

    #[test]
    fn clone_capacity_matches_len() {
        let mut original = Vector::with_capacity(10);
        original.extend([1, 2, 3]);

        let copy = original.clone();

        assert_eq!(copy.capacity(), 3);
        assert_eq!(copy, original);
    }

    #[test]
    fn clone_from_into_smaller_capacity_reallocates() {
        let source = Vector::from([1, 2, 3, 4]);
        let mut target = Vector::from([9]);

        target.clone_from(&source);

        assert_eq!(target, source);
        assert_eq!(target.capacity(), 4);
    }

    #[test]
    fn clone_from_shorter_drops_tail() {
        let counter = InstanceCounter::new();
        let source: Vector<_> = (0..2).map(|i| counter.track(i)).collect();
        let mut target: Vector<_> = (10..15).map(|i| counter.track(i)).collect();
        let capacity = target.capacity();

        target.clone_from(&source);

        assert_eq!(target, source);
        assert_eq!(target.capacity(), capacity);
        assert_eq!(counter.live(), 4);
    }

    #[test]
    fn clone_from_longer_within_capacity_appends() {
        let source = Vector::from(["a", "b", "c"]);
        let mut target = Vector::with_capacity(5);
        target.push("z");
        let ptr = target.as_ptr();

        target.clone_from(&source);

        assert_eq!(target, source);
        assert_eq!(target.as_ptr(), ptr);
    }

    #[test]
    fn clone_panic_leaves_source_intact() {
        let budget = CloneBudget::unlimited();
        let counter = InstanceCounter::new();
        let source: Vector<_> = (0..5).map(|i| budget.wrap(counter.track(i))).collect();

        budget.set_remaining(3);
        assert_unwinds(|| source.clone());

        assert_eq!(counter.live(), 5);
        assert_eq!(source.len(), 5);
        assert!(source.iter().map(|v| ***v).eq(0..5));
    }

    #[test]
    fn take_leaves_source_empty() {
        let mut source = Vector::from([1, 2, 3]);

        let target = mem::take(&mut source);

        assert_eq!(target, [1, 2, 3]);
        assert_eq!(source.len(), 0);
        assert_eq!(source.capacity(), 0);
    }

    #[test]
    fn swap_exchanges_contents() {
        let mut a = Vector::from([1, 2, 3]);
        let mut b = Vector::with_capacity(9);
        b.push(7);

        a.swap(&mut b);

        assert_eq!(a, [7]);
        assert_eq!(a.capacity(), 9);
        assert_eq!(b, [1, 2, 3]);
        assert_eq!(b.capacity(), 3);
    }

    #[test]
    fn iteration_is_in_index_order() {
        let mut vector: Vector<_> = (1..=4).collect();

        for value in &mut vector {
            *value *= 10;
        }

        let collected: Vec<_> = (&vector).into_iter().copied().collect();
        assert_eq!(collected, [10, 20, 30, 40]);
    }

    #[test]
    fn index_by_range() {
        let vector = Vector::from([1, 2, 3, 4]);

        assert_eq!(&vector[1..3], &[2, 3]);
        assert_eq!(&vector[..], &[1, 2, 3, 4]);
    }

    #[test]
    #[should_panic]
    fn index_out_of_bounds_panics() {
        let vector = Vector::from([1, 2]);

        _ = vector[2];
    }

    #[test]
    fn drop_drops_every_value_once() {
        let counter = InstanceCounter::new();

        {
            let mut vector = Vector::new();
            for i in 0..9 {
                vector.push(counter.track(i));
            }
            vector.insert(4, counter.track(100));
            vector.erase(0);

            assert_eq!(counter.live(), 9);
        }

        assert_eq!(counter.live(), 0);
    }

    #[test]
    fn zero_sized_values() {
        let mut vector = Vector::new();

        for _ in 0..100 {
            vector.push(());
        }
        vector.insert(50, ());
        vector.erase(0);

        assert_eq!(vector.len(), 100);
        assert_eq!(vector.capacity(), 128);
        assert_eq!(vector.pop(), Some(()));
    }

    #[test]
    fn extend_reserves_lower_size_hint() {
        let mut vector = Vector::from([1]);

        vector.extend(2..=10);
        assert_eq!(vector.capacity(), 10);

        // Single pushes still follow the doubling sequence.
        vector.push(11);
        assert_eq!(vector.capacity(), 20);

        // Without a lower bound, extending grows by doubling.
        let mut filtered = Vector::new();
        filtered.extend((0..5).filter(|value| value % 2 == 0));
        assert_eq!(filtered, [0, 2, 4]);
        assert_eq!(filtered.capacity(), 4);
    }

    #[test]
    fn extend_by_reference_copies() {
        let mut vector = Vector::from([1]);

        vector.extend(&[2, 3]);

        assert_eq!(vector, [1, 2, 3]);
    }

    #[test]
    fn equality_and_hash_follow_values() {
        let a = Vector::from([1, 2, 3]);
        let mut b = Vector::with_capacity(100);
        b.extend([1, 2, 3]);

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_eq!(a, &[1, 2, 3][..]);

        b.push(4);
        assert_ne!(a, b);
    }

    #[test]
    fn debug_lists_values() {
        let vector = Vector::from([1, 2]);

        assert_eq!(format!("{vector:?}"), "[1, 2]");
    }
}
