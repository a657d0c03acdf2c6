use std::alloc::{Layout, alloc, dealloc};
use std::any::type_name;
use std::fmt;
use std::mem::{self, MaybeUninit};
use std::ptr::NonNull;

use crate::{Error, Result};

/// An owned block of uninitialized memory with room for `capacity` values of type `T`.
///
/// The block only owns the bytes. It never creates or drops a `T` in any of its slots; that is
/// the responsibility of whoever tracks which slots hold live values (e.g. [`Vector`][1]). Any
/// value still present in a slot when the block is dropped is leaked, not dropped.
///
/// A block with zero capacity does not own an allocation and its address is a dangling (but
/// well-aligned) pointer. Zero-sized types never touch the allocator either, regardless of the
/// requested capacity.
///
/// The block cannot be cloned, as a bitwise copy of the slots would be meaningless without
/// knowing which of them hold live values. Ownership can be transferred by moving the block or
/// by [`mem::take()`][std::mem::take], which leaves the empty block behind.
///
/// # Examples
///
/// ```
/// use advanced_vector::RawMemory;
///
/// let mut memory = RawMemory::<String>::with_capacity(2);
/// assert_eq!(memory.capacity(), 2);
///
/// memory.slot_mut(0).write("hello".to_string());
///
/// // SAFETY: We initialized slot 0 above and move the value back out exactly once.
/// let value = unsafe { memory.slot(0).assume_init_read() };
/// assert_eq!(value, "hello");
/// ```
///
/// [1]: crate::Vector
pub struct RawMemory<T> {
    /// Start of the allocation, or a dangling pointer if nothing was allocated.
    ptr: NonNull<T>,

    /// Number of `T`-sized slots in the allocation.
    capacity: usize,
}

impl<T> RawMemory<T> {
    /// Creates an empty block that owns no memory.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
        }
    }

    /// Allocates a block with room for exactly `capacity` values.
    ///
    /// A capacity of zero does not call the allocator.
    ///
    /// # Panics
    ///
    /// Panics if the total size of the block would exceed `isize::MAX` bytes.
    ///
    /// Allocation failure is routed to [`std::alloc::handle_alloc_error`].
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::try_with_capacity(capacity).unwrap_or_else(|e| e.raise())
    }

    /// Allocates a block with room for exactly `capacity` values, reporting failure as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] if the total size of the block would exceed
    /// `isize::MAX` bytes and [`Error::AllocationFailed`] if the allocator returns null.
    ///
    /// # Examples
    ///
    /// ```
    /// use advanced_vector::{Error, RawMemory};
    ///
    /// let result = RawMemory::<u64>::try_with_capacity(usize::MAX);
    /// assert!(matches!(result, Err(Error::CapacityOverflow { .. })));
    /// ```
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let layout = Self::layout(capacity)?;

        if layout.size() == 0 {
            // Either nothing was requested or `T` is zero-sized. Neither needs real memory.
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
            });
        }

        // SAFETY: The layout has a non-zero size, as checked above.
        let ptr = unsafe { alloc(layout) };

        let ptr = NonNull::new(ptr.cast::<T>()).ok_or(Error::AllocationFailed { layout })?;

        Ok(Self { ptr, capacity })
    }

    fn layout(capacity: usize) -> Result<Layout> {
        Layout::array::<T>(capacity).map_err(|_layout_error| Error::CapacityOverflow {
            requested: capacity,
            item_size: size_of::<T>(),
        })
    }

    /// Returns the number of slots in the block.
    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if the block has no slots.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.capacity == 0
    }

    /// Returns a pointer to the first slot.
    ///
    /// The pointer is dangling if the block is empty.
    #[must_use]
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Returns a mutable pointer to the first slot.
    ///
    /// The pointer is dangling if the block is empty.
    #[must_use]
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Returns the address of the slot at `offset`.
    ///
    /// The offset may be equal to the capacity, yielding the one-past-the-end address.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `offset <= self.capacity()`. This is only checked in debug
    /// builds.
    #[must_use]
    #[inline]
    pub unsafe fn address_at(&self, offset: usize) -> NonNull<T> {
        debug_assert!(
            offset <= self.capacity,
            "offset {offset} is beyond the end of a block of {} {}",
            self.capacity,
            type_name::<T>()
        );

        // SAFETY: Forwarding the bound to the caller. An offset of at most `capacity` stays
        // within the allocation or points one past its end.
        unsafe { self.ptr.add(offset) }
    }

    /// Returns a shared reference to the (possibly uninitialized) slot at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not less than the capacity.
    #[must_use]
    pub fn slot(&self, index: usize) -> &MaybeUninit<T> {
        let ptr = self.slot_ptr(index);

        // SAFETY: The slot is within our allocation (bounds checked by `slot_ptr()`) and
        // `MaybeUninit` does not require the contents to be initialized.
        unsafe { ptr.cast::<MaybeUninit<T>>().as_ref() }
    }

    /// Returns an exclusive reference to the (possibly uninitialized) slot at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not less than the capacity.
    #[must_use]
    pub fn slot_mut(&mut self, index: usize) -> &mut MaybeUninit<T> {
        let ptr = self.slot_ptr(index);

        // SAFETY: The slot is within our allocation (bounds checked by `slot_ptr()`), we hold an
        // exclusive reference to the block and `MaybeUninit` does not require the contents to be
        // initialized.
        unsafe { ptr.cast::<MaybeUninit<T>>().as_mut() }
    }

    fn slot_ptr(&self, index: usize) -> NonNull<T> {
        assert!(
            index < self.capacity,
            "slot {index} index out of bounds in block of {} {}",
            self.capacity,
            type_name::<T>()
        );

        // SAFETY: Guarded by the bounds check above.
        unsafe { self.ptr.add(index) }
    }

    /// Exchanges the memory owned by two blocks. Never allocates and never fails.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }
}

impl<T> Default for RawMemory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawMemory<T> {
    fn drop(&mut self) {
        let layout = Self::layout(self.capacity)
            .expect("layout was already validated when the block was allocated");

        if layout.size() == 0 {
            return;
        }

        // SAFETY: We allocated this memory in `try_with_capacity()` with the same layout and it
        // has not been deallocated since (moving the block transfers this responsibility).
        unsafe {
            dealloc(self.ptr.as_ptr().cast(), layout);
        }
    }
}

impl<T> fmt::Debug for RawMemory<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}

// SAFETY: The block exclusively owns its allocation, so sending it to another thread is as safe
// as sending the values it may hold.
unsafe impl<T: Send> Send for RawMemory<T> {}

// SAFETY: Shared access to the block only hands out shared references to slots, so sharing it is
// as safe as sharing the values it may hold.
unsafe impl<T: Sync> Sync for RawMemory<T> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    reason = "test code doesn't need the same safety rigor as production code"
)]
mod tests {
    use std::cell::Cell;
    use std::mem;

    use static_assertions::{assert_impl_all, assert_not_impl_any};
    use testing::InstanceCounter;

    use super::*;

    assert_impl_all!(RawMemory<u32>: Send, Sync, Default);
    assert_impl_all!(RawMemory<Cell<u32>>: Send);
    assert_not_impl_any!(RawMemory<u32>: Clone, Copy);
    assert_not_impl_any!(RawMemory<Cell<u32>>: Sync);

    #[test]
    fn new_is_empty() {
        let memory = RawMemory::<u64>::new();

        assert_eq!(memory.capacity(), 0);
        assert!(memory.is_empty());
    }

    #[test]
    fn zero_capacity_is_empty() {
        let memory = RawMemory::<u64>::with_capacity(0);

        assert_eq!(memory.capacity(), 0);
        assert!(memory.is_empty());
    }

    #[test]
    fn slots_hold_written_values() {
        let mut memory = RawMemory::<u32>::with_capacity(3);
        assert_eq!(memory.capacity(), 3);

        memory.slot_mut(0).write(10);
        memory.slot_mut(1).write(11);
        memory.slot_mut(2).write(12);

        unsafe {
            assert_eq!(memory.slot(0).assume_init_read(), 10);
            assert_eq!(memory.slot(1).assume_init_read(), 11);
            assert_eq!(memory.slot(2).assume_init_read(), 12);
        }
    }

    #[test]
    fn address_at_is_contiguous() {
        let memory = RawMemory::<u64>::with_capacity(4);

        let first = unsafe { memory.address_at(0) };
        let end = unsafe { memory.address_at(4) };

        assert_eq!(first.as_ptr().cast_const(), memory.as_ptr());
        assert_eq!(
            end.as_ptr() as usize - first.as_ptr() as usize,
            4 * size_of::<u64>()
        );
    }

    #[test]
    #[should_panic]
    fn slot_out_of_bounds_panics() {
        let memory = RawMemory::<u32>::with_capacity(2);

        _ = memory.slot(2);
    }

    #[test]
    #[should_panic]
    fn slot_of_empty_block_panics() {
        let mut memory = RawMemory::<u32>::new();

        _ = memory.slot_mut(0);
    }

    #[test]
    fn swap_exchanges_blocks() {
        let mut a = RawMemory::<u32>::with_capacity(2);
        let mut b = RawMemory::<u32>::with_capacity(5);

        a.slot_mut(1).write(7);
        let a_ptr = a.as_ptr();

        a.swap(&mut b);

        assert_eq!(a.capacity(), 5);
        assert_eq!(b.capacity(), 2);
        assert_eq!(b.as_ptr(), a_ptr);
        assert_eq!(unsafe { b.slot(1).assume_init_read() }, 7);
    }

    #[test]
    fn take_leaves_empty_block() {
        let mut source = RawMemory::<u32>::with_capacity(8);
        let source_ptr = source.as_ptr();

        let target = mem::take(&mut source);

        assert!(source.is_empty());
        assert_eq!(target.capacity(), 8);
        assert_eq!(target.as_ptr(), source_ptr);
    }

    #[test]
    fn assignment_releases_previous_block() {
        let mut target = RawMemory::<String>::with_capacity(4);
        let source = RawMemory::<String>::with_capacity(2);

        // The previous allocation of `target` is released here. Running this under Miri
        // will flag a leak if that does not happen.
        target = source;

        assert_eq!(target.capacity(), 2);
    }

    #[test]
    fn drop_never_drops_values() {
        let counter = InstanceCounter::new();

        {
            let mut memory = RawMemory::with_capacity(2);
            memory.slot_mut(0).write(counter.track(1));
            assert_eq!(counter.live(), 1);

            let value = unsafe { memory.slot(0).assume_init_read() };
            assert_eq!(*value, 1);

            // The block is dropped at the end of the scope, after `value`. A double drop of
            // the moved-out value would panic inside the tracker.
        }

        assert_eq!(counter.live(), 0);
    }

    #[test]
    fn zero_sized_type_never_allocates() {
        let mut memory = RawMemory::<()>::with_capacity(1_000);

        assert_eq!(memory.capacity(), 1_000);
        memory.slot_mut(999).write(());
    }

    #[test]
    fn overflowing_capacity_is_error() {
        let result = RawMemory::<u64>::try_with_capacity(usize::MAX);

        assert!(matches!(
            result,
            Err(Error::CapacityOverflow {
                requested: usize::MAX,
                item_size: 8
            })
        ));
    }

    #[test]
    #[should_panic]
    fn overflowing_capacity_panics() {
        drop(RawMemory::<u64>::with_capacity(usize::MAX));
    }
}
