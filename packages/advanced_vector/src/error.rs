use std::alloc::Layout;

use thiserror::Error;

/// Errors that can occur when acquiring storage for a [`RawMemory`][crate::RawMemory]
/// or a [`Vector`][crate::Vector].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested capacity cannot be expressed as a single allocation.
    #[error(
        "requested capacity of {requested} items of {item_size} bytes each exceeds the maximum allocation size"
    )]
    CapacityOverflow {
        /// The number of items that was requested.
        requested: usize,

        /// The size in bytes of one item.
        item_size: usize,
    },

    /// The memory allocator was unable to satisfy the request.
    #[error(
        "memory allocator failed to provide {} bytes aligned to {}",
        .layout.size(),
        .layout.align()
    )]
    AllocationFailed {
        /// The layout that the allocator was asked for.
        layout: Layout,
    },
}

impl Error {
    /// Treats the error as fatal, the way the infallible APIs of this crate do.
    ///
    /// Allocation failure is forwarded to [`std::alloc::handle_alloc_error`], which aborts the
    /// process by default. Capacity overflow is a panic.
    #[cfg_attr(test, mutants::skip)] // Diverges either way, nothing to observe.
    pub(crate) fn raise(self) -> ! {
        match self {
            Self::AllocationFailed { layout } => std::alloc::handle_alloc_error(layout),
            Self::CapacityOverflow { .. } => panic!("{self}"),
        }
    }
}

/// A specialized `Result` type for storage acquisition, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn capacity_overflow_message_names_request() {
        let error = Error::CapacityOverflow {
            requested: 12,
            item_size: 8,
        };

        let message = error.to_string();
        assert!(message.contains("12 items"));
        assert!(message.contains("8 bytes"));
    }

    #[test]
    fn allocation_failed_message_names_layout() {
        let error = Error::AllocationFailed {
            layout: Layout::from_size_align(64, 16).unwrap(),
        };

        let message = error.to_string();
        assert!(message.contains("64 bytes"));
        assert!(message.contains("aligned to 16"));
    }

    #[test]
    #[should_panic]
    fn raise_capacity_overflow_panics() {
        Error::CapacityOverflow {
            requested: usize::MAX,
            item_size: 2,
        }
        .raise();
    }
}
