use std::panic::{self, AssertUnwindSafe};

/// Runs `f` and asserts that it panics, swallowing the panic.
///
/// The closure is treated as unwind safe. That is the point of the helper: the tests using it
/// inspect the state that a panicking operation left behind.
///
/// # Panics
///
/// Panics if `f` returns normally.
#[track_caller]
pub fn assert_unwinds<F, R>(f: F)
where
    F: FnOnce() -> R,
{
    let result = panic::catch_unwind(AssertUnwindSafe(f));

    assert!(
        matches!(result, Err(_)),
        "expected the operation to panic but it returned normally"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swallows_panic() {
        assert_unwinds(|| panic!("expected"));
    }

    #[test]
    #[should_panic]
    fn normal_return_is_failure() {
        assert_unwinds(|| 42);
    }
}
