//! Stack growth for deeply nested declarations
//!
//! Both the parser and the outline visitor recurse once per class body, so
//! they wrap each level in [`ensure_sufficient_stack`].

/// Minimum stack space to keep available before recursing
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Grow the stack if needed before running `f`
#[inline]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
