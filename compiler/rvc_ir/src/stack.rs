//! Stack growth for recursive tree walks.
//!
//! Tree depth follows source nesting, not program size, so a pathological
//! input can recurse far deeper than the main thread's stack allows. Every
//! recursive walk over a [`Node`](crate::Node) goes through
//! [`ensure_sufficient_stack`], which grows the stack on native targets.
//! Callers that want a hard limit enforce it themselves (the code generator
//! reports a nesting-depth error).

/// Grow when less than this much stack is left (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if the red zone has been reached.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack; run `f` directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
