//! Reactive primitives for weft.
//!
//! Signals, derived values and effects live in a thread-local graph. Effects
//! are owners: everything created while an effect runs (nested effects,
//! signals, cleanups) is disposed before it runs again, and a root
//! [`Scope`] disposes its whole subtree at once.

mod runtime;
pub mod scope;
pub mod signal;

pub use scope::{Scope, create_root, on_dispose};
pub use signal::{Computed, Effect, Signal, batch, computed, effect, is_tracking, signal, untrack};
