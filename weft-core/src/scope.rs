// weft-core/src/scope.rs

use crate::runtime::{NodeId, with_runtime};

/// An ownership scope: a root created by [`create_root`], or the effect
/// that is currently running.
///
/// Disposing a scope stops every effect created under it (children before
/// parents) and runs its cleanups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scope {
    id: NodeId,
}

impl Scope {
    /// The owner new effects and cleanups are attached to right now.
    pub fn current() -> Option<Scope> {
        with_runtime(|rt| rt.current_owner()).map(|id| Scope { id })
    }

    pub fn is_alive(&self) -> bool {
        with_runtime(|rt| rt.owner_alive(self.id))
    }

    pub fn dispose(self) {
        with_runtime(|rt| rt.dispose_owner(self.id));
    }

    /// Run `f` with this scope as the owner, without tracking.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        with_runtime(|rt| rt.with_context(Some(self.id), None, f))
    }
}

/// Create a detached root scope and run `f` inside it.
///
/// The root is not owned by the caller's scope; it lives until the returned
/// [`Scope`] is disposed.
pub fn create_root<R>(f: impl FnOnce() -> R) -> (R, Scope) {
    with_runtime(|rt| {
        let id = rt.create_owner(None, None);
        let out = rt.with_context(Some(id), None, f);
        (out, Scope { id })
    })
}

/// Register `f` to run when the current scope is disposed or the current
/// effect re-runs.
pub fn on_dispose(f: impl FnOnce() + 'static) {
    with_runtime(|rt| match rt.current_owner() {
        Some(owner) => {
            rt.push_cleanup(owner, Box::new(f));
        }
        None => {
            tracing::warn!("on_dispose called outside of a scope; the cleanup will never run");
        }
    });
}
