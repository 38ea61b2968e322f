// weft-core/src/signal.rs

use std::cell::Cell;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::runtime::{NodeId, with_runtime};

/// A reactive value.
///
/// `Signal` is a `Copy` handle into the thread-local reactive graph, so it
/// can be moved into any number of `move ||` closures. The value lives as
/// long as the owner (root or effect) that was current when it was created.
pub struct Signal<T> {
    id: NodeId,
    ty: PhantomData<Rc<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Signal<T> {}

impl<T> PartialEq for Signal<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal").field("id", &self.id).finish()
    }
}

/// Create a signal holding `value`.
pub fn signal<T: 'static>(value: T) -> Signal<T> {
    Signal::new(value)
}

impl<T: 'static> Signal<T> {
    pub fn new(initial: T) -> Self {
        let id = with_runtime(|rt| rt.create_signal(Box::new(initial)));
        Self {
            id,
            ty: PhantomData,
        }
    }

    /// Read the value, and if inside an `effect`, register that effect as a subscriber.
    ///
    /// # Panics
    /// When the owner that created the signal has been disposed.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Read the value without subscribing the running effect.
    ///
    /// # Panics
    /// When the owner that created the signal has been disposed.
    pub fn peek(&self) -> T
    where
        T: Clone,
    {
        self.with_untracked(T::clone)
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        with_runtime(|rt| rt.track(self.id));
        self.with_untracked(f)
    }

    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        match self.try_with_untracked(f) {
            Some(out) => out,
            None => panic!("signal read after its owner was disposed"),
        }
    }

    /// Like [`Signal::with`], but `None` once the signal has been disposed.
    pub fn try_with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        with_runtime(|rt| rt.track(self.id));
        self.try_with_untracked(f)
    }

    pub fn try_with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let value = with_runtime(|rt| rt.signal_value(self.id))?;
        let borrowed = value.borrow();
        borrowed.downcast_ref::<T>().map(f)
    }

    /// Replace the value and notify all subscribers via the scheduler.
    /// Writes to a disposed signal are ignored.
    pub fn set(&self, new: T) {
        if self.replace_silently(new) {
            with_runtime(|rt| rt.notify(self.id));
        }
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let Some(value) = with_runtime(|rt| rt.signal_value(self.id)) else {
            tracing::debug!("update on disposed signal ignored");
            return;
        };
        {
            let mut borrowed = value.borrow_mut();
            match borrowed.downcast_mut::<T>() {
                Some(slot) => f(slot),
                None => return,
            }
        }
        with_runtime(|rt| rt.notify(self.id));
    }

    pub fn is_disposed(&self) -> bool {
        !with_runtime(|rt| rt.signal_alive(self.id))
    }

    fn replace_silently(&self, new: T) -> bool {
        let Some(value) = with_runtime(|rt| rt.signal_value(self.id)) else {
            tracing::debug!("write to disposed signal ignored");
            return false;
        };
        // Drop the previous value after the borrow ends.
        let previous = std::mem::replace(&mut *value.borrow_mut(), Box::new(new));
        drop(previous);
        true
    }
}

/// A derived value recomputed whenever its dependencies change.
///
/// Subscribers are only notified when the new value differs from the old one.
pub struct Computed<T> {
    signal: Signal<T>,
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Computed<T> {}

impl<T> std::fmt::Debug for Computed<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Computed").field("id", &self.signal.id).finish()
    }
}

pub fn computed<T, F>(f: F) -> Computed<T>
where
    T: PartialEq + 'static,
    F: Fn() -> T + 'static,
{
    // The slot is created before the effect so it belongs to the caller's
    // owner, not to the effect (which would drop it on every re-run).
    let id = with_runtime(|rt| rt.create_signal(Box::new(())));
    let signal = Signal::<T> {
        id,
        ty: PhantomData,
    };
    let first = Cell::new(true);
    effect(move || {
        let next = f();
        if first.replace(false) {
            signal.replace_silently(next);
            return;
        }
        let unchanged = signal
            .try_with_untracked(|current| *current == next)
            .unwrap_or(false);
        if !unchanged {
            signal.set(next);
        }
    });
    Computed { signal }
}

impl<T: 'static> Computed<T> {
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.signal.get()
    }

    pub fn peek(&self) -> T
    where
        T: Clone,
    {
        self.signal.peek()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.signal.with(f)
    }
}

/// Handle to a running effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Effect {
    id: NodeId,
}

impl Effect {
    /// Stop the effect; its children and cleanups run first.
    pub fn dispose(self) {
        with_runtime(|rt| rt.dispose_owner(self.id));
    }

    pub fn is_alive(&self) -> bool {
        with_runtime(|rt| rt.owner_alive(self.id))
    }
}

/// Register a closure as a reactive effect:
/// - runs immediately to collect dependencies,
/// - then re-runs whenever any `Signal` it reads is `set()`.
///
/// The effect belongs to the current owner and stops when that owner is
/// disposed. Before each re-run, effects and cleanups created by the
/// previous run are disposed.
pub fn effect<F>(f: F) -> Effect
where
    F: FnMut() + 'static,
{
    with_runtime(|rt| {
        let parent = rt.current_owner();
        if parent.is_none() {
            tracing::debug!("effect created outside of a root will never be disposed");
        }
        let id = rt.create_owner(parent, Some(Box::new(f)));
        // Writes made by the first run are flushed after it completes.
        rt.begin_batch();
        rt.run_effect(id);
        rt.end_batch();
        Effect { id }
    })
}

/// Run `f` without tracking any signal reads.
pub fn untrack<R>(f: impl FnOnce() -> R) -> R {
    with_runtime(|rt| {
        let owner = rt.current_owner();
        rt.with_context(owner, None, f)
    })
}

/// Defer effect re-runs until `f` returns.
pub fn batch<R>(f: impl FnOnce() -> R) -> R {
    with_runtime(|rt| rt.begin_batch());
    let out = f();
    with_runtime(|rt| rt.end_batch());
    out
}

/// `true` while an effect is collecting dependencies.
pub fn is_tracking() -> bool {
    with_runtime(|rt| rt.current_observer().is_some())
}
