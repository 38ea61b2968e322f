// weft-core/src/runtime.rs
//
// Thread-local reactive graph: signal slots, owners (roots and effects), and
// the synchronous flush queue. Handles in the public API are plain ids into
// this arena.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::mem;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(u64);

pub(crate) type Value = Rc<RefCell<Box<dyn Any>>>;
type EffectFn = Rc<RefCell<Box<dyn FnMut()>>>;

struct SignalSlot {
    value: Value,
    subscribers: BTreeSet<NodeId>,
}

#[derive(Default)]
struct OwnerSlot {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    cleanups: Vec<Box<dyn FnOnce()>>,
    signals: Vec<NodeId>,
    sources: HashSet<NodeId>,
    // `None` for roots; effects carry their body.
    func: Option<EffectFn>,
}

pub(crate) struct Runtime {
    next_id: Cell<u64>,
    signals: RefCell<HashMap<NodeId, SignalSlot>>,
    owners: RefCell<HashMap<NodeId, OwnerSlot>>,
    owner: Cell<Option<NodeId>>,
    observer: Cell<Option<NodeId>>,
    // Effects are ordered by id, so a parent always re-runs before the
    // children it is about to dispose.
    queue: RefCell<BTreeSet<NodeId>>,
    flushing: Cell<bool>,
    batch_depth: Cell<usize>,
}

thread_local! {
    static RUNTIME: Runtime = Runtime::new();
}

pub(crate) fn with_runtime<R>(f: impl FnOnce(&Runtime) -> R) -> R {
    RUNTIME.with(f)
}

struct FlushGuard<'a>(&'a Cell<bool>);

impl Drop for FlushGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl Runtime {
    fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            signals: RefCell::new(HashMap::new()),
            owners: RefCell::new(HashMap::new()),
            owner: Cell::new(None),
            observer: Cell::new(None),
            queue: RefCell::new(BTreeSet::new()),
            flushing: Cell::new(false),
            batch_depth: Cell::new(0),
        }
    }

    fn next_id(&self) -> NodeId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        NodeId(id)
    }

    pub(crate) fn current_owner(&self) -> Option<NodeId> {
        self.owner.get()
    }

    pub(crate) fn current_observer(&self) -> Option<NodeId> {
        self.observer.get()
    }

    pub(crate) fn owner_alive(&self, id: NodeId) -> bool {
        self.owners.borrow().contains_key(&id)
    }

    pub(crate) fn signal_alive(&self, id: NodeId) -> bool {
        self.signals.borrow().contains_key(&id)
    }

    // ---- signals ----------------------------------------------------------

    pub(crate) fn create_signal(&self, value: Box<dyn Any>) -> NodeId {
        let id = self.next_id();
        self.signals.borrow_mut().insert(
            id,
            SignalSlot {
                value: Rc::new(RefCell::new(value)),
                subscribers: BTreeSet::new(),
            },
        );
        if let Some(owner) = self.owner.get() {
            if let Some(slot) = self.owners.borrow_mut().get_mut(&owner) {
                slot.signals.push(id);
            }
        }
        id
    }

    pub(crate) fn signal_value(&self, id: NodeId) -> Option<Value> {
        self.signals.borrow().get(&id).map(|slot| slot.value.clone())
    }

    /// Register the running observer (if any) as a subscriber of `id`.
    pub(crate) fn track(&self, id: NodeId) {
        let Some(observer) = self.observer.get() else {
            return;
        };
        match self.signals.borrow_mut().get_mut(&id) {
            Some(slot) => {
                slot.subscribers.insert(observer);
            }
            None => return,
        }
        if let Some(owner) = self.owners.borrow_mut().get_mut(&observer) {
            owner.sources.insert(id);
        }
    }

    /// Queue every subscriber of `id` and flush unless batching.
    pub(crate) fn notify(&self, id: NodeId) {
        let subscribers: Vec<NodeId> = match self.signals.borrow().get(&id) {
            Some(slot) => slot.subscribers.iter().copied().collect(),
            None => return,
        };
        self.queue.borrow_mut().extend(subscribers);
        if self.batch_depth.get() == 0 {
            self.flush();
        }
    }

    pub(crate) fn begin_batch(&self) {
        self.batch_depth.set(self.batch_depth.get() + 1);
    }

    pub(crate) fn end_batch(&self) {
        let depth = self.batch_depth.get().saturating_sub(1);
        self.batch_depth.set(depth);
        if depth == 0 {
            self.flush();
        }
    }

    fn flush(&self) {
        // Effects queued while flushing are picked up by this outer loop.
        if self.flushing.replace(true) {
            return;
        }
        let _guard = FlushGuard(&self.flushing);
        loop {
            let next = self.queue.borrow_mut().pop_first();
            let Some(id) = next else { break };
            self.run_effect(id);
        }
    }

    // ---- owners -----------------------------------------------------------

    pub(crate) fn create_owner(
        &self,
        parent: Option<NodeId>,
        func: Option<Box<dyn FnMut()>>,
    ) -> NodeId {
        let id = self.next_id();
        let mut owners = self.owners.borrow_mut();
        owners.insert(
            id,
            OwnerSlot {
                parent,
                func: func.map(|f| Rc::new(RefCell::new(f))),
                ..OwnerSlot::default()
            },
        );
        if let Some(parent) = parent {
            if let Some(slot) = owners.get_mut(&parent) {
                slot.children.push(id);
            }
        }
        id
    }

    pub(crate) fn push_cleanup(&self, owner: NodeId, cleanup: Box<dyn FnOnce()>) -> bool {
        match self.owners.borrow_mut().get_mut(&owner) {
            Some(slot) => {
                slot.cleanups.push(cleanup);
                true
            }
            None => false,
        }
    }

    /// Run `f` with `owner` as the current owner and `observer` as the
    /// tracking context, restoring the previous pair afterwards.
    pub(crate) fn with_context<R>(
        &self,
        owner: Option<NodeId>,
        observer: Option<NodeId>,
        f: impl FnOnce() -> R,
    ) -> R {
        let prev_owner = self.owner.replace(owner);
        let prev_observer = self.observer.replace(observer);
        let out = f();
        self.owner.set(prev_owner);
        self.observer.set(prev_observer);
        out
    }

    pub(crate) fn run_effect(&self, id: NodeId) {
        let func = match self.owners.borrow().get(&id) {
            Some(slot) => slot.func.clone(),
            None => return,
        };
        let Some(func) = func else { return };

        self.clean_owner(id);

        // Extract the closure out of the RefCell so we don't hold a mutable
        // borrow while executing it (the body may write signals it reads).
        let mut body: Box<dyn FnMut()> = mem::replace(&mut *func.borrow_mut(), Box::new(|| {}));
        self.with_context(Some(id), Some(id), || body());
        *func.borrow_mut() = body;
    }

    /// Dispose children (newest first), run cleanups (newest first), drop
    /// subscriptions and owned signals. The owner itself stays registered.
    fn clean_owner(&self, id: NodeId) {
        let (children, cleanups, sources, signals) = {
            let mut owners = self.owners.borrow_mut();
            let Some(slot) = owners.get_mut(&id) else {
                return;
            };
            (
                mem::take(&mut slot.children),
                mem::take(&mut slot.cleanups),
                mem::take(&mut slot.sources),
                mem::take(&mut slot.signals),
            )
        };

        for child in children.into_iter().rev() {
            self.dispose_owner(child);
        }
        for cleanup in cleanups.into_iter().rev() {
            cleanup();
        }

        let dropped: Vec<SignalSlot> = {
            let mut map = self.signals.borrow_mut();
            for source in &sources {
                if let Some(slot) = map.get_mut(source) {
                    slot.subscribers.remove(&id);
                }
            }
            signals.iter().filter_map(|s| map.remove(s)).collect()
        };
        drop(dropped);
    }

    pub(crate) fn dispose_owner(&self, id: NodeId) {
        self.clean_owner(id);
        let removed = self.owners.borrow_mut().remove(&id);
        self.queue.borrow_mut().remove(&id);
        if let Some(parent) = removed.as_ref().and_then(|slot| slot.parent) {
            if let Some(slot) = self.owners.borrow_mut().get_mut(&parent) {
                slot.children.retain(|child| *child != id);
            }
        }
        tracing::trace!(owner = id.0, "disposed owner");
        drop(removed);
    }
}
