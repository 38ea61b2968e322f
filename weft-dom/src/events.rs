// weft-dom/src/events.rs

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::Node;

pub type EventHandler = Rc<dyn Fn(&Event)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub(crate) struct ListenerEntry {
    id: ListenerId,
    event: String,
    capture: bool,
    handler: EventHandler,
}

thread_local! {
    static NEXT_LISTENER: Cell<u64> = const { Cell::new(1) };
}

/// A dispatched event. Handlers see the target and the node currently
/// handling it, and may stop propagation.
pub struct Event {
    kind: String,
    bubbles: bool,
    target: RefCell<Option<Node>>,
    current_target: RefCell<Option<Node>>,
    stopped: Cell<bool>,
    default_prevented: Cell<bool>,
}

impl Event {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            bubbles: true,
            target: RefCell::new(None),
            current_target: RefCell::new(None),
            stopped: Cell::new(false),
            default_prevented: Cell::new(false),
        }
    }

    pub fn non_bubbling(kind: impl Into<String>) -> Self {
        Self {
            bubbles: false,
            ..Self::new(kind)
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn target(&self) -> Option<Node> {
        self.target.borrow().clone()
    }

    pub fn current_target(&self) -> Option<Node> {
        self.current_target.borrow().clone()
    }

    pub fn stop_propagation(&self) {
        self.stopped.set(true);
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

impl Node {
    pub fn add_event_listener(
        &self,
        event: impl Into<String>,
        capture: bool,
        handler: EventHandler,
    ) -> ListenerId {
        let id = ListenerId(NEXT_LISTENER.with(|n| n.replace(n.get() + 1)));
        self.0.listeners.borrow_mut().push(ListenerEntry {
            id,
            event: event.into(),
            capture,
            handler,
        });
        id
    }

    /// Returns `false` when no listener with `id` is registered here.
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.0.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.0.listeners.borrow().len()
    }

    fn handlers_for(&self, event: &str, capture: Option<bool>) -> Vec<EventHandler> {
        self.0
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.event == event && capture.is_none_or(|c| l.capture == c))
            .map(|l| l.handler.clone())
            .collect()
    }

    /// Dispatch `event` with this node as target: capture listeners from the
    /// root down, then the target's own listeners, then bubbling listeners
    /// back up. Returns the number of handlers invoked.
    pub fn dispatch_event(&self, event: &Event) -> usize {
        *event.target.borrow_mut() = Some(self.clone());
        let mut path = Vec::new();
        let mut cursor = self.parent();
        while let Some(node) = cursor {
            cursor = node.parent();
            path.push(node);
        }

        let mut invoked = 0;
        let mut call = |node: &Node, handlers: Vec<EventHandler>| -> bool {
            *event.current_target.borrow_mut() = Some(node.clone());
            for handler in handlers {
                handler(event);
                invoked += 1;
            }
            event.stopped.get()
        };

        for node in path.iter().rev() {
            if call(node, node.handlers_for(&event.kind, Some(true))) {
                return invoked;
            }
        }
        let at_target = [
            self.handlers_for(&event.kind, Some(true)),
            self.handlers_for(&event.kind, Some(false)),
        ]
        .concat();
        if call(self, at_target) || !event.bubbles {
            return invoked;
        }
        for node in &path {
            if call(node, node.handlers_for(&event.kind, Some(false))) {
                break;
            }
        }
        invoked
    }
}
