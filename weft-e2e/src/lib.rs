//! Views under `views/`, compiled by `weft-cli` from `build.rs` for both
//! targets. The tests drive the compiler's actual output through server
//! rendering and hydration.

use weft_core::{Signal, signal};

/// State of the `card` view.
#[derive(Clone, Copy)]
pub struct Card {
    pub kind: Signal<String>,
    pub active: Signal<bool>,
    pub tone: Signal<Option<String>>,
    pub title: Signal<String>,
    pub count: Signal<i32>,
    pub items: Signal<Vec<String>>,
}

impl Card {
    pub fn new(kind: &str, title: &str, count: i32, items: &[&str]) -> Self {
        Self {
            kind: signal(kind.to_string()),
            active: signal(false),
            tone: signal(None),
            title: signal(title.to_string()),
            count: signal(count),
            items: signal(items.iter().map(|item| item.to_string()).collect()),
        }
    }

    #[must_use]
    pub fn active(self, active: bool) -> Self {
        self.active.set(active);
        self
    }

    #[must_use]
    pub fn tone(self, tone: &str) -> Self {
        self.tone.set(Some(tone.to_string()));
        self
    }
}

/// Client build.
pub mod dom {
    use super::Card;

    pub type Out = weft_dom::Node;

    include!(concat!(env!("OUT_DIR"), "/dom/card.rs"));
}

/// Server build.
pub mod ssr {
    use super::Card;

    pub type Out = weft_runtime::SsrResult;

    include!(concat!(env!("OUT_DIR"), "/ssr/card.rs"));
}
