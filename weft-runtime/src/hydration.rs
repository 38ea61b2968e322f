//! Adopting server-rendered markup instead of creating nodes.
//!
//! Server output marks every dynamic child region with `<!--$-->` before it
//! and `<!--/$-->` after it (a sole dynamic child only gets the closing
//! comment). While hydrating, a stack of claim frames tracks the next
//! unclaimed server node of the region being evaluated: template clones take
//! their element from there, and inserts compare what they would render with
//! the server nodes between the markers.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use weft_dom::{Node, TreeWalker};

pub(crate) const REGION_START: &str = "$";
pub(crate) const REGION_END: &str = "/$";

/// Outcome counters of one hydration pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HydrationStats {
    /// Elements and regions adopted from the server markup.
    pub claims: usize,
    /// Elements and regions rendered fresh because the markup did not match.
    pub misses: usize,
}

/// A run of server nodes owned by one region: siblings from `first` up to
/// (not including) `end`, or to the last child when there is no end.
pub(crate) struct Claim {
    pub(crate) parent: Node,
    pub(crate) first: Option<Node>,
    pub(crate) end: Option<Node>,
    next: RefCell<Option<Node>>,
}

impl Claim {
    pub(crate) fn new(parent: Node, first: Option<Node>, end: Option<Node>) -> Rc<Self> {
        Rc::new(Self {
            next: RefCell::new(first.clone()),
            parent,
            first,
            end,
        })
    }

    /// The server nodes of the range.
    pub(crate) fn nodes(&self) -> Vec<Node> {
        let mut out = Vec::new();
        let mut cursor = self.first.clone();
        while let Some(node) = cursor {
            if self.end.as_ref() == Some(&node) {
                break;
            }
            cursor = node.next_sibling();
            out.push(node);
        }
        out
    }

    /// Take the next element whose tag is `tag`, skipping text, comments
    /// and whole marker regions.
    fn take_element(&self, tag: &str) -> Option<Node> {
        let mut cursor = self.next.borrow().clone();
        while let Some(node) = cursor {
            if self.end.as_ref() == Some(&node) {
                break;
            }
            if is_marker(&node, REGION_START) {
                cursor = region_end(&node).and_then(|end| end.next_sibling());
                continue;
            }
            if node.is_element() {
                if node.tag().is_some_and(|t| t.eq_ignore_ascii_case(tag)) {
                    *self.next.borrow_mut() = node.next_sibling();
                    return Some(node);
                }
                return None;
            }
            cursor = node.next_sibling();
        }
        None
    }
}

enum Frame {
    Claim(Rc<Claim>),
    Fresh,
}

thread_local! {
    static FRAMES: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
    static STATS: Cell<HydrationStats> = Cell::new(HydrationStats::default());
}

/// `true` while evaluating a first render against server markup.
pub fn is_hydrating() -> bool {
    FRAMES.with(|frames| matches!(frames.borrow().last(), Some(Frame::Claim(_))))
}

fn with_frame<R>(frame: Frame, f: impl FnOnce() -> R) -> R {
    FRAMES.with(|frames| frames.borrow_mut().push(frame));
    let out = f();
    FRAMES.with(|frames| frames.borrow_mut().pop());
    out
}

/// Run `f` claiming from `claim`.
pub(crate) fn claiming<R>(claim: &Rc<Claim>, f: impl FnOnce() -> R) -> R {
    with_frame(Frame::Claim(claim.clone()), f)
}

/// Run `f` with hydration suspended. Every update after the first render
/// goes through here.
pub(crate) fn fresh<R>(f: impl FnOnce() -> R) -> R {
    with_frame(Frame::Fresh, f)
}

/// Claim a server element for a template whose root is `tag`.
pub(crate) fn claim_element(tag: &str) -> Option<Node> {
    let claim = FRAMES.with(|frames| match frames.borrow().last() {
        Some(Frame::Claim(claim)) => Some(claim.clone()),
        _ => None,
    })?;
    match claim.take_element(tag) {
        Some(node) => {
            record(|s| s.claims += 1);
            tracing::trace!(tag, "claimed element");
            Some(node)
        }
        None => {
            record(|s| s.misses += 1);
            tracing::debug!(tag, "no server element to claim; cloning");
            None
        }
    }
}

pub(crate) fn record(f: impl FnOnce(&mut HydrationStats)) {
    STATS.with(|stats| {
        let mut current = stats.get();
        f(&mut current);
        stats.set(current);
    });
}

pub(crate) fn reset_stats() {
    STATS.with(|stats| stats.set(HydrationStats::default()));
}

pub(crate) fn stats() -> HydrationStats {
    STATS.with(Cell::get)
}

pub(crate) fn is_marker(node: &Node, data: &str) -> bool {
    node.is_comment() && node.data() == data
}

/// The `/$` closing the region opened by `marker`, found among the
/// marker's siblings with nested regions skipped.
pub(crate) fn region_end(marker: &Node) -> Option<Node> {
    let parent = marker.parent()?;
    let level = parent.clone();
    let mut walker = TreeWalker::new(&parent, move |node: &Node| {
        node.is_comment()
            && matches!(node.data().as_str(), REGION_START | REGION_END)
            && node.parent().as_ref() == Some(&level)
    });
    walker.set_current(marker);
    let mut depth = 0usize;
    for node in walker {
        if node.data() == REGION_START {
            depth += 1;
        } else if depth == 0 {
            return Some(node);
        } else {
            depth -= 1;
        }
    }
    None
}

/// Server range of the region opened by `marker`.
pub(crate) fn marker_claim(marker: &Node) -> Option<Rc<Claim>> {
    let parent = marker.parent()?;
    let Some(end) = region_end(marker) else {
        tracing::debug!("region marker without a closing marker");
        return None;
    };
    Some(Claim::new(parent, marker.next_sibling(), Some(end)))
}

/// Server range of a sole-child region: the children of `parent` up to the
/// first unmatched `/$`.
pub(crate) fn sole_child_claim(parent: &Node) -> Rc<Claim> {
    let mut depth = 0usize;
    let mut end = None;
    for child in parent.child_nodes() {
        if is_marker(&child, REGION_START) {
            depth += 1;
        } else if is_marker(&child, REGION_END) {
            if depth == 0 {
                end = Some(child);
                break;
            }
            depth -= 1;
        }
    }
    Claim::new(parent.clone(), parent.first_child(), end)
}
