//! Inserting views into the document and keeping them up to date.
//!
//! Every dynamic child position is a [`Region`]: a run of sibling nodes
//! under one parent, bounded by a start marker (or nothing) and an end
//! marker (or a fixed `before` node, or the end of the parent). A reactive
//! view gets one effect per region, and that effect is the only writer of
//! the region's nodes.

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use weft_core::{Scope, effect, untrack};
use weft_dom::{Node, parse_fragment};

use crate::hydration::{self, Claim, REGION_END};
use crate::reconcile::reconcile;
use crate::view::{IntoView, View};

/// One resolved entry of a region's content.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Item {
    Node(Node),
    Text(String),
}

pub(crate) struct Region {
    parent: Node,
    start: Option<Node>,
    end: Option<Node>,
    before: Option<Node>,
    current: Vec<Node>,
    owner: Option<Scope>,
}

impl Region {
    pub(crate) fn new(parent: Node, start: Option<Node>, before: Option<Node>) -> Self {
        Self {
            parent,
            start,
            end: None,
            before,
            current: Vec::new(),
            owner: Scope::current(),
        }
    }

    /// Node new content goes in front of; `None` appends.
    fn reference(&self) -> Option<Node> {
        if let Some(end) = &self.end {
            return Some(end.clone());
        }
        if let Some(before) = &self.before {
            return Some(before.clone());
        }
        let start = self.start.as_ref()?;
        self.current.last().unwrap_or(start).next_sibling()
    }

    /// Marker regions get their end comment the first time they hold a
    /// list or nothing; it stays for the region's lifetime.
    fn ensure_end(&mut self) {
        if self.start.is_none() || self.end.is_some() {
            return;
        }
        let end = Node::comment(REGION_END);
        let reference = self.reference();
        self.parent.insert_before(&end, reference.as_ref());
        self.end = Some(end);
    }

    fn is_dead(&self) -> bool {
        self.owner.is_some_and(|owner| !owner.is_alive())
    }

    fn clear(&mut self) {
        for node in mem::take(&mut self.current) {
            node.remove();
        }
    }

    fn replace(&mut self, nodes: Vec<Node>) {
        let reference = self.reference();
        for node in &nodes {
            self.parent.insert_before(node, reference.as_ref());
        }
        for old in mem::take(&mut self.current) {
            if !nodes.contains(&old) {
                old.remove();
            }
        }
        self.current = nodes;
    }

    pub(crate) fn update(&mut self, items: Vec<Item>) {
        if self.is_dead() {
            tracing::trace!("update of a disposed region ignored");
            return;
        }
        match items.len() {
            0 => {
                self.ensure_end();
                self.clear();
            }
            1 => match items.into_iter().next() {
                Some(Item::Text(text)) => {
                    if let [node] = self.current.as_slice() {
                        if node.is_text() {
                            if node.data() != text {
                                node.set_data(&text);
                            }
                            return;
                        }
                    }
                    self.replace(vec![Node::text(text)]);
                }
                Some(Item::Node(node)) => {
                    if self.current.len() == 1 && self.current[0] == node {
                        return;
                    }
                    self.replace(vec![node]);
                }
                None => {}
            },
            _ => {
                self.ensure_end();
                let nodes = self.nodes_for(items);
                if self.current.len() <= 1 {
                    self.replace(nodes);
                } else {
                    let reference = self.reference();
                    reconcile(&self.parent, &self.current, &nodes, reference.as_ref());
                    self.current = nodes;
                }
            }
        }
    }

    /// Nodes for a list, reusing the text node at the same index.
    fn nodes_for(&self, items: Vec<Item>) -> Vec<Node> {
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Item::Node(node) => node,
                Item::Text(text) => match self.current.get(i) {
                    Some(old) if old.is_text() => {
                        if old.data() != text {
                            old.set_data(&text);
                        }
                        old.clone()
                    }
                    _ => Node::text(text),
                },
            })
            .collect()
    }

    /// First render against server markup: take the claimed nodes when they
    /// are what the view renders, otherwise render this region fresh.
    pub(crate) fn adopt(&mut self, items: Vec<Item>, claim: &Claim) {
        if claim.end.is_some() {
            self.end = claim.end.clone();
        }
        let server = claim.nodes();
        let matched = items.len() == server.len()
            && items.iter().zip(&server).all(|(item, node)| match item {
                Item::Node(n) => n == node,
                Item::Text(_) => node.is_text(),
            });
        if matched {
            for (item, node) in items.iter().zip(&server) {
                if let Item::Text(text) = item {
                    if node.data() != *text {
                        node.set_data(text);
                    }
                }
            }
            self.current = server;
            hydration::record(|s| s.claims += 1);
            return;
        }
        tracing::debug!(
            expected = items.len(),
            found = server.len(),
            "hydration mismatch; rendering region fresh"
        );
        hydration::record(|s| s.misses += 1);
        for node in server {
            if !items.contains(&Item::Node(node.clone())) {
                node.remove();
            }
        }
        self.current.clear();
        self.update(items);
    }
}

/// Flatten a view into region items. Getters inside lists run here, under
/// the caller's tracking; deferred views are forced once.
pub(crate) fn resolve(view: &View) -> Vec<Item> {
    let mut items = Vec::new();
    resolve_into(view, &mut items);
    items
}

fn resolve_into(view: &View, items: &mut Vec<Item>) {
    match view {
        View::Empty => {}
        View::Text(text) => push_text(items, text),
        View::Node(node) if node.is_fragment() => {
            items.extend(node.child_nodes().into_iter().map(Item::Node));
        }
        View::Node(node) => items.push(Item::Node(node.clone())),
        View::List(views) => {
            for view in views {
                resolve_into(view, items);
            }
        }
        View::Dynamic(get) => resolve_into(&get(), items),
        View::Deferred(lazy) => resolve_into(&lazy.force(), items),
        View::Html(html) => {
            let fragment = parse_fragment(html);
            items.extend(fragment.child_nodes().into_iter().map(Item::Node));
        }
    }
}

/// Adjacent text merges into one item, as it would in parsed markup.
fn push_text(items: &mut Vec<Item>, text: &str) {
    if text.is_empty() {
        return;
    }
    match items.last_mut() {
        Some(Item::Text(last)) => last.push_str(text),
        _ => items.push(Item::Text(text.to_string())),
    }
}

/// Render `value` into `parent`, in front of `before` or at the end.
pub fn insert(parent: &Node, value: impl IntoView, before: Option<&Node>) {
    let view = value.into_view();
    let claim = hydration::is_hydrating().then(|| match before {
        None => hydration::sole_child_claim(parent),
        Some(before) => Claim::new(parent.clone(), parent.first_child(), Some(before.clone())),
    });
    let region = Region::new(parent.clone(), None, before.cloned());
    mount(region, view, claim);
}

/// Render `value` into the region opened by the comment `marker`.
pub fn insert_at_marker(marker: &Node, value: impl IntoView) {
    let view = value.into_view();
    let Some(parent) = marker.parent() else {
        tracing::warn!("insert_at_marker on a detached marker");
        return;
    };
    let claim = if hydration::is_hydrating() {
        hydration::marker_claim(marker)
    } else {
        None
    };
    let region = Region::new(parent, Some(marker.clone()), None);
    mount(region, view, claim);
}

/// Apply `view` to `region`, once or under an effect. Only the first
/// application may adopt server nodes.
pub(crate) fn mount(region: Region, view: View, claim: Option<Rc<Claim>>) {
    let region = Rc::new(RefCell::new(region));
    if view.is_reactive() {
        let mut claim = claim;
        effect(move || {
            let pending = claim.take();
            apply(&region, &view, pending);
        });
    } else {
        untrack(|| apply(&region, &view, claim));
    }
}

fn apply(region: &RefCell<Region>, view: &View, claim: Option<Rc<Claim>>) {
    match claim {
        Some(claim) => {
            let items = hydration::claiming(&claim, || resolve(view));
            region.borrow_mut().adopt(items, &claim);
        }
        None => {
            let items = hydration::fresh(|| resolve(view));
            region.borrow_mut().update(items);
        }
    }
}
