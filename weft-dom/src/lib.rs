//! In-memory document model for weft.
//!
//! Nodes are reference-counted handles with DOM-like identity, so the
//! runtime can hold references into a tree, move nodes between parents and
//! compare them with `==`. The crate also provides the markup parser and
//! serializer used for templates and server output, a [`TreeWalker`], and
//! per-thread [`stats`] for counting mutations in tests.

pub mod events;
pub mod html;
mod node;
pub mod stats;
mod walker;

pub use events::{Event, EventHandler, ListenerId};
pub use html::{decode_entities, escape_html, is_void_element, parse_fragment, parse_style, serialize_style};
pub use node::{Node, NodeKind};
pub use walker::TreeWalker;

/// Build an element with attributes and children. Handy in tests.
///
/// ```
/// use weft_dom::{h, text};
/// let node = h("div", [("class", "app")], [text("hello")]);
/// assert_eq!(node.outer_html(), r#"<div class="app">hello</div>"#);
/// ```
pub fn h<'a>(
    tag: &str,
    attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
    children: impl IntoIterator<Item = Node>,
) -> Node {
    let el = Node::element(tag);
    for (name, value) in attrs {
        el.set_attribute(name, value);
    }
    for child in children {
        el.append_child(&child);
    }
    el
}

pub fn text(data: impl Into<String>) -> Node {
    Node::text(data)
}
