// weft-dom/src/node.rs

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use crate::events::ListenerEntry;
use crate::stats;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Element { tag: String, svg: bool },
    Text,
    Comment,
    Fragment,
}

pub(crate) struct Inner {
    pub(crate) kind: NodeKind,
    data: RefCell<String>,
    attrs: RefCell<Vec<(String, String)>>,
    props: RefCell<Vec<(String, Rc<dyn Any>)>>,
    pub(crate) listeners: RefCell<Vec<ListenerEntry>>,
    parent: RefCell<Weak<Inner>>,
    children: RefCell<Vec<Node>>,
}

/// A shared handle to a DOM node.
///
/// Cloning the handle does not clone the node; equality and hashing are by
/// identity, like `===` on DOM objects. Use [`Node::clone_node`] for a copy
/// and [`Node::is_equal_node`] for structural comparison.
#[derive(Clone)]
pub struct Node(pub(crate) Rc<Inner>);

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Rc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.kind {
            NodeKind::Fragment => write!(f, "#fragment({})", self.inner_html()),
            _ => f.write_str(&self.outer_html()),
        }
    }
}

impl Node {
    fn with_kind(kind: NodeKind, data: String) -> Self {
        stats::record(|s| s.created += 1);
        Node(Rc::new(Inner {
            kind,
            data: RefCell::new(data),
            attrs: RefCell::new(Vec::new()),
            props: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
        }))
    }

    pub fn element(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let svg = tag == "svg";
        Self::with_kind(NodeKind::Element { tag, svg }, String::new())
    }

    /// An element in the SVG namespace.
    pub fn svg_element(tag: impl Into<String>) -> Self {
        Self::with_kind(
            NodeKind::Element {
                tag: tag.into(),
                svg: true,
            },
            String::new(),
        )
    }

    pub fn text(data: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Text, data.into())
    }

    pub fn comment(data: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Comment, data.into())
    }

    pub fn fragment() -> Self {
        Self::with_kind(NodeKind::Fragment, String::new())
    }

    pub fn kind(&self) -> &NodeKind {
        &self.0.kind
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.0.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.0.kind, NodeKind::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        self.0.kind == NodeKind::Text
    }

    pub fn is_comment(&self) -> bool {
        self.0.kind == NodeKind::Comment
    }

    pub fn is_fragment(&self) -> bool {
        self.0.kind == NodeKind::Fragment
    }

    pub fn is_svg(&self) -> bool {
        matches!(self.0.kind, NodeKind::Element { svg: true, .. })
    }

    /// Character data of a text or comment node; empty for other kinds.
    pub fn data(&self) -> String {
        self.0.data.borrow().clone()
    }

    pub fn set_data(&self, data: &str) {
        let mut slot = self.0.data.borrow_mut();
        if *slot != data {
            data.clone_into(&mut *slot);
        }
    }

    // ---- tree -------------------------------------------------------------

    pub fn parent(&self) -> Option<Node> {
        self.0.parent.borrow().upgrade().map(Node)
    }

    pub fn child_nodes(&self) -> Vec<Node> {
        self.0.children.borrow().clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.children.borrow().len()
    }

    pub fn first_child(&self) -> Option<Node> {
        self.0.children.borrow().first().cloned()
    }

    pub fn last_child(&self) -> Option<Node> {
        self.0.children.borrow().last().cloned()
    }

    fn position(&self) -> Option<(Node, usize)> {
        let parent = self.parent()?;
        let index = parent
            .0
            .children
            .borrow()
            .iter()
            .position(|c| c == self)?;
        Some((parent, index))
    }

    pub fn next_sibling(&self) -> Option<Node> {
        let (parent, index) = self.position()?;
        let children = parent.0.children.borrow();
        children.get(index + 1).cloned()
    }

    pub fn previous_sibling(&self) -> Option<Node> {
        let (parent, index) = self.position()?;
        let children = parent.0.children.borrow();
        index.checked_sub(1).and_then(|i| children.get(i)).cloned()
    }

    pub fn contains(&self, other: &Node) -> bool {
        let mut cursor = Some(other.clone());
        while let Some(node) = cursor {
            if node == *self {
                return true;
            }
            cursor = node.parent();
        }
        false
    }

    pub fn append_child(&self, child: &Node) {
        self.insert_before(child, None);
    }

    /// Insert `child` before `reference`, or at the end when `reference` is
    /// `None`. A node that already has a parent is moved. Inserting a
    /// fragment moves its children and leaves it empty.
    pub fn insert_before(&self, child: &Node, reference: Option<&Node>) {
        if child.is_fragment() {
            for grandchild in child.child_nodes() {
                self.insert_before(&grandchild, reference);
            }
            return;
        }
        let reference = match reference {
            Some(r) if r == child => child.next_sibling(),
            other => other.cloned(),
        };
        child.detach();
        {
            let mut children = self.0.children.borrow_mut();
            let index = match &reference {
                Some(r) => match children.iter().position(|c| c == r) {
                    Some(i) => i,
                    None => {
                        tracing::warn!("insert_before reference is not a child; appending");
                        children.len()
                    }
                },
                None => children.len(),
            };
            children.insert(index, child.clone());
        }
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        stats::record(|s| s.inserted += 1);
    }

    /// Detach this node from its parent. No-op for detached nodes.
    pub fn remove(&self) {
        if self.detach() {
            stats::record(|s| s.removed += 1);
        }
    }

    pub fn remove_child(&self, child: &Node) {
        if child.parent().as_ref() == Some(self) {
            child.remove();
        }
    }

    /// Replace all children with `nodes`.
    pub fn replace_children(&self, nodes: &[Node]) {
        for child in self.child_nodes() {
            child.remove();
        }
        for node in nodes {
            self.append_child(node);
        }
    }

    fn detach(&self) -> bool {
        let Some(parent) = self.parent() else {
            return false;
        };
        parent.0.children.borrow_mut().retain(|c| c != self);
        *self.0.parent.borrow_mut() = Weak::new();
        true
    }

    pub fn text_content(&self) -> String {
        match self.0.kind {
            NodeKind::Text | NodeKind::Comment => self.data(),
            _ => {
                let mut out = String::new();
                for child in self.child_nodes() {
                    if !child.is_comment() {
                        out.push_str(&child.text_content());
                    }
                }
                out
            }
        }
    }

    // ---- attributes -------------------------------------------------------

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.0
            .attrs
            .borrow()
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.0.attrs.borrow().iter().any(|(k, _)| k == name)
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        let mut attrs = self.0.attrs.borrow_mut();
        match attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => value.clone_into(v),
            None => attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attribute(&self, name: &str) {
        self.0.attrs.borrow_mut().retain(|(k, _)| k != name);
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.0.attrs.borrow().clone()
    }

    pub fn class_list(&self) -> Vec<String> {
        self.get_attribute("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.class_list().iter().any(|c| c == name)
    }

    /// Add or remove one class token. An element without a `class`
    /// attribute does not gain an empty one.
    pub fn toggle_class(&self, name: &str, on: bool) {
        let mut list = self.class_list();
        let present = list.iter().any(|c| c == name);
        if on == present {
            return;
        }
        if on {
            list.push(name.to_string());
        } else {
            list.retain(|c| c != name);
        }
        if list.is_empty() {
            self.remove_attribute("class");
        } else {
            self.set_attribute("class", &list.join(" "));
        }
    }

    /// Declarations of the `style` attribute as `(property, value)` pairs.
    pub fn style_declarations(&self) -> Vec<(String, String)> {
        crate::html::parse_style(&self.get_attribute("style").unwrap_or_default())
    }

    pub fn style_property(&self, name: &str) -> Option<String> {
        self.style_declarations()
            .into_iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Set (`Some`) or remove (`None`) one style property, rewriting the
    /// `style` attribute.
    pub fn set_style_property(&self, name: &str, value: Option<&str>) {
        let mut decls = self.style_declarations();
        match (decls.iter_mut().find(|(k, _)| k == name), value) {
            (Some((_, v)), Some(value)) => value.clone_into(v),
            (None, Some(value)) => decls.push((name.to_string(), value.to_string())),
            (Some(_), None) => decls.retain(|(k, _)| k != name),
            (None, None) => return,
        }
        if decls.is_empty() {
            self.remove_attribute("style");
        } else {
            self.set_attribute("style", &crate::html::serialize_style(&decls));
        }
    }

    // ---- properties -------------------------------------------------------

    /// Set a JS-style property. Properties are not attributes: they are not
    /// serialized and not copied by `clone_node`.
    pub fn set_property(&self, name: &str, value: Rc<dyn Any>) {
        let mut props = self.0.props.borrow_mut();
        match props.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => props.push((name.to_string(), value)),
        }
    }

    pub fn property(&self, name: &str) -> Option<Rc<dyn Any>> {
        self.0
            .props
            .borrow()
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    pub fn property_as<T: Clone + 'static>(&self, name: &str) -> Option<T> {
        self.property(name)
            .and_then(|v| v.downcast_ref::<T>().cloned())
    }

    // ---- copies and comparison --------------------------------------------

    /// Copy the node (and with `deep`, its subtree). Listeners and
    /// properties are not copied.
    pub fn clone_node(&self, deep: bool) -> Node {
        let copy = Self::with_kind(self.0.kind.clone(), self.data());
        *copy.0.attrs.borrow_mut() = self.attributes();
        if deep {
            for child in self.child_nodes() {
                let child_copy = child.clone_node(true);
                copy.0.children.borrow_mut().push(child_copy.clone());
                *child_copy.0.parent.borrow_mut() = Rc::downgrade(&copy.0);
            }
        }
        copy
    }

    /// Structural equality: kind, tag, data, attributes (in any order) and
    /// children, recursively.
    pub fn is_equal_node(&self, other: &Node) -> bool {
        if self.0.kind != other.0.kind || *self.0.data.borrow() != *other.0.data.borrow() {
            return false;
        }
        let (a, b) = (self.0.attrs.borrow(), other.0.attrs.borrow());
        if a.len() != b.len() || !a.iter().all(|attr| b.contains(attr)) {
            return false;
        }
        let (a, b) = (self.0.children.borrow(), other.0.children.borrow());
        a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.is_equal_node(y))
    }

    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        crate::html::serialize_into(self, &mut out);
        out
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in self.child_nodes() {
            crate::html::serialize_into(&child, &mut out);
        }
        out
    }

    /// Parse `html` and replace the children with the result.
    pub fn set_inner_html(&self, html: &str) {
        let fragment = crate::html::parse_fragment(html);
        self.replace_children(&[]);
        self.append_child(&fragment);
    }
}
