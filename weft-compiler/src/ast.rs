//! The flat AST both code generators consume.
//!
//! Nodes are stored in document order in one `Vec`; nesting is expressed by
//! [`Structural`] markers instead of child pointers. An element is laid out as
//!
//! ```text
//! Element, <attribute nodes>, AttributesEnd,
//!     [ChildrenStart, <descendants>, ChildrenEnd,]
//! ElementEnd
//! ```
//!
//! and a root fragment as `Fragment, <children>, FragmentEnd`.

use std::cell::Cell;
use std::rc::Rc;

use crate::template_ast::Span;

/// Shared "this element needs a live reference" flag.
///
/// The flag starts cleared and can only be set. Child builders receive a
/// clone of their parent's flag, so setting it from a child is visible on
/// the element node already pushed into the AST.
#[derive(Debug, Clone, Default)]
pub struct Dynamism(Rc<Cell<bool>>);

impl Dynamism {
    pub fn new(initial: bool) -> Self {
        Dynamism(Rc::new(Cell::new(initial)))
    }

    pub fn mark(&self) {
        self.0.set(true);
    }

    pub fn get(&self) -> bool {
        self.0.get()
    }
}

/// A value whose rendering is known at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Text(String),
    Bool(bool),
}

impl Literal {
    /// Text content this literal renders as a child. Booleans render nothing.
    pub fn as_text(&self) -> &str {
        match self {
            Literal::Text(text) => text,
            Literal::Bool(_) => "",
        }
    }
}

/// Classification of one embedded Rust expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    /// Source text as written.
    pub code: String,
    /// `false` only for literals.
    pub dynamic: bool,
    /// Contains a call, method call or macro: must be re-evaluated reactively.
    pub observable: bool,
    /// Path to pass directly instead of wrapping a new closure.
    pub bound: Option<String>,
    pub literal: Option<Literal>,
}

impl Value {
    pub(crate) fn literal(text: impl Into<String>) -> Self {
        let text = text.into();
        Value {
            code: format!("{text:?}"),
            dynamic: false,
            observable: false,
            bound: None,
            literal: Some(Literal::Text(text)),
        }
    }

    /// Rust source passing this value to the runtime: a closure for
    /// observable reads, otherwise the expression itself.
    pub fn emit(&self) -> String {
        match (&self.bound, self.observable) {
            (Some(path), true) => path.clone(),
            (None, true) => format!("move || {}", self.code),
            _ => self.code.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ComponentChildren {
    Text(String),
    Expression(Value),
    Ast(Ast),
}

#[derive(Debug, Clone)]
pub struct ElementNode {
    pub tag: String,
    pub is_void: bool,
    pub is_svg: bool,
    pub is_component: bool,
    pub has_children: bool,
    /// Direct children after fragments are flattened.
    pub child_count: usize,
    /// Direct element (or component) children.
    pub element_count: usize,
    /// Component children; never part of the parent's flat sequence.
    pub children: Option<ComponentChildren>,
    pub span: Span,
    pub(crate) dynamism: Dynamism,
}

impl ElementNode {
    pub fn dynamic(&self) -> bool {
        self.dynamism.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Attr,
    Class,
    Style,
    CssVar,
    Prop,
}

#[derive(Debug, Clone)]
pub struct AttributeNode {
    pub kind: AttributeKind,
    pub name: String,
    pub value: Value,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct EventNode {
    pub name: String,
    pub handler: Value,
    pub capture: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct DirectiveNode {
    pub name: String,
    pub argument: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Structural {
    ElementEnd,
    AttributesEnd,
    ChildrenStart,
    ChildrenEnd,
    FragmentEnd,
}

#[derive(Debug, Clone)]
pub enum AstNode {
    Element(ElementNode),
    Fragment,
    Text(String),
    Expression(Value, Span),
    Attribute(AttributeNode),
    Spread(String, Span),
    Ref(String, Span),
    Event(EventNode),
    Directive(DirectiveNode),
    Structural(Structural),
}

#[derive(Debug, Clone, Default)]
pub struct Ast {
    pub nodes: Vec<AstNode>,
}

impl Ast {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AstNode> {
        self.nodes.iter()
    }

    pub fn is_root_fragment(&self) -> bool {
        matches!(self.nodes.first(), Some(AstNode::Fragment))
    }

    /// Index one past the `ElementEnd` matching the element at `start`.
    pub fn element_end(&self, start: usize) -> usize {
        element_end(&self.nodes, start)
    }
}

pub(crate) fn element_end(nodes: &[AstNode], start: usize) -> usize {
    let mut depth = 0usize;
    for (i, node) in nodes.iter().enumerate().skip(start) {
        match node {
            AstNode::Element(_) => depth += 1,
            AstNode::Structural(Structural::ElementEnd) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
    }
    nodes.len()
}
