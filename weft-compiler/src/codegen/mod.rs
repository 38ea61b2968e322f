//! Code generation shared by the DOM and SSR targets.

pub mod dom;
pub mod ssr;

use std::collections::BTreeSet;

use weft_dom::{escape_html, parse_style, serialize_style};

use crate::ast::{
    AstNode, AttributeKind, AttributeNode, ComponentChildren, ElementNode, Literal,
};
use crate::declarations::Declarations;
use crate::error::CompileError;
use crate::options::{CompileOptions, Target};

/// State shared by every template compiled into one file: hoisted template
/// declarations and the runtime items the emitted code refers to.
#[derive(Debug, Clone)]
pub struct CodegenContext {
    target: Target,
    runtime_path: String,
    pub declarations: Declarations,
    imports: BTreeSet<&'static str>,
}

impl CodegenContext {
    pub fn new(options: &CompileOptions) -> Self {
        Self {
            target: options.target,
            runtime_path: options.runtime.clone(),
            declarations: Declarations::new(),
            imports: BTreeSet::new(),
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Record a use of runtime item `name` and return its local alias.
    pub(crate) fn runtime(&mut self, name: &'static str) -> String {
        self.imports.insert(name);
        format!("__{name}")
    }

    pub fn imports(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.imports.iter().copied()
    }

    /// `use` declaration for every runtime item referenced so far.
    pub fn render_imports(&self) -> String {
        if self.imports.is_empty() {
            return String::new();
        }
        let items: Vec<String> = self
            .imports
            .iter()
            .map(|name| format!("{name} as __{name}"))
            .collect();
        format!("use {}::{{{}}};\n", self.runtime_path, items.join(", "))
    }

    /// Hoisted template declarations, as items.
    pub fn render_hoisted(&self) -> String {
        let mut out = String::new();
        match self.target {
            Target::Dom => {
                let entries: Vec<(&str, &str)> = self
                    .declarations
                    .iter()
                    .filter_map(|(id, init)| Some((id, init?)))
                    .collect();
                if entries.is_empty() {
                    return out;
                }
                out.push_str("thread_local! {\n");
                for (id, init) in entries {
                    out.push_str(&format!("    static {id}: __Template = {init};\n"));
                }
                out.push_str("}\n");
            }
            Target::Ssr => {
                for (id, init) in self.declarations.iter() {
                    if let Some(init) = init {
                        out.push_str(&format!("const {id}: &[&str] = {init};\n"));
                    }
                }
            }
        }
        out
    }
}

/// Compile a template AST for the context's target.
pub fn serialize(ast: &crate::ast::Ast, ctx: &mut CodegenContext) -> Result<String, CompileError> {
    match ctx.target() {
        Target::Dom => dom::serialize(ast, ctx),
        Target::Ssr => ssr::serialize(ast, ctx),
    }
}

/// Quote `s` as a Rust string literal.
pub(crate) fn string_lit(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Indent every line after the first by four spaces.
pub(crate) fn indent(code: &str) -> String {
    code.replace('\n', "\n    ")
}

/// Build the `Props` expression for a component from its attribute nodes
/// and compiled children. Explicit keys between spreads are grouped; more
/// than one source goes through `merge_props`, later sources winning.
pub(crate) fn component_call(
    ctx: &mut CodegenContext,
    tag: &str,
    attrs: &[AstNode],
    children: Option<String>,
) -> String {
    let props_ty = ctx.runtime("Props");
    let mut sources: Vec<String> = Vec::new();
    let mut group: Option<String> = None;

    for node in attrs {
        match node {
            AstNode::Attribute(AttributeNode { name, value, .. }) => {
                let builder = group.get_or_insert_with(|| format!("{props_ty}::new()"));
                if value.observable {
                    builder.push_str(&format!(".getter({}, {})", string_lit(name), value.emit()));
                } else {
                    builder.push_str(&format!(".set({}, {})", string_lit(name), value.code));
                }
            }
            AstNode::Spread(code, _) => {
                if let Some(done) = group.take() {
                    sources.push(done);
                }
                sources.push(code.clone());
            }
            _ => {}
        }
    }
    if let Some(children) = children {
        let builder = group.get_or_insert_with(|| format!("{props_ty}::new()"));
        builder.push_str(&format!(".children(move || {children})"));
    }
    if let Some(done) = group.take() {
        sources.push(done);
    }

    let props = match sources.len() {
        0 => format!("{props_ty}::new()"),
        1 => sources.remove(0),
        _ => {
            let merge = ctx.runtime("merge_props");
            format!("{merge}(vec![{}])", sources.join(", "))
        }
    };
    let create = ctx.runtime("create_component");
    format!("{create}({tag}, {props})")
}

/// Nodes between an element node at `start` and its `AttributesEnd`.
pub(crate) fn attributes_of(nodes: &[AstNode], start: usize) -> (&[AstNode], usize) {
    let mut end = start + 1;
    while end < nodes.len()
        && !matches!(
            nodes[end],
            AstNode::Structural(crate::ast::Structural::AttributesEnd)
        )
    {
        end += 1;
    }
    (&nodes[start + 1..end], end)
}

/// Compiled children slot of a component, if it has one.
pub(crate) fn component_children(
    el: &ElementNode,
    ctx: &mut CodegenContext,
) -> Result<Option<String>, CompileError> {
    Ok(match &el.children {
        None => None,
        Some(ComponentChildren::Text(text)) => Some(string_lit(text)),
        Some(ComponentChildren::Expression(value)) => Some(value.code.clone()),
        Some(ComponentChildren::Ast(ast)) => Some(serialize(ast, ctx)?),
    })
}

/// Attributes of one open tag that are known at compile time.
#[derive(Debug, Default)]
pub(crate) struct StaticAttrs {
    attrs: Vec<(String, String)>,
    classes: Vec<String>,
    styles: Vec<(String, String)>,
}

impl StaticAttrs {
    /// Take `attr` if its value is a literal. Returns `false` when the
    /// attribute has to be bound at run time.
    pub(crate) fn collect(&mut self, attr: &AttributeNode) -> bool {
        let value = &attr.value;
        if value.dynamic || attr.kind == AttributeKind::Prop {
            return false;
        }
        match (attr.kind, &value.literal) {
            (AttributeKind::Attr, Some(Literal::Text(text))) => {
                self.attrs.push((attr.name.clone(), text.clone()));
            }
            (AttributeKind::Attr, Some(Literal::Bool(true))) => {
                self.attrs.push((attr.name.clone(), String::new()));
            }
            (AttributeKind::Class, Some(Literal::Bool(true))) => {
                self.classes.push(attr.name.clone());
            }
            (AttributeKind::Class, Some(Literal::Text(_))) => {
                self.classes.push(attr.name.clone());
            }
            (AttributeKind::Style, Some(Literal::Text(text))) => {
                self.styles.push((attr.name.clone(), text.clone()));
            }
            (AttributeKind::CssVar, Some(Literal::Text(text))) => {
                self.styles.push((format!("--{}", attr.name), text.clone()));
            }
            _ => {}
        }
        true
    }

    /// Attribute list with `class:` names folded into `class` and `style:`
    /// declarations folded into `style`.
    pub(crate) fn merged(&self) -> Vec<(String, String)> {
        let mut attrs = self.attrs.clone();
        if !self.classes.is_empty() {
            let extra = self.classes.join(" ");
            match attrs.iter_mut().find(|(name, _)| name == "class") {
                Some((_, existing)) if !existing.is_empty() => {
                    existing.push(' ');
                    existing.push_str(&extra);
                }
                Some((_, existing)) => *existing = extra,
                None => attrs.push(("class".to_string(), extra)),
            }
        }
        if !self.styles.is_empty() {
            match attrs.iter_mut().find(|(name, _)| name == "style") {
                Some((_, existing)) => {
                    let mut decls = parse_style(existing);
                    decls.extend(self.styles.iter().cloned());
                    *existing = serialize_style(&decls);
                }
                None => attrs.push(("style".to_string(), serialize_style(&self.styles))),
            }
        }
        attrs
    }
}

/// ` name="value"` with the value escaped.
pub(crate) fn render_attribute(name: &str, value: &str) -> String {
    format!(" {name}=\"{}\"", escape_html(value))
}
