//! Server target: a hoisted list of static HTML fragments interleaved with
//! rendered parts.
//!
//! Dynamic children of an element are wrapped in `<!--$-->` / `<!--/$-->`
//! comments so the client can find them again when hydrating. A sole
//! dynamic child owns the whole element and gets only the closing comment.

use weft_dom::escape_html;

use super::{
    CodegenContext, StaticAttrs, attributes_of, component_call, component_children,
    render_attribute, string_lit,
};
use crate::ast::{Ast, AstNode, AttributeKind, ElementNode, Literal, Structural};
use crate::error::CompileError;

pub fn serialize(ast: &Ast, ctx: &mut CodegenContext) -> Result<String, CompileError> {
    let mut walk = SsrWalk {
        ctx,
        fragments: Vec::new(),
        current: String::new(),
        parts: Vec::new(),
    };
    walk.run(&ast.nodes)?;
    Ok(walk.finish())
}

/// A dynamic attribute or spread, in source order.
enum Part {
    Attr { name: String, code: String },
    Spread(String),
}

#[derive(Default)]
struct DynamicAttrs {
    parts: Vec<Part>,
    classes: Vec<(String, String)>,
    styles: Vec<(String, String)>,
}

struct Frame<'a> {
    element: &'a ElementNode,
    statics: StaticAttrs,
    dynamic: DynamicAttrs,
}

struct SsrWalk<'c> {
    ctx: &'c mut CodegenContext,
    fragments: Vec<String>,
    current: String,
    parts: Vec<String>,
}

impl SsrWalk<'_> {
    fn run(&mut self, nodes: &[AstNode]) -> Result<(), CompileError> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut i = 0;

        while i < nodes.len() {
            match &nodes[i] {
                AstNode::Element(el) if el.is_component => {
                    let (attrs, attrs_end) = attributes_of(nodes, i);
                    let children = component_children(el, self.ctx)?;
                    let call = component_call(self.ctx, &el.tag, attrs, children);
                    self.child(stack.last(), call);
                    i = attrs_end + 2;
                    continue;
                }
                AstNode::Element(el) => stack.push(Frame {
                    element: el,
                    statics: StaticAttrs::default(),
                    dynamic: DynamicAttrs::default(),
                }),
                AstNode::Attribute(attr) => {
                    if let Some(frame) = stack.last_mut() {
                        if !frame.statics.collect(attr) {
                            let code = attr.value.code.clone();
                            let dynamic = &mut frame.dynamic;
                            match attr.kind {
                                AttributeKind::Attr => dynamic.parts.push(Part::Attr {
                                    name: attr.name.clone(),
                                    code,
                                }),
                                AttributeKind::Class => {
                                    let truthy = self.ctx.runtime("truthy");
                                    dynamic
                                        .classes
                                        .push((attr.name.clone(), format!("{truthy}({code})")));
                                }
                                AttributeKind::Style | AttributeKind::CssVar => {
                                    let name = if attr.kind == AttributeKind::CssVar {
                                        format!("--{}", attr.name)
                                    } else {
                                        attr.name.clone()
                                    };
                                    let value = self.ctx.runtime("attribute_value");
                                    dynamic.styles.push((name, format!("{value}({code})")));
                                }
                                // Properties have no markup.
                                AttributeKind::Prop => {}
                            }
                        }
                    }
                }
                AstNode::Spread(code, _) => {
                    if let Some(frame) = stack.last_mut() {
                        frame.dynamic.parts.push(Part::Spread(code.clone()));
                    }
                }
                AstNode::Structural(Structural::AttributesEnd) => {
                    if let Some(frame) = stack.last() {
                        self.open_tag(frame);
                    }
                }
                AstNode::Structural(Structural::ElementEnd) => {
                    if let Some(frame) = stack.pop() {
                        if !frame.element.is_void {
                            self.current.push_str(&format!("</{}>", frame.element.tag));
                        }
                    }
                }
                AstNode::Text(text) => self.current.push_str(&escape_html(text)),
                AstNode::Expression(value, _) if value.dynamic => {
                    self.child(stack.last(), value.code.clone());
                }
                AstNode::Expression(value, _) => {
                    let text = value.literal.as_ref().map(Literal::as_text).unwrap_or("");
                    self.current.push_str(&escape_html(text));
                }
                // Refs, listeners and directives only exist on the client.
                _ => {}
            }
            i += 1;
        }
        Ok(())
    }

    fn child(&mut self, parent: Option<&Frame>, code: String) {
        match parent {
            None => {
                let value = self.ctx.runtime("ssr_value");
                self.part(format!("{value}({code})"));
            }
            Some(frame) => {
                if frame.element.child_count != 1 {
                    self.current.push_str("<!--$-->");
                }
                let child = self.ctx.runtime("ssr_child");
                self.part(format!("{child}({code})"));
            }
        }
    }

    fn open_tag(&mut self, frame: &Frame) {
        let dynamic = &frame.dynamic;
        self.current.push('<');
        self.current.push_str(&frame.element.tag);
        let mut class_base = string_lit("");
        let mut style_base = string_lit("");
        for (name, value) in frame.statics.merged() {
            if name == "class" && !dynamic.classes.is_empty() {
                class_base = string_lit(&value);
            } else if name == "style" && !dynamic.styles.is_empty() {
                style_base = string_lit(&value);
            } else {
                self.current.push_str(&render_attribute(&name, &value));
            }
        }

        // A dynamic `class` or `style` next to toggles is their base, so
        // the element gets one merged attribute.
        let mut parts = Vec::new();
        for part in &dynamic.parts {
            match part {
                Part::Attr { name, code } if name == "class" && !dynamic.classes.is_empty() => {
                    class_base = code.clone();
                }
                Part::Attr { name, code } if name == "style" && !dynamic.styles.is_empty() => {
                    style_base = code.clone();
                }
                Part::Attr { name, code } => {
                    let ssr_attr = self.ctx.runtime("ssr_attr");
                    parts.push(format!("{ssr_attr}({}, {code})", string_lit(name)));
                }
                Part::Spread(code) => {
                    let spread = self.ctx.runtime("ssr_spread");
                    parts.push(format!("{spread}({code})"));
                }
            }
        }
        if !dynamic.classes.is_empty() {
            let classes = self.ctx.runtime("classes");
            let toggles: Vec<String> = dynamic
                .classes
                .iter()
                .map(|(name, code)| format!("({}, {code})", string_lit(name)))
                .collect();
            parts.push(format!(
                "{classes}({class_base}, &[{}])",
                toggles.join(", ")
            ));
        }
        if !dynamic.styles.is_empty() {
            let styles = self.ctx.runtime("styles");
            let decls: Vec<String> = dynamic
                .styles
                .iter()
                .map(|(name, code)| format!("({}, {code})", string_lit(name)))
                .collect();
            parts.push(format!(
                "{styles}({style_base}, &[{}])",
                decls.join(", ")
            ));
        }
        for part in parts {
            self.part(part);
        }
        self.current.push('>');
    }

    fn part(&mut self, code: String) {
        self.fragments.push(std::mem::take(&mut self.current));
        self.parts.push(code);
    }

    fn finish(mut self) -> String {
        self.fragments.push(std::mem::take(&mut self.current));
        let literals: Vec<String> = self.fragments.iter().map(|f| string_lit(f)).collect();
        let ssr = self.ctx.runtime("ssr");
        let id = self
            .ctx
            .declarations
            .hoist("__SSR", format!("&[{}]", literals.join(", ")));
        format!("{ssr}({id}, vec![{}])", self.parts.join(", "))
    }
}
