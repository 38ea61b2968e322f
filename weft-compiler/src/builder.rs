// Linearizes the parsed template tree into the flat AST.

use crate::analysis::{analyze, analyze_handler};
use crate::ast::{
    Ast, AstNode, AttributeKind, AttributeNode, ComponentChildren, DirectiveNode, Dynamism,
    ElementNode, EventNode, Literal, Structural, Value,
};
use crate::error::CompileError;
use crate::template_ast::{AttrValue, Span, TemplateAttr, TemplateNode};

const SVG_ELEMENTS: &[&str] = &[
    "svg", "animate", "animateMotion", "animateTransform", "circle", "clipPath", "defs", "desc",
    "ellipse", "feBlend", "feColorMatrix", "feComposite", "feFlood", "feGaussianBlur", "feImage",
    "feMerge", "feMergeNode", "feOffset", "filter", "foreignObject", "g", "image", "line",
    "linearGradient", "marker", "mask", "metadata", "mpath", "path", "pattern", "polygon",
    "polyline", "radialGradient", "rect", "set", "stop", "switch", "symbol", "text", "textPath",
    "tspan", "use", "view",
];

/// Component tags: anything but lowercase letters, digits and hyphens, apart
/// from the camel-cased SVG elements.
pub fn is_component_tag(tag: &str) -> bool {
    !tag.bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        && !SVG_ELEMENTS.contains(&tag)
}

/// Build the flat AST for a template's root nodes.
///
/// One root element, text or expression is emitted as is; several roots or a
/// root `<>...</>` become a root fragment.
pub fn build_ast(roots: &[TemplateNode]) -> Result<Ast, CompileError> {
    let mut builder = Builder { nodes: Vec::new() };
    let flat = flatten(roots);
    let single_fragment = matches!(roots, [TemplateNode::Fragment { .. }]);

    if flat.len() == 1 && !single_fragment {
        // A lone root has no element to report dynamism to.
        builder.child(flat[0], &Dynamism::default(), false)?;
    } else {
        builder.nodes.push(AstNode::Fragment);
        let detached = Dynamism::default();
        for child in flat {
            builder.child(child, &detached, false)?;
        }
        builder.push_structural(Structural::FragmentEnd);
    }
    Ok(Ast {
        nodes: builder.nodes,
    })
}

/// Children with nested fragments spliced in place.
fn flatten(nodes: &[TemplateNode]) -> Vec<&TemplateNode> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            TemplateNode::Fragment { children, .. } => out.extend(flatten(children)),
            other => out.push(other),
        }
    }
    out
}

struct Builder {
    nodes: Vec<AstNode>,
}

impl Builder {
    fn push_structural(&mut self, marker: Structural) {
        self.nodes.push(AstNode::Structural(marker));
    }

    fn child(
        &mut self,
        node: &TemplateNode,
        parent: &Dynamism,
        in_svg: bool,
    ) -> Result<(), CompileError> {
        match node {
            TemplateNode::Text(text, _) => self.nodes.push(AstNode::Text(text.clone())),
            TemplateNode::Expression(code, span) => {
                let value = analyze(code, *span)?;
                if value.dynamic {
                    parent.mark();
                }
                self.nodes.push(AstNode::Expression(value, *span));
            }
            TemplateNode::Element {
                tag,
                attrs,
                children,
                span,
                ..
            } => {
                if is_component_tag(tag) {
                    parent.mark();
                    self.component(tag, attrs, children, *span)?;
                } else {
                    self.element(tag, attrs, children, *span, in_svg)?;
                }
            }
            TemplateNode::Fragment { children, .. } => {
                for child in flatten(children) {
                    self.child(child, parent, in_svg)?;
                }
            }
        }
        Ok(())
    }

    fn element(
        &mut self,
        tag: &str,
        attrs: &[TemplateAttr],
        children: &[TemplateNode],
        span: Span,
        in_svg: bool,
    ) -> Result<(), CompileError> {
        let is_svg = in_svg || SVG_ELEMENTS.contains(&tag);
        let is_void = !is_svg && weft_dom::is_void_element(tag);
        let children = flatten(children);
        if is_void && !children.is_empty() {
            return Err(CompileError::Syntax {
                message: format!("void element `<{tag}>` cannot have children"),
                line: span.line,
                col: span.col,
            });
        }

        let dynamism = Dynamism::new(false);
        let index = self.nodes.len();
        self.nodes.push(AstNode::Element(ElementNode {
            tag: tag.to_string(),
            is_void,
            is_svg,
            is_component: false,
            has_children: !children.is_empty(),
            child_count: children.len(),
            element_count: children
                .iter()
                .filter(|c| matches!(c, TemplateNode::Element { .. }))
                .count(),
            children: None,
            span,
            dynamism: dynamism.clone(),
        }));

        for attr in attrs {
            self.attribute(attr, &dynamism)?;
        }
        self.push_structural(Structural::AttributesEnd);

        if !children.is_empty() {
            self.push_structural(Structural::ChildrenStart);
            let child_svg = is_svg && tag != "foreignObject";
            for child in children {
                self.child(child, &dynamism, child_svg)?;
            }
            self.push_structural(Structural::ChildrenEnd);
        }
        self.push_structural(Structural::ElementEnd);
        tracing::trace!(tag, index, dynamic = dynamism.get(), "element");
        Ok(())
    }

    fn attribute(&mut self, attr: &TemplateAttr, owner: &Dynamism) -> Result<(), CompileError> {
        let (name, value, span) = match attr {
            TemplateAttr::Spread { expr, span } => {
                owner.mark();
                self.nodes.push(AstNode::Spread(expr.clone(), *span));
                return Ok(());
            }
            TemplateAttr::Named { name, value, span } => (name.as_str(), value, *span),
        };

        if name == "ref" {
            let Some(AttrValue::Expression(code)) = value else {
                return Err(CompileError::Syntax {
                    message: "`ref` expects an expression".to_string(),
                    line: span.line,
                    col: span.col,
                });
            };
            owner.mark();
            self.nodes.push(AstNode::Ref(code.clone(), span));
            return Ok(());
        }

        let (namespace, local) = match name.split_once(':') {
            Some((ns, local)) => (Some(ns), local),
            None => (None, name),
        };
        let kind = match namespace {
            None | Some("attr") => AttributeKind::Attr,
            Some("xlink" | "xml" | "xmlns") => {
                return self.push_attribute(AttributeKind::Attr, name, value, span, owner);
            }
            Some("class") => AttributeKind::Class,
            Some("style") => AttributeKind::Style,
            Some("var") => AttributeKind::CssVar,
            Some("prop") => {
                // Properties only exist on live nodes.
                owner.mark();
                AttributeKind::Prop
            }
            Some(ns @ ("on" | "capture")) => {
                let code = expression_value(name, value, span)?;
                owner.mark();
                self.nodes.push(AstNode::Event(EventNode {
                    name: local.to_string(),
                    handler: analyze_handler(code, span)?,
                    capture: ns == "capture",
                    span,
                }));
                return Ok(());
            }
            Some("use") => {
                let argument = match value {
                    None => None,
                    Some(AttrValue::Expression(code)) => Some(code.clone()),
                    Some(AttrValue::Literal(text)) => Some(format!("{text:?}")),
                };
                owner.mark();
                self.nodes.push(AstNode::Directive(DirectiveNode {
                    name: local.to_string(),
                    argument,
                    span,
                }));
                return Ok(());
            }
            Some(other) => {
                return Err(CompileError::AttributeNamespace {
                    namespace: other.to_string(),
                    name: name.to_string(),
                    line: span.line,
                    col: span.col,
                });
            }
        };
        self.push_attribute(kind, local, value, span, owner)
    }

    fn push_attribute(
        &mut self,
        kind: AttributeKind,
        name: &str,
        value: &Option<AttrValue>,
        span: Span,
        owner: &Dynamism,
    ) -> Result<(), CompileError> {
        let value = attribute_value(value, span)?;
        if value.dynamic {
            owner.mark();
        }
        self.nodes.push(AstNode::Attribute(AttributeNode {
            kind,
            name: name.to_string(),
            value,
            span,
        }));
        Ok(())
    }

    fn component(
        &mut self,
        tag: &str,
        attrs: &[TemplateAttr],
        children: &[TemplateNode],
        span: Span,
    ) -> Result<(), CompileError> {
        let index = self.nodes.len();
        let flat = flatten(children);
        let slot = match flat.as_slice() {
            [] => None,
            [TemplateNode::Text(text, _)] => Some(ComponentChildren::Text(text.clone())),
            [TemplateNode::Expression(code, span)] => {
                let value = analyze(code, *span)?;
                Some(match &value.literal {
                    Some(Literal::Text(text)) => ComponentChildren::Text(text.clone()),
                    _ => ComponentChildren::Expression(value),
                })
            }
            _ => Some(ComponentChildren::Ast(build_ast(children)?)),
        };

        self.nodes.push(AstNode::Element(ElementNode {
            tag: tag.replace('.', "::"),
            is_void: false,
            is_svg: false,
            is_component: true,
            has_children: slot.is_some(),
            child_count: flat.len(),
            element_count: flat
                .iter()
                .filter(|c| matches!(c, TemplateNode::Element { .. }))
                .count(),
            children: slot,
            span,
            dynamism: Dynamism::new(true),
        }));

        // Every attribute of a component is a prop under its written name.
        for attr in attrs {
            match attr {
                TemplateAttr::Spread { expr, span } => {
                    self.nodes.push(AstNode::Spread(expr.clone(), *span));
                }
                TemplateAttr::Named { name, value, span } => {
                    let value = attribute_value(value, *span)?;
                    self.nodes.push(AstNode::Attribute(AttributeNode {
                        kind: AttributeKind::Attr,
                        name: name.clone(),
                        value,
                        span: *span,
                    }));
                }
            }
        }
        self.push_structural(Structural::AttributesEnd);
        self.push_structural(Structural::ElementEnd);
        tracing::trace!(tag, index, "component");
        Ok(())
    }
}

fn attribute_value(value: &Option<AttrValue>, span: Span) -> Result<Value, CompileError> {
    Ok(match value {
        None => Value {
            code: "true".to_string(),
            dynamic: false,
            observable: false,
            bound: None,
            literal: Some(Literal::Bool(true)),
        },
        Some(AttrValue::Literal(text)) => Value::literal(text.as_str()),
        Some(AttrValue::Expression(code)) => analyze(code, span)?,
    })
}

fn expression_value<'a>(
    name: &str,
    value: &'a Option<AttrValue>,
    span: Span,
) -> Result<&'a str, CompileError> {
    match value {
        Some(AttrValue::Expression(code)) => Ok(code),
        _ => Err(CompileError::Syntax {
            message: format!("`{name}` expects an expression"),
            line: span.line,
            col: span.col,
        }),
    }
}
