//! Client target: one hoisted HTML template per element tree, cloned and
//! then bound with runtime calls.

use weft_dom::escape_html;

use super::{
    CodegenContext, StaticAttrs, attributes_of, component_call, component_children, indent,
    render_attribute, string_lit,
};
use crate::ast::{
    Ast, AstNode, AttributeKind, AttributeNode, ElementNode, Literal, Structural, element_end,
};
use crate::declarations::Declarations;
use crate::error::CompileError;

pub fn serialize(ast: &Ast, ctx: &mut CodegenContext) -> Result<String, CompileError> {
    let nodes = ast.nodes.as_slice();
    if !ast.is_root_fragment() {
        return root_item(nodes, 0, ctx).map(|(code, _)| code);
    }

    let into_view = ctx.runtime("IntoView");
    let mut items = Vec::new();
    let mut i = 1;
    while i < nodes.len() {
        if matches!(nodes[i], AstNode::Structural(Structural::FragmentEnd)) {
            break;
        }
        let (code, next) = root_item(nodes, i, ctx)?;
        items.push(format!("{into_view}::into_view({code})"));
        i = next;
    }
    let view = ctx.runtime("View");
    Ok(format!("{view}::list(vec![{}])", items.join(", ")))
}

/// Compile the root-level item at `i`; returns its code and the index after it.
fn root_item(
    nodes: &[AstNode],
    i: usize,
    ctx: &mut CodegenContext,
) -> Result<(String, usize), CompileError> {
    match &nodes[i] {
        AstNode::Text(text) => Ok((string_lit(text), i + 1)),
        AstNode::Expression(value, _) if value.dynamic => Ok((value.emit(), i + 1)),
        AstNode::Expression(value, _) => Ok((value.code.clone(), i + 1)),
        AstNode::Element(el) if el.is_component => {
            let (attrs, attrs_end) = attributes_of(nodes, i);
            let children = component_children(el, ctx)?;
            Ok((component_call(ctx, &el.tag, attrs, children), attrs_end + 2))
        }
        AstNode::Element(_) => {
            let end = element_end(nodes, i);
            let code = DomWalk::new(ctx).run(&nodes[i..end])?;
            Ok((code, end))
        }
        _ => Ok(("()".to_string(), i + 1)),
    }
}

/// A node position in the template: child `index` of `parent`.
struct Position {
    parent: Option<usize>,
    index: usize,
    local: Option<String>,
}

struct Frame<'a> {
    element: &'a ElementNode,
    position: usize,
    next_child: usize,
    last_text: bool,
    open: StaticAttrs,
    /// Statement index of the element's first class or style toggle.
    toggles_at: Option<usize>,
}

struct DomWalk<'c> {
    ctx: &'c mut CodegenContext,
    locals: Declarations,
    root: String,
    html: String,
    statements: Vec<String>,
    positions: Vec<Position>,
}

impl<'c> DomWalk<'c> {
    fn new(ctx: &'c mut CodegenContext) -> Self {
        let mut locals = Declarations::new();
        let root = locals.reserve("__el");
        Self {
            ctx,
            locals,
            positions: vec![Position {
                parent: None,
                index: 0,
                local: Some(root.clone()),
            }],
            root,
            html: String::new(),
            statements: Vec::new(),
        }
    }

    fn run(mut self, nodes: &[AstNode]) -> Result<String, CompileError> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut svg_root = false;
        let mut i = 0;

        while i < nodes.len() {
            match &nodes[i] {
                AstNode::Element(el) if el.is_component => {
                    let (attrs, attrs_end) = attributes_of(nodes, i);
                    let children = component_children(el, self.ctx)?;
                    let call = component_call(self.ctx, &el.tag, attrs, children);
                    if let Some(frame) = stack.last_mut() {
                        self.dynamic_child(frame, call);
                    }
                    i = attrs_end + 2;
                    continue;
                }
                AstNode::Element(el) => {
                    let position = match stack.last_mut() {
                        Some(parent) => {
                            let position = self.child_position(parent);
                            if el.dynamic() {
                                self.materialize(position, "__el");
                            }
                            position
                        }
                        None => {
                            svg_root = el.is_svg && el.tag != "svg";
                            0
                        }
                    };
                    stack.push(Frame {
                        element: el,
                        position,
                        next_child: 0,
                        last_text: false,
                        open: StaticAttrs::default(),
                        toggles_at: None,
                    });
                }
                AstNode::Structural(Structural::AttributesEnd) => {
                    if let Some(frame) = stack.last() {
                        self.open_tag(frame);
                    }
                }
                AstNode::Structural(Structural::ElementEnd) => {
                    if let Some(frame) = stack.pop() {
                        if !frame.element.is_void {
                            self.html.push_str(&format!("</{}>", frame.element.tag));
                        }
                    }
                }
                node => {
                    if let Some(frame) = stack.last_mut() {
                        self.node(frame, node);
                    }
                }
            }
            i += 1;
        }
        Ok(self.finish(svg_root))
    }

    fn node(&mut self, frame: &mut Frame, node: &AstNode) {
        match node {
            AstNode::Attribute(attr) => self.attribute(frame, attr),
            AstNode::Spread(code, _) => {
                let el = self.local_of(frame.position);
                let spread = self.ctx.runtime("spread");
                self.statements.push(format!("{spread}(&{el}, {code});"));
            }
            AstNode::Ref(code, _) => {
                let el = self.local_of(frame.position);
                let use_ref = self.ctx.runtime("use_ref");
                self.statements.push(format!("{use_ref}(&{el}, {code});"));
            }
            AstNode::Event(event) => {
                let el = self.local_of(frame.position);
                let listen = self.ctx.runtime("listen");
                let handler = event.handler.bound.as_ref().unwrap_or(&event.handler.code);
                self.statements.push(format!(
                    "{listen}(&{el}, {}, {handler}, {});",
                    string_lit(&event.name),
                    event.capture
                ));
            }
            AstNode::Directive(directive) => {
                let el = self.local_of(frame.position);
                let use_directive = self.ctx.runtime("use_directive");
                let argument = directive.argument.as_deref().unwrap_or("()");
                self.statements.push(format!(
                    "{use_directive}(&{el}, {}, {argument});",
                    directive.name
                ));
            }
            AstNode::Text(text) => self.text(frame, text),
            AstNode::Expression(value, _) if value.dynamic => {
                self.dynamic_child(frame, value.emit());
            }
            AstNode::Expression(value, _) => {
                let text = value.literal.as_ref().map(Literal::as_text).unwrap_or("");
                self.text(frame, text);
            }
            _ => {}
        }
    }

    fn attribute(&mut self, frame: &mut Frame, attr: &AttributeNode) {
        if frame.open.collect(attr) {
            return;
        }
        let value = &attr.value;
        let el = self.local_of(frame.position);
        let func = self.ctx.runtime(match attr.kind {
            AttributeKind::Attr => "attr",
            AttributeKind::Class => "class",
            AttributeKind::Style => "style",
            AttributeKind::CssVar => "cssvar",
            AttributeKind::Prop => "prop",
        });
        let code = if value.dynamic {
            value.emit()
        } else {
            value.code.clone()
        };
        let statement = format!("{func}(&{el}, {}, {code});", string_lit(&attr.name));
        match attr.kind {
            AttributeKind::Class | AttributeKind::Style | AttributeKind::CssVar => {
                frame.toggles_at.get_or_insert(self.statements.len());
                self.statements.push(statement);
            }
            // A whole `class` or `style` value is the base the toggles apply to.
            AttributeKind::Attr if matches!(attr.name.as_str(), "class" | "style") => {
                match frame.toggles_at.as_mut() {
                    Some(at) => {
                        self.statements.insert(*at, statement);
                        *at += 1;
                    }
                    None => self.statements.push(statement),
                }
            }
            _ => self.statements.push(statement),
        }
    }

    fn open_tag(&mut self, frame: &Frame) {
        self.html.push('<');
        self.html.push_str(&frame.element.tag);
        for (name, value) in frame.open.merged() {
            self.html.push_str(&render_attribute(&name, &value));
        }
        self.html.push('>');
    }

    fn text(&mut self, frame: &mut Frame, text: &str) {
        if text.is_empty() {
            return;
        }
        self.html.push_str(&escape_html(text));
        // Adjacent text merges into one DOM node.
        if !frame.last_text {
            self.child_position(frame);
            frame.last_text = true;
        }
    }

    fn dynamic_child(&mut self, frame: &mut Frame, value: String) {
        if frame.element.child_count == 1 {
            let el = self.local_of(frame.position);
            let insert = self.ctx.runtime("insert");
            self.statements
                .push(format!("{insert}(&{el}, {}, None);", indent(&value)));
            return;
        }
        self.html.push_str("<!--$-->");
        let position = self.child_position(frame);
        let marker = self.materialize(position, "__m");
        let insert_at_marker = self.ctx.runtime("insert_at_marker");
        self.statements.push(format!(
            "{insert_at_marker}(&{marker}, {});",
            indent(&value)
        ));
    }

    fn child_position(&mut self, frame: &mut Frame) -> usize {
        self.positions.push(Position {
            parent: Some(frame.position),
            index: frame.next_child,
            local: None,
        });
        frame.next_child += 1;
        frame.last_text = false;
        self.positions.len() - 1
    }

    fn local_of(&mut self, position: usize) -> String {
        match &self.positions[position].local {
            Some(local) => local.clone(),
            None => self.materialize(position, "__el"),
        }
    }

    /// Navigation from the nearest materialized node: an earlier sibling,
    /// else the parent's own path plus a first-child step.
    fn resolve(&self, position: usize) -> (String, String) {
        let pos = &self.positions[position];
        if let Some(local) = &pos.local {
            return (local.clone(), String::new());
        }
        let Some(parent) = pos.parent else {
            return (self.root.clone(), String::new());
        };
        let sibling = self
            .positions
            .iter()
            .filter(|p| p.parent == Some(parent) && p.index < pos.index)
            .filter_map(|p| p.local.as_ref().map(|local| (p.index, local)))
            .max_by_key(|(index, _)| *index);
        if let Some((index, local)) = sibling {
            return (local.clone(), "n".repeat(pos.index - index));
        }
        let (base, mut path) = self.resolve(parent);
        path.push('f');
        path.push_str(&"n".repeat(pos.index));
        (base, path)
    }

    fn materialize(&mut self, position: usize, base: &str) -> String {
        if let Some(local) = &self.positions[position].local {
            return local.clone();
        }
        let (from, path) = self.resolve(position);
        let walk = self.ctx.runtime("walk");
        let local = self
            .locals
            .declare(base, format!("{walk}(&{from}, {})", string_lit(&path)));
        self.positions[position].local = Some(local.clone());
        local
    }

    fn finish(mut self, svg_root: bool) -> String {
        let create = self.ctx.runtime(if svg_root {
            "create_svg_template"
        } else {
            "create_template"
        });
        self.ctx.runtime("Template");
        let template = self.ctx.declarations.hoist(
            "__TMPL",
            format!("{create}({})", string_lit(&self.html)),
        );
        let clone = self.ctx.runtime("clone");
        let init = format!("{template}.with({clone})");
        if self.locals.len() == 1 && self.statements.is_empty() {
            return init;
        }
        self.locals.update(&self.root, init);

        let mut out = String::from("{\n");
        for (id, init) in self.locals.iter() {
            out.push_str(&format!("    let {id} = {};\n", init.unwrap_or("()")));
        }
        for statement in &self.statements {
            out.push_str(&format!("    {statement}\n"));
        }
        out.push_str(&format!("    {}\n}}", self.root));
        out
    }
}
