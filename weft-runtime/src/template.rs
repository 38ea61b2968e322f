use weft_dom::{Node, parse_fragment};

use crate::hydration::{self, REGION_END, REGION_START};

/// Parsed static markup of one compiled template, cloned per use.
#[derive(Clone, Debug)]
pub struct Template {
    root: Node,
}

impl Template {
    pub fn root(&self) -> &Node {
        &self.root
    }
}

/// Parse `html`. Compiled templates have a single root element; other
/// markup is kept as a fragment.
pub fn create_template(html: &str) -> Template {
    let fragment = parse_fragment(html);
    let root = match fragment.child_count() {
        1 => fragment.first_child().unwrap_or(fragment),
        _ => fragment,
    };
    Template { root }
}

/// Parse `html` as the content of an `<svg>` element so its elements are
/// created in the SVG namespace.
pub fn create_svg_template(html: &str) -> Template {
    let wrapper = parse_fragment(&format!("<svg>{html}</svg>"));
    let root = wrapper
        .first_child()
        .and_then(|svg| svg.first_child())
        .unwrap_or(wrapper);
    Template { root }
}

/// A fresh copy of the template, or the matching server element while
/// hydrating.
pub fn clone(template: &Template) -> Node {
    if hydration::is_hydrating() {
        if let Some(tag) = template.root.tag() {
            if let Some(node) = hydration::claim_element(tag) {
                return node;
            }
        }
    }
    template.root.clone_node(true)
}

/// Follow `path` from `from`: `f` steps to the first child, `n` to the next
/// sibling. A step from a `<!--$-->` marker jumps past the server-rendered
/// region it opens, so paths hold for fresh clones and adopted markup alike.
pub fn walk(from: &Node, path: &str) -> Node {
    let mut node = from.clone();
    for step in path.chars() {
        let next = match step {
            'f' => node.first_child(),
            'n' => next_sibling(&node),
            _ => None,
        };
        match next {
            Some(next) => node = next,
            None => {
                tracing::warn!(path, step = %step, "template path does not resolve");
                return Node::comment("");
            }
        }
    }
    node
}

fn next_sibling(node: &Node) -> Option<Node> {
    if hydration::is_marker(node, REGION_START) {
        if let Some(end) = hydration::region_end(node) {
            debug_assert!(hydration::is_marker(&end, REGION_END));
            return end.next_sibling();
        }
    }
    node.next_sibling()
}
