//! String rendering for server output.
//!
//! Compiled SSR templates interleave their static fragments with the parts
//! produced here. Dynamic children are followed by `<!--/$-->` so the client
//! can find where each region ends.

use std::fmt;

use weft_dom::escape_html;

use crate::attribute::{IntoAttribute, attribute_value};
use crate::view::{IntoView, View};

/// Rendered markup. Embedding it in another template inserts it unescaped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SsrResult(String);

impl SsrResult {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SsrResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Interleave `fragments` with `parts`: fragment, part, fragment, ...
/// Extra fragments or parts are appended in order.
pub fn ssr(fragments: &[&str], parts: Vec<String>) -> SsrResult {
    let capacity = fragments.iter().map(|f| f.len()).sum::<usize>()
        + parts.iter().map(String::len).sum::<usize>();
    let mut out = String::with_capacity(capacity);
    let mut parts = parts.into_iter();
    for fragment in fragments {
        out.push_str(fragment);
        if let Some(part) = parts.next() {
            out.push_str(&part);
        }
    }
    for part in parts {
        out.push_str(&part);
    }
    SsrResult(out)
}

/// A dynamic child: its markup followed by the closing region marker.
pub fn ssr_child(value: impl IntoView) -> String {
    let mut out = render_view(&value.into_view());
    out.push_str("<!--/$-->");
    out
}

/// A root-level value, rendered without markers.
pub fn ssr_value(value: impl IntoView) -> String {
    render_view(&value.into_view())
}

/// ` name="value"`, or nothing when the value is absent.
pub fn ssr_attr(name: &str, value: impl IntoAttribute) -> String {
    match value.into_attribute().resolve() {
        Some(value) => format!(" {name}=\"{}\"", escape(&value)),
        None => String::new(),
    }
}

/// The `class` attribute from a base value and toggles.
pub fn classes(base: impl IntoAttribute, toggles: &[(&str, bool)]) -> String {
    let base = attribute_value(base).unwrap_or_default();
    let mut names: Vec<&str> = base.split_whitespace().collect();
    for (name, on) in toggles {
        if *on {
            if !names.contains(name) {
                names.push(name);
            }
        } else {
            names.retain(|n| n != name);
        }
    }
    if names.is_empty() {
        String::new()
    } else {
        format!(" class=\"{}\"", escape(&names.join(" ")))
    }
}

/// The `style` attribute from a base value and properties. `None`
/// removes a property.
pub fn styles(base: impl IntoAttribute, properties: &[(&str, Option<String>)]) -> String {
    let base = attribute_value(base).unwrap_or_default();
    let mut decls = weft_dom::parse_style(&base);
    for (name, value) in properties {
        let position = decls.iter().position(|(n, _)| n == name);
        match (value, position) {
            (Some(value), Some(i)) => decls[i].1 = value.clone(),
            (Some(value), None) => decls.push((name.to_string(), value.clone())),
            (None, Some(i)) => {
                decls.remove(i);
            }
            (None, None) => {}
        }
    }
    if decls.is_empty() {
        String::new()
    } else {
        format!(" style=\"{}\"", escape(&weft_dom::serialize_style(&decls)))
    }
}

/// Attributes from a props spread. Handlers, children and `prop:` entries
/// have no markup.
pub fn ssr_spread(props: crate::props::Props) -> String {
    let mut out = String::new();
    let mut toggles = Vec::new();
    let mut properties = Vec::new();
    let mut class_base = None;
    let mut style_base = None;
    for (name, value) in props.attribute_entries() {
        if let Some(class) = name.strip_prefix("class:") {
            toggles.push((class.to_string(), value.is_some()));
        } else if let Some(property) = name.strip_prefix("style:") {
            properties.push((property.to_string(), value));
        } else if name == "class" {
            class_base = value;
        } else if name == "style" {
            style_base = value;
        } else if let Some(value) = value {
            out.push_str(&format!(" {name}=\"{}\"", escape(&value)));
        }
    }
    if toggles.is_empty() {
        out.push_str(&ssr_attr("class", class_base));
    } else {
        let toggles: Vec<(&str, bool)> = toggles.iter().map(|(n, on)| (n.as_str(), *on)).collect();
        out.push_str(&classes(class_base, &toggles));
    }
    if properties.is_empty() {
        out.push_str(&ssr_attr("style", style_base));
    } else {
        let properties: Vec<(&str, Option<String>)> =
            properties.iter().map(|(n, v)| (n.as_str(), v.clone())).collect();
        out.push_str(&styles(style_base, &properties));
    }
    out
}

pub fn escape(text: &str) -> String {
    escape_html(text)
}

/// Markup for a view. Text is escaped; nodes are serialized.
pub(crate) fn render_view(view: &View) -> String {
    let mut out = String::new();
    render_into(view, &mut out);
    out
}

fn render_into(view: &View, out: &mut String) {
    match view {
        View::Empty => {}
        View::Text(text) => out.push_str(&escape(text)),
        View::Node(node) => {
            if node.is_fragment() {
                out.push_str(&node.inner_html());
            } else {
                out.push_str(&node.outer_html());
            }
        }
        View::List(items) => {
            for item in items {
                render_into(item, out);
            }
        }
        View::Dynamic(get) => render_into(&get(), out),
        View::Deferred(lazy) => render_into(&lazy.force(), out),
        View::Html(html) => out.push_str(html),
    }
}
