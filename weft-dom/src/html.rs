// weft-dom/src/html.rs
//
// Markup I/O for the document model: a lenient fragment parser covering the
// subset templates and server output use, and the matching serializer.

use crate::{Node, NodeKind};

pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

/// Escape text for use in element content or a double-quoted attribute.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_text(input: &str, out: &mut String) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(input: &str, out: &mut String) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// Decode the character references the serializer and `escape_html` emit,
/// plus numeric references and `&nbsp;`. Unknown references stay verbatim.
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').filter(|&end| end <= 10).and_then(|end| {
            let name = &rest[1..end];
            let ch = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => name
                    .strip_prefix("#x")
                    .or_else(|| name.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| name.strip_prefix('#').and_then(|d| d.parse().ok()))
                    .and_then(char::from_u32),
            }?;
            Some((ch, end + 1))
        });
        match decoded {
            Some((ch, len)) => {
                out.push(ch);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let (name, value) = (name.trim(), value.trim());
            (!name.is_empty()).then(|| (name.to_string(), value.to_string()))
        })
        .collect()
}

/// `color: red; width: 2px;`, the form `style` attributes are rewritten in.
pub fn serialize_style(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn serialize_into(node: &Node, out: &mut String) {
    match node.kind() {
        NodeKind::Text => {
            let raw = node
                .parent()
                .and_then(|p| p.tag().map(|t| RAW_TEXT_ELEMENTS.contains(&t)))
                .unwrap_or(false);
            if raw {
                out.push_str(&node.data());
            } else {
                escape_text(&node.data(), out);
            }
        }
        NodeKind::Comment => {
            out.push_str("<!--");
            out.push_str(&node.data());
            out.push_str("-->");
        }
        NodeKind::Fragment => {
            for child in node.child_nodes() {
                serialize_into(&child, out);
            }
        }
        NodeKind::Element { tag, svg } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in node.attributes() {
                out.push(' ');
                out.push_str(&name);
                out.push_str("=\"");
                escape_attr(&value, out);
                out.push('"');
            }
            out.push('>');
            if !svg && is_void_element(tag) {
                return;
            }
            for child in node.child_nodes() {
                serialize_into(&child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

/// Parse markup into a detached fragment.
///
/// Accepts elements, void elements, self-closing tags, quoted and unquoted
/// attributes, `<!--comments-->`, the short `<!data>` comment spelling, and
/// character references. Stray end tags are ignored and unclosed elements are
/// closed at the end of input.
pub fn parse_fragment(html: &str) -> Node {
    let fragment = Node::fragment();
    let mut parser = Parser {
        src: html,
        pos: 0,
        stack: vec![fragment.clone()],
    };
    parser.run();
    fragment
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    stack: Vec<Node>,
}

impl Parser<'_> {
    fn top(&self) -> &Node {
        // The fragment itself is never popped.
        &self.stack[self.stack.len() - 1]
    }

    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn run(&mut self) {
        while self.pos < self.src.len() {
            let rest = self.rest();
            if let Some(body) = rest.strip_prefix("<!--") {
                let (data, consumed) = match body.find("-->") {
                    Some(end) => (&body[..end], 4 + end + 3),
                    None => (body, rest.len()),
                };
                self.top().append_child(&Node::comment(data));
                self.pos += consumed;
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                let (data, consumed) = match rest.find('>') {
                    Some(end) => (&rest[2..end], end + 1),
                    None => (&rest[2..], rest.len()),
                };
                self.top().append_child(&Node::comment(data));
                self.pos += consumed;
            } else if rest.starts_with("</") {
                self.end_tag();
            } else if rest.starts_with('<')
                && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
            {
                self.start_tag();
            } else {
                let end = rest[1..].find('<').map_or(rest.len(), |i| i + 1);
                let text = decode_entities(&rest[..end]);
                self.top().append_child(&Node::text(text));
                self.pos += end;
            }
        }
    }

    fn end_tag(&mut self) {
        let rest = self.rest();
        let (name, consumed) = match rest.find('>') {
            Some(end) => (rest[2..end].trim().to_string(), end + 1),
            None => (rest[2..].trim().to_string(), rest.len()),
        };
        self.pos += consumed;
        let open = self.stack[1..]
            .iter()
            .rposition(|n| n.tag().is_some_and(|t| t.eq_ignore_ascii_case(&name)));
        match open {
            Some(index) => self.stack.truncate(index + 1),
            None => tracing::trace!(tag = %name, "ignored stray end tag"),
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &str {
        let start = self.pos;
        let len = self.src[start..]
            .find(|c: char| !pred(c))
            .unwrap_or(self.src.len() - start);
        self.pos += len;
        &self.src[start..start + len]
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn start_tag(&mut self) {
        self.pos += 1;
        let tag = self
            .take_while(|c| !c.is_whitespace() && c != '/' && c != '>')
            .to_string();
        let in_svg = self.top().is_svg();
        let element = if in_svg || tag == "svg" {
            Node::svg_element(tag.clone())
        } else {
            Node::element(tag.clone())
        };

        let mut self_closing = false;
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                break;
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                self_closing = true;
                break;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }
            let name = self
                .take_while(|c| !c.is_whitespace() && c != '=' && c != '>' && c != '/')
                .to_string();
            self.skip_whitespace();
            let value = if self.rest().starts_with('=') {
                self.pos += 1;
                self.skip_whitespace();
                let raw = match self.rest().chars().next() {
                    Some(quote @ ('"' | '\'')) => {
                        self.pos += 1;
                        let value = self.take_while(|c| c != quote).to_string();
                        self.pos = (self.pos + 1).min(self.src.len());
                        value
                    }
                    _ => self
                        .take_while(|c| !c.is_whitespace() && c != '>')
                        .to_string(),
                };
                decode_entities(&raw)
            } else {
                String::new()
            };
            // The first of duplicated attributes wins.
            if !name.is_empty() && !element.has_attribute(&name) {
                element.set_attribute(&name, &value);
            }
        }

        self.top().append_child(&element);
        if self_closing || (!element.is_svg() && is_void_element(&tag)) {
            return;
        }
        if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
            let close = format!("</{tag}");
            let rest = self.rest();
            let end = rest.find(&close).unwrap_or(rest.len());
            if end > 0 {
                element.append_child(&Node::text(&rest[..end]));
            }
            self.pos += end;
            self.end_tag_if_present();
            return;
        }
        self.stack.push(element);
    }

    fn end_tag_if_present(&mut self) {
        if let Some(end) = self.rest().starts_with("</").then(|| self.rest().find('>')).flatten() {
            self.pos += end + 1;
        }
    }
}
