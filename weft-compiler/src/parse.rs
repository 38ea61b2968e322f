use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;

use crate::error::CompileError;
use crate::template_ast::{AttrValue, Span, TemplateAttr, TemplateNode};

#[derive(pest_derive::Parser)]
#[grammar = "template.pest"]
struct TemplateParser;

/// Parse a whole template source into its root nodes.
pub fn parse_template(source: &str) -> Result<Vec<TemplateNode>, CompileError> {
    let mut pairs = TemplateParser::parse(Rule::template, source).map_err(CompileError::from_pest)?;
    let Some(template) = pairs.next() else {
        return Ok(Vec::new());
    };
    Ok(trim_roots(convert_nodes(template.into_inner())?))
}

/// Parse a `{ ... }` block at the start of `source`. Returns the root nodes
/// and the byte length of the block including both braces.
///
/// Running out of input yields [`CompileError::UnclosedView`] anchored at
/// 1:1 with an empty macro name; the caller knows both.
pub(crate) fn parse_view_block(source: &str) -> Result<(Vec<TemplateNode>, usize), CompileError> {
    let mut pairs = TemplateParser::parse(Rule::view_block, source).map_err(|err| {
        match err.location {
            InputLocation::Pos(pos) if pos >= source.len() => CompileError::UnclosedView {
                macro_name: String::new(),
                line: 1,
                col: 1,
            },
            _ => CompileError::from_pest(err),
        }
    })?;
    let Some(block) = pairs.next() else {
        return Ok((Vec::new(), 0));
    };
    let len = block.as_span().end();
    Ok((trim_roots(convert_nodes(block.into_inner())?), len))
}

/// Whitespace between the braces and the markup is not content: drop
/// blank root text and trim the outer edges of the first and last roots.
fn trim_roots(mut roots: Vec<TemplateNode>) -> Vec<TemplateNode> {
    roots.retain(|node| !matches!(node, TemplateNode::Text(text, _) if text.trim().is_empty()));
    if let Some(TemplateNode::Text(text, _)) = roots.first_mut() {
        *text = text.trim_start().to_string();
    }
    if let Some(TemplateNode::Text(text, _)) = roots.last_mut() {
        *text = text.trim_end().to_string();
    }
    roots
}

fn span_of(pair: &Pair<Rule>) -> Span {
    let span = pair.as_span();
    let (line, col) = span.start_pos().line_col();
    Span {
        start: span.start(),
        end: span.end(),
        line,
        col,
    }
}

fn convert_nodes<'a>(
    pairs: impl Iterator<Item = Pair<'a, Rule>>,
) -> Result<Vec<TemplateNode>, CompileError> {
    let mut nodes = Vec::new();
    for pair in pairs {
        if let Some(node) = convert_node(pair)? {
            nodes.push(node);
        }
    }
    Ok(nodes)
}

fn convert_node(pair: Pair<Rule>) -> Result<Option<TemplateNode>, CompileError> {
    let span = span_of(&pair);
    let node = match pair.as_rule() {
        Rule::text => match normalize_text(pair.as_str()) {
            Some(text) => TemplateNode::Text(weft_dom::decode_entities(&text), span),
            None => return Ok(None),
        },
        Rule::expression => {
            let code = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
            if is_comment_only(code) {
                return Ok(None);
            }
            TemplateNode::Expression(code.trim().to_string(), span)
        }
        Rule::fragment => TemplateNode::Fragment {
            children: convert_nodes(pair.into_inner())?,
            span,
        },
        Rule::element => convert_element(pair, span)?,
        // EOI and anything silent
        _ => return Ok(None),
    };
    Ok(Some(node))
}

fn convert_element(pair: Pair<Rule>, span: Span) -> Result<TemplateNode, CompileError> {
    let mut tag = String::new();
    let mut attrs = Vec::new();
    let mut children = Vec::new();
    let mut self_closing = false;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::tag_name => inner.as_str().clone_into(&mut tag),
            Rule::named_attr => attrs.push(convert_named_attr(inner)),
            Rule::spread_attr => {
                let span = span_of(&inner);
                let expr = inner.into_inner().next().map(|p| p.as_str()).unwrap_or("");
                attrs.push(TemplateAttr::Spread {
                    expr: expr.trim().to_string(),
                    span,
                });
            }
            Rule::self_close => self_closing = true,
            Rule::close_tag => {
                let close_span = span_of(&inner);
                let name = inner.into_inner().next().map(|p| p.as_str()).unwrap_or("");
                if name != tag {
                    return Err(CompileError::Syntax {
                        message: format!("expected `</{tag}>`, found `</{name}>`"),
                        line: close_span.line,
                        col: close_span.col,
                    });
                }
            }
            _ => {
                if let Some(child) = convert_node(inner)? {
                    children.push(child);
                }
            }
        }
    }

    Ok(TemplateNode::Element {
        tag,
        attrs,
        children,
        self_closing,
        span,
    })
}

fn convert_named_attr(pair: Pair<Rule>) -> TemplateAttr {
    let span = span_of(&pair);
    let mut name = String::new();
    let mut value = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::attr_name => inner.as_str().clone_into(&mut name),
            Rule::attr_string => {
                let text = inner.into_inner().next().map(|p| p.as_str()).unwrap_or("");
                value = Some(AttrValue::Literal(weft_dom::decode_entities(text)));
            }
            Rule::attr_expr => {
                let code = inner.into_inner().next().map(|p| p.as_str()).unwrap_or("");
                value = Some(AttrValue::Expression(code.trim().to_string()));
            }
            _ => {}
        }
    }
    TemplateAttr::Named { name, value, span }
}

/// JSX whitespace rules: text without a newline is kept as is. Otherwise
/// each line loses the indentation next to the line breaks, blank lines are
/// dropped and the rest is joined with single spaces.
pub(crate) fn normalize_text(raw: &str) -> Option<String> {
    if !raw.contains('\n') {
        return Some(raw.to_string());
    }
    let lines: Vec<&str> = raw.split('\n').collect();
    let last = lines.len() - 1;
    let kept: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let line = if i == 0 { *line } else { line.trim_start() };
            if i == last { line } else { line.trim_end() }
        })
        .filter(|line| !line.is_empty())
        .collect();
    (!kept.is_empty()).then(|| kept.join(" "))
}

/// `{/* note */}` and `{}` render nothing.
fn is_comment_only(code: &str) -> bool {
    let mut rest = code.trim();
    loop {
        if rest.is_empty() {
            return true;
        }
        if let Some(body) = rest.strip_prefix("/*") {
            match body.find("*/") {
                Some(end) => rest = body[end + 2..].trim_start(),
                None => return false,
            }
        } else if let Some(body) = rest.strip_prefix("//") {
            rest = body.find('\n').map_or("", |end| body[end..].trim_start());
        } else {
            return false;
        }
    }
}
