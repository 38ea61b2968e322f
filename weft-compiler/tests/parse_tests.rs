use pretty_assertions::assert_eq;
use weft_compiler::{AttrValue, CompileError, TemplateAttr, TemplateNode, parse_template};

fn children(node: &TemplateNode) -> &[TemplateNode] {
    match node {
        TemplateNode::Element { children, .. } | TemplateNode::Fragment { children, .. } => {
            children
        }
        other => panic!("expected a container, got {other:?}"),
    }
}

#[test]
fn parse_element_with_text() {
    let roots = parse_template("<div>hi</div>").unwrap();
    assert_eq!(roots.len(), 1);
    match &roots[0] {
        TemplateNode::Element {
            tag,
            children,
            self_closing,
            ..
        } => {
            assert_eq!(tag, "div");
            assert!(!self_closing);
            assert!(matches!(&children[..], [TemplateNode::Text(t, _)] if t == "hi"));
        }
        _ => panic!("expected element"),
    }
}

#[test]
fn parse_attribute_forms() {
    let roots = parse_template(r#"<input type="text" value={name} disabled {...rest} data-x='1'/>"#)
        .unwrap();
    let TemplateNode::Element {
        attrs,
        self_closing,
        ..
    } = &roots[0]
    else {
        panic!("expected element");
    };
    assert!(self_closing);
    assert_eq!(attrs.len(), 5);
    assert!(matches!(
        &attrs[0],
        TemplateAttr::Named { name, value: Some(AttrValue::Literal(v)), .. } if name == "type" && v == "text"
    ));
    assert!(matches!(
        &attrs[1],
        TemplateAttr::Named { value: Some(AttrValue::Expression(code)), .. } if code == "name"
    ));
    assert!(matches!(&attrs[2], TemplateAttr::Named { name, value: None, .. } if name == "disabled"));
    assert!(matches!(&attrs[3], TemplateAttr::Spread { expr, .. } if expr == "rest"));
    assert!(matches!(
        &attrs[4],
        TemplateAttr::Named { value: Some(AttrValue::Literal(v)), .. } if v == "1"
    ));
}

#[test]
fn expressions_keep_nested_braces_and_strings() {
    let roots = parse_template(r#"<p>{if ok { "}" } else { "{" }}</p>"#).unwrap();
    match &children(&roots[0])[0] {
        TemplateNode::Expression(code, _) => assert_eq!(code, r#"if ok { "}" } else { "{" }"#),
        other => panic!("expected expression, got {other:?}"),
    }
}

#[test]
fn multiline_text_is_collapsed() {
    let roots = parse_template("<p>\n    Hello\n    world\n</p>").unwrap();
    assert!(matches!(&children(&roots[0])[..], [TemplateNode::Text(t, _)] if t == "Hello world"));
}

#[test]
fn single_line_text_is_verbatim() {
    let roots = parse_template("<p>  a  b </p>").unwrap();
    assert!(matches!(&children(&roots[0])[..], [TemplateNode::Text(t, _)] if t == "  a  b "));
}

#[test]
fn whitespace_only_lines_between_tags_vanish() {
    let roots = parse_template("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>").unwrap();
    let kids = children(&roots[0]);
    assert_eq!(kids.len(), 2);
    assert!(kids.iter().all(|k| matches!(k, TemplateNode::Element { .. })));
}

#[test]
fn entities_are_decoded() {
    let roots = parse_template(r#"<p title="a &quot;b&quot;">x &amp; y &lt;3</p>"#).unwrap();
    let TemplateNode::Element { attrs, children, .. } = &roots[0] else {
        panic!("expected element");
    };
    assert!(matches!(
        &attrs[0],
        TemplateAttr::Named { value: Some(AttrValue::Literal(v)), .. } if v == "a \"b\""
    ));
    assert!(matches!(&children[..], [TemplateNode::Text(t, _)] if t == "x & y <3"));
}

#[test]
fn comment_expressions_are_dropped() {
    let roots = parse_template("<p>{/* note */}a{}</p>").unwrap();
    assert_eq!(children(&roots[0]).len(), 1);
}

#[test]
fn fragments_parse() {
    let roots = parse_template("<><a/><b/></>").unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(children(&roots[0]).len(), 2);
}

#[test]
fn mismatched_close_tag_is_reported() {
    let err = parse_template("<div></span>").unwrap_err();
    match err {
        CompileError::Syntax { message, line, col } => {
            assert_eq!(message, "expected `</div>`, found `</span>`");
            assert_eq!((line, col), (1, 6));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn missing_close_tag_is_a_syntax_error() {
    assert!(matches!(
        parse_template("<div><p>x</p>"),
        Err(CompileError::Syntax { .. })
    ));
}
