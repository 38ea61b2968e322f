use pretty_assertions::assert_eq;
use weft_core::signal;
use weft_runtime::{
    View, attribute_value, classes, escape, render_to_string, ssr, ssr_attr, ssr_child,
    ssr_value, styles, truthy,
};

#[test]
fn fragments_and_parts_interleave() {
    let html = ssr(&["<p>", " and ", "</p>"], vec!["a".into(), "b".into()]);
    assert_eq!(html.as_str(), "<p>a and b</p>");
    assert_eq!(html.to_string(), "<p>a and b</p>");
}

#[test]
fn children_are_escaped_and_closed() {
    assert_eq!(ssr_child("<b>"), "&lt;b&gt;<!--/$-->");
    assert_eq!(ssr_child(7), "7<!--/$-->");
    assert_eq!(ssr_child(()), "<!--/$-->");
    assert_eq!(ssr_child(None::<&str>), "<!--/$-->");
    assert_eq!(ssr_child(vec!["a", "b"]), "ab<!--/$-->");
    assert_eq!(ssr_value("x & y"), "x &amp; y");
}

#[test]
fn nested_results_are_not_escaped_again() {
    let inner = ssr(&["<i>", "</i>"], vec![ssr_child("1 < 2")]);
    let outer = ssr(&["<p>", "</p>"], vec![ssr_child(inner)]);
    assert_eq!(outer.as_str(), "<p><i>1 &lt; 2<!--/$--></i><!--/$--></p>");
}

#[test]
fn getters_are_read_once() {
    let count = signal(3);
    assert_eq!(ssr_child(move || count.get() * 2), "6<!--/$-->");
    assert_eq!(render_to_string(|| View::dynamic(|| View::text("now"))), "now");
}

#[test]
fn attributes() {
    assert_eq!(ssr_attr("title", "a\"b"), " title=\"a&quot;b\"");
    assert_eq!(ssr_attr("disabled", true), " disabled=\"\"");
    assert_eq!(ssr_attr("hidden", false), "");
    assert_eq!(ssr_attr("alt", None::<String>), "");
    assert_eq!(ssr_attr("width", 12), " width=\"12\"");
}

#[test]
fn class_lists() {
    assert_eq!(classes("a b", &[("c", true), ("a", false)]), " class=\"b c\"");
    assert_eq!(classes("", &[("x", false)]), "");
    assert_eq!(classes("a", &[("a", true)]), " class=\"a\"");
    assert!(truthy("any text"));
    assert!(truthy(0));
    assert!(!truthy(false));
    assert!(!truthy(None::<&str>));
}

#[test]
fn style_lists() {
    assert_eq!(
        styles("color: red", &[("width", attribute_value("2px")), ("color", None)]),
        " style=\"width: 2px;\""
    );
    assert_eq!(styles("", &[("--gap", attribute_value(4))]), " style=\"--gap: 4;\"");
    assert_eq!(styles("", &[("gap", attribute_value(false))]), "");
}

#[test]
fn escaping() {
    assert_eq!(escape("<a href='x'>&</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");
}
