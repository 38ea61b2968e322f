use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use weft_core::{create_root, signal};
use weft_dom::{Event, Node};
use weft_runtime::{
    IntoView, Props, View, create_component, insert, merge_props, render, render_to_string,
    spread, ssr_spread,
};

#[test]
fn typed_access() {
    let props = Props::new()
        .set("name", String::from("Ada"))
        .set("age", 36u32)
        .set("label", "literal");
    assert_eq!(props.get::<String>("name").as_deref(), Some("Ada"));
    assert_eq!(props.get::<u32>("age"), Some(36));
    assert_eq!(props.get::<String>("age"), None);
    assert_eq!(props.get::<&str>("label"), Some("literal"));
    assert_eq!(props.text("label").as_deref(), Some("literal"));
    assert_eq!(props.text("age").as_deref(), Some("36"));
    assert_eq!(props.get::<u32>("missing"), None);
    assert_eq!(props.len(), 3);
}

#[test]
fn getters_are_read_on_access() {
    let count = signal(1);
    let props = Props::new().getter("count", move || count.get());
    assert_eq!(props.get::<i32>("count"), Some(1));
    count.set(5);
    assert_eq!(props.get::<i32>("count"), Some(5));
}

#[test]
fn later_sources_win() {
    let base = Props::new().set("id", "a").set("title", "base");
    let extra = Props::new().set("title", "override").set("role", "note");
    let merged = merge_props(vec![base, extra]);
    assert_eq!(merged.text("id").as_deref(), Some("a"));
    assert_eq!(merged.text("title").as_deref(), Some("override"));
    assert_eq!(merged.names().collect::<Vec<_>>(), ["id", "title", "role"]);
}

#[test]
fn spread_applies_every_binding_kind() {
    let el = Node::element("button");
    let clicks = Rc::new(Cell::new(0));
    let counter = clicks.clone();
    let label = signal(String::from("go"));
    let props = Props::new()
        .set("type", "submit")
        .getter("aria-label", move || label.get())
        .set("class:primary", true)
        .set("style:color", "red")
        .set("prop:value", 7i32)
        .set("hidden", false)
        .on("click", move |_: &Event| counter.set(counter.get() + 1))
        .children(|| "ignored");
    let ((), scope) = create_root(|| spread(&el, props));

    assert_eq!(
        el.outer_html(),
        "<button type=\"submit\" aria-label=\"go\" class=\"primary\" style=\"color: red;\"></button>"
    );
    assert_eq!(el.property_as::<i32>("value"), Some(7));
    el.dispatch_event(&Event::new("click"));
    assert_eq!(clicks.get(), 1);

    label.set("stop".into());
    assert_eq!(el.get_attribute("aria-label").as_deref(), Some("stop"));
    scope.dispose();
    assert_eq!(el.listener_count(), 0);
}

#[test]
fn server_spread_matches_client_spread() {
    let props = || {
        Props::new()
            .set("id", "main")
            .set("class:wide", true)
            .set("class:tall", false)
            .set("style:gap", "1px")
            .set("prop:secret", 1i32)
            .on("click", |_: &Event| {})
    };
    let markup = ssr_spread(props());
    assert_eq!(markup, " id=\"main\" class=\"wide\" style=\"gap: 1px;\"");

    let el = Node::element("div");
    spread(&el, props());
    let host = Node::element("main");
    host.set_inner_html(&format!("<div{markup}></div>"));
    let server = host.first_child().expect("server element");
    assert!(el.is_equal_node(&server));
}

#[test]
fn spread_class_and_style_are_the_toggle_base() {
    let kind = signal(String::from("card"));
    let props = move || {
        Props::new()
            .set("class:on", true)
            .set("style:color", "red")
            .getter("class", move || kind.get())
            .set("style", "margin: 0")
    };
    let markup = ssr_spread(props());
    assert_eq!(markup, " class=\"card on\" style=\"margin: 0; color: red;\"");

    let el = Node::element("div");
    let ((), scope) = create_root(|| spread(&el, props()));
    let host = Node::element("main");
    host.set_inner_html(&format!("<div{markup}></div>"));
    let server = host.first_child().expect("server element");
    assert!(el.is_equal_node(&server), "{}", el.outer_html());

    kind.set("panel".into());
    assert_eq!(el.get_attribute("class").as_deref(), Some("panel on"));
    scope.dispose();
}

fn greeting(props: Props) -> View {
    let name = props.text("name").unwrap_or_default();
    let el = Node::element("p");
    insert(&el, format!("Hello, {name}"), None);
    insert(&el, props.children_view(), None);
    el.into_view()
}

#[test]
fn components_run_once_when_rendered() {
    let calls = Rc::new(Cell::new(0));
    let counted = calls.clone();
    let view = create_component(
        move |props: Props| {
            counted.set(counted.get() + 1);
            greeting(props)
        },
        Props::new().set("name", "Ada").children(|| "!"),
    );
    assert_eq!(calls.get(), 0);

    let host = Node::element("div");
    let scope = render(move || view, &host);
    assert_eq!(calls.get(), 1);
    assert_eq!(host.inner_html(), "<p>Hello, Ada!</p>");
    scope.dispose();
}

#[test]
fn components_render_on_the_server() {
    let html = render_to_string(|| create_component(greeting, Props::new().set("name", "Bo")));
    assert_eq!(html, "<p>Hello, Bo</p>");
}
