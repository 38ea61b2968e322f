//! Hand-written templates in the shape the DOM and SSR targets emit for
//!
//! ```text
//! <div class="card" title={title()}>
//!     <h1>Hello</h1><p>Count: {count()}</p><ul>{items()}</ul>
//! </div>
//! ```
//!
//! Output generated by the compiler itself is exercised in `weft-e2e`.

use pretty_assertions::assert_eq;
use weft_core::{Signal, signal};
use weft_dom::{Node, stats};
use weft_runtime::{
    HydrationStats, SsrResult, Template, attr, clone, create_template, hydrate, insert,
    insert_at_marker, render, ssr, ssr_attr, ssr_child, walk,
};

thread_local! {
    static APP: Template = create_template(
        "<div class=\"card\"><h1>Hello</h1><p>Count: <!--$--></p><ul></ul></div>"
    );
    static ITEM: Template = create_template("<li></li>");
}

const APP_SSR: &[&str] = &[
    "<div class=\"card\"",
    "><h1>Hello</h1><p>Count: <!--$-->",
    "</p><ul>",
    "</ul></div>",
];
const ITEM_SSR: &[&str] = &["<li>", "</li>"];

#[derive(Clone, Copy)]
struct State {
    title: Signal<String>,
    count: Signal<i32>,
    items: Signal<Vec<&'static str>>,
}

fn state(title: &str, count: i32, items: Vec<&'static str>) -> State {
    State {
        title: signal(title.to_string()),
        count: signal(count),
        items: signal(items),
    }
}

fn item(label: &'static str) -> Node {
    let el = ITEM.with(clone);
    insert(&el, label, None);
    el
}

fn app(state: State) -> Node {
    let el = APP.with(clone);
    let m = walk(&el, "fnfn");
    let el_2 = walk(&el, "fnn");
    attr(&el, "title", move || state.title.get());
    insert_at_marker(&m, move || state.count.get());
    insert(
        &el_2,
        move || state.items.get().into_iter().map(item).collect::<Vec<_>>(),
        None,
    );
    el
}

fn app_ssr(title: &str, count: i32, items: &[&'static str]) -> SsrResult {
    ssr(
        APP_SSR,
        vec![
            ssr_attr("title", title),
            ssr_child(count),
            ssr_child(
                items
                    .iter()
                    .map(|label| ssr(ITEM_SSR, vec![ssr_child(*label)]))
                    .collect::<Vec<_>>(),
            ),
        ],
    )
}

fn warm() {
    APP.with(|_| ());
    ITEM.with(|_| ());
}

/// Deep copy without comment nodes.
fn without_comments(node: &Node) -> Node {
    let copy = node.clone_node(true);
    strip(&copy);
    copy
}

fn strip(node: &Node) {
    for child in node.child_nodes() {
        if child.is_comment() {
            child.remove();
        } else {
            strip(&child);
        }
    }
}

fn server(html: &SsrResult) -> Node {
    let container = Node::element("main");
    container.set_inner_html(html.as_str());
    container
}

#[test]
fn server_markup_has_region_markers() {
    let html = app_ssr("Hi", 3, &["a", "b"]);
    assert_eq!(
        html.as_str(),
        "<div class=\"card\" title=\"Hi\"><h1>Hello</h1><p>Count: <!--$-->3<!--/$--></p>\
         <ul><li>a<!--/$--></li><li>b<!--/$--></li><!--/$--></ul></div>"
    );
}

#[test]
fn hydrating_matching_markup_creates_nothing() {
    warm();
    let container = server(&app_ssr("Hi", 3, &["a", "b"]));
    let root = container.first_child().expect("server root");
    let s = state("Hi", 3, vec!["a", "b"]);

    let ((scope, hydrated), delta) = stats::measure(|| hydrate(move || app(s), &container));
    assert_eq!(delta, stats::MutationStats::default());
    assert_eq!(hydrated, HydrationStats { claims: 8, misses: 0 });
    assert_eq!(container.first_child(), Some(root));

    let fresh = Node::element("main");
    let fresh_scope = render(move || app(state("Hi", 3, vec!["a", "b"])), &fresh);
    assert!(without_comments(&container).is_equal_node(&without_comments(&fresh)));

    scope.dispose();
    fresh_scope.dispose();
}

#[test]
fn hydrated_regions_stay_reactive() {
    warm();
    let container = server(&app_ssr("Hi", 3, &["a"]));
    let s = state("Hi", 3, vec!["a"]);
    let (scope, _) = hydrate(move || app(s), &container);

    s.count.set(4);
    s.title.set("Bye".into());
    s.items.set(vec!["a", "b", "c"]);
    assert_eq!(
        container.inner_html(),
        "<div class=\"card\" title=\"Bye\"><h1>Hello</h1><p>Count: <!--$-->4<!--/$--></p>\
         <ul><li>a</li><li>b</li><li>c</li><!--/$--></ul></div>"
    );
    scope.dispose();
}

#[test]
fn mismatched_region_is_rendered_fresh() {
    warm();
    let container = server(&app_ssr("Hi", 3, &["a"]));
    let s = state("Hi", 3, vec!["a", "b"]);
    let (scope, hydrated) = hydrate(move || app(s), &container);
    assert!(hydrated.misses > 0);
    assert!(hydrated.claims > 0);

    let fresh = Node::element("main");
    let fresh_scope = render(move || app(state("Hi", 3, vec!["a", "b"])), &fresh);
    assert!(without_comments(&container).is_equal_node(&without_comments(&fresh)));

    scope.dispose();
    fresh_scope.dispose();
}

#[test]
fn differing_text_is_patched_in_place() {
    warm();
    let container = server(&app_ssr("Hi", 3, &[]));
    let s = state("Hi", 5, vec![]);
    let (scope, hydrated) = hydrate(move || app(s), &container);
    assert_eq!(hydrated.misses, 0);
    assert_eq!(
        container.inner_html(),
        "<div class=\"card\" title=\"Hi\"><h1>Hello</h1><p>Count: <!--$-->5<!--/$--></p>\
         <ul><!--/$--></ul></div>"
    );
    scope.dispose();
}

#[test]
fn walk_paths_skip_server_regions() {
    let container = server(&app_ssr("Hi", 3, &["a"]));
    let root = container.first_child().expect("root");
    let p = walk(&root, "fn");
    let marker = walk(&p, "fn");
    assert!(marker.is_comment());
    // Past the marker's region there is nothing left in `<p>`.
    let past = walk(&p, "fnn");
    assert!(past.parent().is_none());
    assert_eq!(walk(&root, "fnn").tag(), Some("ul"));
}
