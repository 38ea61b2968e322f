use pretty_assertions::assert_eq;
use weft_dom::{Event, Node, stats};
use weft_e2e::{Card, dom, ssr};
use weft_runtime::{SsrResult, hydrate, render};

const SERVER_CARD: &str = "<div class=\"card active\" style=\"color: red;\">\
    <h1 title=\"Hi\">Hi<!--/$--></h1>\
    <p>Count: <!--$-->3<!--/$--></p>\
    <button>+</button>\
    <ul><li>a<!--/$--></li><li>b<!--/$--></li><!--/$--></ul>\
    </div>";

fn card(items: &[&str]) -> Card {
    Card::new("card", "Hi", 3, items).active(true).tone("red")
}

fn server(html: &SsrResult) -> Node {
    let container = Node::element("main");
    container.set_inner_html(html.as_str());
    container
}

fn fresh(state: Card) -> Node {
    let container = Node::element("main");
    render(move || dom::card(state), &container).dispose();
    container
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

fn child_by_tag(node: &Node, tag: &str) -> Node {
    node.child_nodes()
        .into_iter()
        .find(|child| child.tag() == Some(tag))
        .unwrap_or_else(|| panic!("no <{tag}>"))
}

#[test]
fn server_build_renders_region_markers() {
    assert_eq!(ssr::card(card(&["a", "b"])).as_str(), SERVER_CARD);
}

#[test]
fn client_and_server_builds_render_the_same_tree() {
    let cases = [
        Card::new("card", "Hi", 3, &["a", "b"]).active(true).tone("red"),
        Card::new("card wide", "T", 0, &[]),
        Card::new("active", "x < y", -1, &["only"]).tone("blue"),
    ];
    for state in cases {
        let server = server(&ssr::card(state));
        let client = fresh(state);
        assert!(
            without_comments(&client).is_equal_node(&without_comments(&server)),
            "client {} != server {}",
            client.inner_html(),
            server.inner_html()
        );
    }
}

#[test]
fn hydrating_server_output_creates_nothing() {
    // Templates are parsed on first use.
    fresh(card(&["a", "b"]));

    let container = server(&ssr::card(card(&["a", "b"])));
    let root = container.first_child().expect("server root");
    let state = card(&["a", "b"]);
    let ((scope, hydrated), delta) =
        stats::measure(|| hydrate(move || dom::card(state), &container));
    assert_eq!(delta, stats::MutationStats::default());
    assert_eq!(hydrated.misses, 0);
    assert!(hydrated.claims > 0);
    assert_eq!(container.first_child(), Some(root));
    assert_eq!(container.inner_html(), SERVER_CARD);

    let client = fresh(card(&["a", "b"]));
    assert!(without_comments(&container).is_equal_node(&without_comments(&client)));
    scope.dispose();
}

#[test]
fn hydrated_card_stays_reactive() {
    let container = server(&ssr::card(card(&["a"])));
    let state = card(&["a"]);
    let (scope, _) = hydrate(move || dom::card(state), &container);

    let root = container.first_child().expect("root");
    child_by_tag(&root, "button").dispatch_event(&Event::new("click"));
    assert_eq!(state.count.get(), 4);

    state.kind.set("panel".into());
    state.tone.set(None);
    state.title.set("Bye".into());
    state.items.set(vec!["a".into(), "b".into(), "c".into()]);
    assert_eq!(
        container.inner_html(),
        "<div class=\"panel active\">\
         <h1 title=\"Bye\">Bye<!--/$--></h1>\
         <p>Count: <!--$-->4<!--/$--></p>\
         <button>+</button>\
         <ul><li>a</li><li>b</li><li>c</li><!--/$--></ul>\
         </div>"
    );

    state.active.set(false);
    assert_eq!(root.get_attribute("class").as_deref(), Some("panel"));
    scope.dispose();
}

#[test]
fn mismatched_list_is_rendered_fresh() {
    let container = server(&ssr::card(card(&["a"])));
    let state = card(&["a", "b"]);
    let (scope, hydrated) = hydrate(move || dom::card(state), &container);
    assert!(hydrated.misses > 0);
    assert!(hydrated.claims > 0);

    let client = fresh(card(&["a", "b"]));
    assert!(without_comments(&container).is_equal_node(&without_comments(&client)));
    scope.dispose();
}
