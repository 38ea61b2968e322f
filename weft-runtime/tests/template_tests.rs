use weft_dom::{Node, stats};
use weft_runtime::{clone, create_svg_template, create_template, walk};

#[test]
fn clones_are_independent_copies() {
    let template = create_template("<div><span>a</span>b</div>");
    let (first, delta) = stats::measure(|| clone(&template));
    let second = clone(&template);
    assert_ne!(first, second);
    assert!(first.is_equal_node(&second));
    assert!(first.parent().is_none());
    assert_eq!(delta.created, 4);
    first.set_attribute("id", "changed");
    assert!(!template.root().has_attribute("id"));
}

#[test]
fn svg_templates_are_in_the_svg_namespace() {
    let template = create_svg_template("<circle r=\"1\"></circle>");
    let circle = clone(&template);
    assert_eq!(circle.tag(), Some("circle"));
    assert!(circle.is_svg());
    assert!(!create_template("<circle></circle>").root().is_svg());
}

#[test]
fn paths_step_through_children_and_siblings() {
    let root = clone(&create_template("<div><h1>t</h1><p>a<!--$--><b></b></p></div>"));
    assert_eq!(walk(&root, "").tag(), Some("div"));
    assert_eq!(walk(&root, "f").tag(), Some("h1"));
    assert_eq!(walk(&root, "fnf").data(), "a");
    assert!(walk(&root, "fnfn").is_comment());
    assert_eq!(walk(&root, "fnfnn").tag(), Some("b"));
}

#[test]
fn marker_steps_skip_rendered_regions() {
    let host = Node::element("div");
    host.set_inner_html("<!--$-->x<i></i><!--$-->y<!--/$--><!--/$--><b></b>");
    assert_eq!(walk(&host, "fn").tag(), Some("b"));
}

#[test]
fn unresolved_paths_give_a_detached_node() {
    let root = clone(&create_template("<p></p>"));
    let missing = walk(&root, "fn");
    assert!(missing.is_comment());
    assert!(missing.parent().is_none());
}
