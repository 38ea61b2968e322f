use pretty_assertions::assert_eq;
use weft_dom::{Node, h, stats, text};
use weft_runtime::reconcile;

fn item(id: &str) -> Node {
    h("li", [("id", id)], [text(id)])
}

fn mount(parent: &Node, ids: &[&str]) -> Vec<Node> {
    ids.iter()
        .map(|id| {
            let node = item(id);
            parent.append_child(&node);
            node
        })
        .collect()
}

fn ids(parent: &Node) -> Vec<String> {
    parent
        .child_nodes()
        .iter()
        .map(|n| n.get_attribute("id").unwrap_or_else(|| n.data()))
        .collect()
}

#[test]
fn removing_from_the_middle_is_one_removal() {
    let list = Node::element("ul");
    let old = mount(&list, &["a", "b", "c"]);
    let new = vec![old[0].clone(), old[2].clone()];
    let ((), delta) = stats::measure(|| reconcile(&list, &old, &new, None));
    assert_eq!(ids(&list), ["a", "c"]);
    assert_eq!(delta.removed, 1);
    assert_eq!(delta.inserted, 0);
    assert_eq!(delta.created, 0);
}

#[test]
fn swapping_two_is_two_inserts() {
    let list = Node::element("ul");
    let old = mount(&list, &["a", "b"]);
    let new = vec![old[1].clone(), old[0].clone()];
    let ((), delta) = stats::measure(|| reconcile(&list, &old, &new, None));
    assert_eq!(ids(&list), ["b", "a"]);
    assert_eq!(delta.inserted, 2);
    assert_eq!(delta.removed, 0);
}

#[test]
fn appends_go_before_the_following_node() {
    let list = Node::element("ul");
    let old = mount(&list, &["a"]);
    let end = Node::comment("/$");
    list.append_child(&end);
    let b = item("b");
    reconcile(&list, &old, &[old[0].clone(), b.clone()], Some(&end));
    assert_eq!(ids(&list), ["a", "b", "/$"]);
    assert_eq!(b.parent(), Some(list.clone()));
}

#[test]
fn prepends_use_the_first_kept_node() {
    let list = Node::element("ul");
    let old = mount(&list, &["c"]);
    let (a, b) = (item("a"), item("b"));
    let ((), delta) = stats::measure(|| {
        reconcile(&list, &old, &[a.clone(), b.clone(), old[0].clone()], None)
    });
    assert_eq!(ids(&list), ["a", "b", "c"]);
    assert_eq!(delta.inserted, 2);
    assert_eq!(delta.removed, 0);
}

#[test]
fn mixed_update_keeps_surviving_nodes() {
    let list = Node::element("ul");
    let old = mount(&list, &["a", "b", "c", "d", "e"]);
    let f = item("f");
    let new = vec![old[4].clone(), old[2].clone(), f.clone(), old[0].clone()];
    let ((), delta) = stats::measure(|| reconcile(&list, &old, &new, None));
    assert_eq!(ids(&list), ["e", "c", "f", "a"]);
    assert_eq!(delta.removed, 2);
    assert_eq!(list.child_nodes(), new);
    assert!(old[1].parent().is_none());
    assert!(old[3].parent().is_none());
}

#[test]
fn clearing_and_filling() {
    let list = Node::element("ul");
    let old = mount(&list, &["a", "b"]);
    reconcile(&list, &old, &[], None);
    assert_eq!(list.child_count(), 0);

    let fresh = vec![item("x"), item("y")];
    reconcile(&list, &[], &fresh, None);
    assert_eq!(ids(&list), ["x", "y"]);
}

#[test]
fn reversal_ends_in_new_order() {
    let list = Node::element("ul");
    let old = mount(&list, &["1", "2", "3", "4", "5", "6"]);
    let new: Vec<Node> = old.iter().rev().cloned().collect();
    let ((), delta) = stats::measure(|| reconcile(&list, &old, &new, None));
    assert_eq!(ids(&list), ["6", "5", "4", "3", "2", "1"]);
    assert_eq!(delta.removed, 0);
    assert_eq!(delta.created, 0);
}
