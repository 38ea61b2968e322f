use std::cell::RefCell;
use std::rc::Rc;
use weft_core::{Scope, Signal, create_root, effect, on_dispose};

#[test]
fn dispose_runs_cleanups_child_before_parent() {
    let order = Rc::new(RefCell::new(Vec::new()));

    let (_, root) = create_root(|| {
        let outer = order.clone();
        on_dispose(move || outer.borrow_mut().push("root"));
        let order = order.clone();
        effect(move || {
            let inner = order.clone();
            on_dispose(move || inner.borrow_mut().push("effect"));
        });
    });

    root.dispose();
    assert_eq!(&*order.borrow(), &vec!["effect", "root"]);
}

#[test]
fn disposed_scope_stops_effects() {
    let count = Signal::new(0);
    let observed = Rc::new(RefCell::new(Vec::new()));

    let (_, root) = create_root(|| {
        let observed = observed.clone();
        effect(move || observed.borrow_mut().push(count.get()));
    });
    count.set(1);
    root.dispose();
    assert!(!root.is_alive());

    count.set(2);
    assert_eq!(&*observed.borrow(), &vec![0, 1]);
}

#[test]
fn rerun_disposes_nested_effects() {
    let outer = Signal::new(0);
    let inner = Signal::new(0);
    let inner_runs = Rc::new(RefCell::new(0));

    let (_, root) = create_root(|| {
        let inner_runs = inner_runs.clone();
        effect(move || {
            outer.get();
            let inner_runs = inner_runs.clone();
            effect(move || {
                inner.get();
                *inner_runs.borrow_mut() += 1;
            });
        });
    });
    assert_eq!(*inner_runs.borrow(), 1);

    // Re-running the outer effect replaces the nested one instead of stacking.
    outer.set(1);
    assert_eq!(*inner_runs.borrow(), 2);
    inner.set(1);
    assert_eq!(*inner_runs.borrow(), 3);
    root.dispose();
}

#[test]
fn signals_die_with_their_owner() {
    let (sig, root) = create_root(|| Signal::new(5));
    assert_eq!(sig.get(), 5);
    root.dispose();
    assert!(sig.is_disposed());
    // Writes after disposal are ignored rather than panicking.
    sig.set(6);
    assert_eq!(sig.try_with(|v| *v), None);
}

#[test]
fn current_scope_is_visible_inside_root() {
    assert!(Scope::current().is_none());
    let (inside, root) = create_root(Scope::current);
    assert_eq!(inside, Some(root));
    root.dispose();
}
