use std::cell::RefCell;
use std::rc::Rc;
use weft_core::{Signal, batch, computed, create_root, effect, untrack};

#[test]
fn test_signal_and_effect() {
    let count = Signal::new(0);
    // Observed must be Rc<RefCell> to mutate inside the closure
    let observed = Rc::new(RefCell::new(0));

    let (_, root) = create_root(|| {
        let observed_clone = observed.clone();
        effect(move || {
            *observed_clone.borrow_mut() = count.get();
        });
    });

    // Initial effect run should have written 0
    assert_eq!(*observed.borrow(), 0);

    // This set should notify the effect again
    count.set(42);
    assert_eq!(*observed.borrow(), 42);
    root.dispose();
}

#[test]
fn peek_and_untrack_do_not_subscribe() {
    let a = Signal::new(1);
    let b = Signal::new(10);
    let runs = Rc::new(RefCell::new(0));

    let (_, root) = create_root(|| {
        let runs = runs.clone();
        effect(move || {
            *runs.borrow_mut() += 1;
            let _ = a.peek();
            let _ = untrack(|| b.get());
        });
    });
    assert_eq!(*runs.borrow(), 1);

    a.set(2);
    b.set(20);
    assert_eq!(*runs.borrow(), 1);
    root.dispose();
}

#[test]
fn computed_only_notifies_on_change() {
    let count = Signal::new(1);
    let seen: Rc<RefCell<Vec<bool>>> = Rc::new(RefCell::new(vec![]));

    let (_, root) = create_root(|| {
        let is_even = computed(move || count.get() % 2 == 0);
        let seen = seen.clone();
        effect(move || seen.borrow_mut().push(is_even.get()));
    });
    assert_eq!(&*seen.borrow(), &vec![false]);

    count.set(3);
    assert_eq!(&*seen.borrow(), &vec![false], "parity unchanged");

    count.set(4);
    assert_eq!(&*seen.borrow(), &vec![false, true]);
    root.dispose();
}

#[test]
fn batch_coalesces_writes() {
    let first = Signal::new("a".to_string());
    let last = Signal::new("b".to_string());
    let runs = Rc::new(RefCell::new(Vec::new()));

    let (_, root) = create_root(|| {
        let runs = runs.clone();
        effect(move || runs.borrow_mut().push(format!("{} {}", first.get(), last.get())));
    });

    batch(|| {
        first.set("x".into());
        last.set("y".into());
    });
    assert_eq!(&*runs.borrow(), &vec!["a b".to_string(), "x y".to_string()]);
    root.dispose();
}

#[test]
fn effect_can_write_signals_it_reads() {
    let count = Signal::new(0);
    let seen: Rc<RefCell<Vec<i32>>> = Rc::new(RefCell::new(vec![]));

    let (_, root) = create_root(|| {
        let seen = seen.clone();
        effect(move || {
            let v = count.get();
            seen.borrow_mut().push(v);
            if v < 3 {
                count.set(v + 1);
            }
        });
    });

    assert_eq!(&*seen.borrow(), &vec![0, 1, 2, 3]);
    root.dispose();
}

#[test]
fn update_mutates_in_place() {
    let items = Signal::new(vec![1, 2]);
    let lens = Rc::new(RefCell::new(Vec::new()));
    let (_, root) = create_root(|| {
        let lens = lens.clone();
        effect(move || lens.borrow_mut().push(items.with(Vec::len)));
    });
    items.update(|v| v.push(3));
    assert_eq!(&*lens.borrow(), &vec![2, 3]);
    root.dispose();
}
