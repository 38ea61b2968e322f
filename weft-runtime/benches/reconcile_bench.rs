use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use weft_dom::{Node, h, text};
use weft_runtime::reconcile;

fn rows(count: usize) -> Vec<Node> {
    (0..count)
        .map(|i| h("li", [], [text(i.to_string())]))
        .collect()
}

fn mounted(nodes: &[Node]) -> Node {
    let list = Node::element("ul");
    for node in nodes {
        list.append_child(node);
    }
    list
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");
    group.sample_size(30);
    for &count in &[100usize, 1_000] {
        let old = rows(count);

        group.bench_with_input(BenchmarkId::new("reverse", count), &old, |b, old| {
            let reversed: Vec<Node> = old.iter().rev().cloned().collect();
            b.iter(|| {
                let list = mounted(old);
                reconcile(&list, old, &reversed, None);
            });
        });

        group.bench_with_input(BenchmarkId::new("swap_rows", count), &old, |b, old| {
            let mut swapped = old.clone();
            swapped.swap(1, count - 2);
            b.iter(|| {
                let list = mounted(old);
                reconcile(&list, old, &swapped, None);
            });
        });

        group.bench_with_input(BenchmarkId::new("remove_every_tenth", count), &old, |b, old| {
            let kept: Vec<Node> = old
                .iter()
                .enumerate()
                .filter(|(i, _)| i % 10 != 0)
                .map(|(_, n)| n.clone())
                .collect();
            b.iter(|| {
                let list = mounted(old);
                reconcile(&list, old, &kept, None);
            });
        });

        group.bench_with_input(BenchmarkId::new("replace_all", count), &old, |b, old| {
            let fresh = rows(count);
            b.iter(|| {
                let list = mounted(old);
                reconcile(&list, old, &fresh, None);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reconcile);
criterion_main!(benches);
