use std::collections::HashMap;

use weft_dom::Node;

/// Turn the children `old` of `parent` into `new` with few moves, leaving
/// nodes present in both in place where possible. `after` is the node that
/// follows the range, or `None` when the range ends the parent.
///
/// Every node of `old` must be a child of `parent`, and neither list may
/// hold the same node twice. Violating that leaves the tree in an
/// unspecified order.
pub fn reconcile(parent: &Node, old: &[Node], new: &[Node], after: Option<&Node>) {
    let mut a = old.to_vec();
    let b = new;
    let b_len = b.len();
    let (mut a_start, mut a_end) = (0, a.len());
    let (mut b_start, mut b_end) = (0, b_len);
    let mut map: Option<HashMap<Node, usize>> = None;

    while a_start < a_end || b_start < b_end {
        if a_end == a_start {
            // Old range used up: insert the rest of the new range.
            let reference = if b_end < b_len {
                if b_start > 0 {
                    b[b_start - 1].next_sibling()
                } else {
                    Some(b[b_end].clone())
                }
            } else {
                after.cloned()
            };
            tracing::trace!(count = b_end - b_start, "reconcile: bulk insert");
            while b_start < b_end {
                parent.insert_before(&b[b_start], reference.as_ref());
                b_start += 1;
            }
        } else if b_end == b_start {
            // New range used up: drop what is left of the old one.
            tracing::trace!(count = a_end - a_start, "reconcile: bulk removal");
            while a_start < a_end {
                let node = &a[a_start];
                if map.as_ref().is_none_or(|m| !m.contains_key(node)) {
                    node.remove();
                }
                a_start += 1;
            }
        } else if a[a_start] == b[b_start] {
            a_start += 1;
            b_start += 1;
        } else if a[a_end - 1] == b[b_end - 1] {
            a_end -= 1;
            b_end -= 1;
        } else if a[a_start] == b[b_end - 1] && b[b_start] == a[a_end - 1] {
            tracing::trace!("reconcile: swap");
            a_end -= 1;
            let tail = a[a_end].next_sibling();
            let head = a[a_start].next_sibling();
            parent.insert_before(&b[b_start], head.as_ref());
            a_start += 1;
            b_start += 1;
            b_end -= 1;
            parent.insert_before(&b[b_end], tail.as_ref());
            a[a_end] = b[b_end].clone();
        } else {
            let map = map.get_or_insert_with(|| {
                (b_start..b_end).map(|i| (b[i].clone(), i)).collect()
            });
            match map.get(&a[a_start]).copied() {
                Some(index) if b_start < index && index < b_end => {
                    // Length of the run of old nodes that stays contiguous
                    // in the new order.
                    let mut i = a_start;
                    let mut sequence = 1;
                    while i + 1 < a_end && i + 1 < b_end {
                        i += 1;
                        match map.get(&a[i]) {
                            Some(&t) if t == index + sequence => sequence += 1,
                            _ => break,
                        }
                    }
                    if sequence > index - b_start {
                        let node = a[a_start].clone();
                        while b_start < index {
                            parent.insert_before(&b[b_start], Some(&node));
                            b_start += 1;
                        }
                    } else {
                        parent.insert_before(&b[b_start], Some(&a[a_start]));
                        a[a_start].remove();
                        a_start += 1;
                        b_start += 1;
                    }
                }
                Some(_) => a_start += 1,
                None => {
                    a[a_start].remove();
                    a_start += 1;
                }
            }
        }
    }
}
