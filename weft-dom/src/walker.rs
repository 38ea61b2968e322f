// weft-dom/src/walker.rs

use crate::Node;

/// Pre-order cursor over the descendants of `root`, yielding only nodes the
/// filter accepts.
pub struct TreeWalker<F> {
    root: Node,
    current: Node,
    filter: F,
}

impl<F: Fn(&Node) -> bool> TreeWalker<F> {
    pub fn new(root: &Node, filter: F) -> Self {
        Self {
            root: root.clone(),
            current: root.clone(),
            filter,
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn current(&self) -> &Node {
        &self.current
    }

    /// Move the cursor. `node` should be inside the walker's root.
    pub fn set_current(&mut self, node: &Node) {
        self.current = node.clone();
    }

    /// Advance to the next accepted node in document order.
    pub fn next_node(&mut self) -> Option<Node> {
        let mut node = self.current.clone();
        loop {
            node = self.following(&node)?;
            if (self.filter)(&node) {
                self.current = node.clone();
                return Some(node);
            }
        }
    }

    fn following(&self, node: &Node) -> Option<Node> {
        if let Some(child) = node.first_child() {
            return Some(child);
        }
        let mut cursor = node.clone();
        loop {
            if cursor == self.root {
                return None;
            }
            if let Some(next) = cursor.next_sibling() {
                return Some(next);
            }
            cursor = cursor.parent()?;
        }
    }
}

impl<F: Fn(&Node) -> bool> Iterator for TreeWalker<F> {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        self.next_node()
    }
}
