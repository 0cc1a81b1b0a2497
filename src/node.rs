// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! The node sum type every tree in this crate is made of.
//!
//! Nodes are immutable. Children sit behind `Rc`, so rebuilding a tree after
//! an insertion only allocates the spine from the root down to the changed
//! node; every untouched subtree is shared between the old and new tree.
//!
//! Walks (`nodes`, `values`, `paths`, `depth`) and dropping use explicit
//! stacks so a badly skewed tree cannot exhaust the call stack.

use std::collections::VecDeque;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::error::Result;
use crate::error::TreeError;
use crate::kleenean::Kleenean;

/// Child positions from the root down to a node. The root is `[]`.
pub type Path = SmallVec<[u32; 8]>;

/// A value-carrying unit of a tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node<V> {
    /// No value, no children.
    Empty,
    /// Exactly one value, no children.
    Leaf(V),
    /// Zero or one value plus any number of ordered children.
    Branch(Option<V>, Vec<Rc<Node<V>>>),
}

/// Order in which [`Node::values`] yields values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traversal {
    /// Children fully before self (post-order).
    DepthFirst,
    /// Level by level, self before children.
    BreadthFirst,
    /// Self before children, depth first.
    PreOrder,
    /// First child, then self, then the remaining children.
    InOrder,
}

impl<V> Default for Node<V> {
    fn default() -> Node<V> {
        return Node::Empty;
    }
}

/// Unlinks uniquely owned children onto a heap stack so dropping a deep
/// chain does not recurse once per level. Shared children are left to
/// their other owners.
impl<V> Drop for Node<V> {
    fn drop(&mut self) {
        let Node::Branch(_, children) = self else {
            return;
        };
        let mut stack = std::mem::take(children);
        while let Some(child) = stack.pop() {
            if let Ok(mut node) = Rc::try_unwrap(child) {
                if let Node::Branch(_, grandchildren) = &mut node {
                    stack.append(grandchildren);
                }
            }
        }
    }
}

impl<V> Node<V> {
    pub fn leaf(value: V) -> Node<V> {
        return Node::Leaf(value);
    }

    pub fn branch(value: Option<V>, children: Vec<Node<V>>) -> Node<V> {
        return Node::Branch(value, children.into_iter().map(Rc::new).collect());
    }

    pub fn value(&self) -> Option<&V> {
        return match self {
            Node::Empty => None,
            Node::Leaf(v) => Some(v),
            Node::Branch(v, _) => v.as_ref(),
        };
    }

    /// Children in order. Empty for leaves and empty nodes.
    pub fn children(&self) -> &[Rc<Node<V>>] {
        return match self {
            Node::Branch(_, children) => children,
            _ => &[],
        };
    }

    pub fn child(&self, index: usize) -> Option<&Node<V>> {
        return self.children().get(index).map(|c| c.as_ref());
    }

    pub fn is_leaf(&self) -> bool {
        return matches!(self, Node::Leaf(_));
    }

    pub fn is_empty(&self) -> bool {
        return matches!(self, Node::Empty);
    }

    /// Number of nodes in this subtree that carry a value.
    pub fn size(&self) -> usize {
        return self.nodes().filter(|n| n.value().is_some()).count();
    }

    /// 0 for Empty, 1 for a leaf, `1 + max(child depth)` for a branch.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, level)) = stack.pop() {
            match node {
                Node::Empty => {}
                Node::Leaf(_) => deepest = deepest.max(level),
                Node::Branch(_, children) => {
                    deepest = deepest.max(level);
                    for child in children {
                        stack.push((child.as_ref(), level + 1));
                    }
                }
            }
        }
        return deepest;
    }

    /// All nodes of this subtree, self first, depth first.
    pub fn nodes(&self) -> Nodes<'_, V> {
        return Nodes { stack: vec![self] };
    }

    /// Every node paired with its path relative to `self`, in pre-order.
    pub fn paths(&self) -> Paths<'_, V> {
        return Paths {
            stack: vec![(Path::new(), self)],
        };
    }

    /// Values in the requested order. Each call starts a fresh walk.
    pub fn values(&self, order: Traversal) -> Values<'_, V> {
        let mut values = Values {
            order,
            stack: Vec::new(),
            queue: VecDeque::new(),
        };
        match order {
            Traversal::BreadthFirst => values.queue.push_back(self),
            _ => values.stack.push(Frame::Visit(self)),
        }
        return values;
    }

    /// Values of leaves only, left to right.
    pub fn leaves(&self) -> impl Iterator<Item = &V> + '_ {
        return self.nodes().filter_map(|n| match n {
            Node::Leaf(v) => Some(v),
            _ => None,
        });
    }

    /// First node (pre-order) satisfying `pred`.
    pub fn find(&self, pred: impl Fn(&Node<V>) -> bool) -> Option<&Node<V>> {
        return self.nodes().find(|n| pred(n));
    }

    /// Every node (pre-order) satisfying `pred`.
    pub fn filter(&self, pred: impl Fn(&Node<V>) -> bool) -> Vec<&Node<V>> {
        return self.nodes().filter(|n| pred(n)).collect();
    }

    /// Path of the first node (pre-order) satisfying `pred`.
    pub fn path_to(&self, pred: impl Fn(&Node<V>) -> bool) -> Option<Path> {
        return self.paths().find(|(_, n)| pred(n)).map(|(path, _)| path);
    }

    pub fn at_path(&self, path: &[u32]) -> Option<&Node<V>> {
        let mut current = self;
        for &i in path {
            current = current.child(i as usize)?;
        }
        return Some(current);
    }
}

impl<V: Clone> Node<V> {
    /// Add `child` as the last child. A leaf is promoted to a one-child
    /// branch keeping its value.
    pub fn with_child(&self, child: Node<V>) -> Node<V> {
        return match self {
            Node::Empty => Node::Branch(None, vec![Rc::new(child)]),
            Node::Leaf(v) => Node::Branch(Some(v.clone()), vec![Rc::new(child)]),
            Node::Branch(v, children) => {
                let mut children = children.clone();
                children.push(Rc::new(child));
                Node::Branch(v.clone(), children)
            }
        };
    }

    /// Rebuild the tree with the node at `path` swapped for `replacement`.
    ///
    /// Only the ancestors of the target are reallocated. A path that leads
    /// nowhere leaves the tree unchanged.
    pub fn replace_at(&self, path: &[u32], replacement: Node<V>) -> Result<Node<V>> {
        if matches!(replacement, Node::Leaf(_) | Node::Empty) {
            return Err(TreeError::InvalidReplacement);
        }
        let mut spine = Vec::with_capacity(path.len());
        let mut current = self;
        for &i in path {
            match current.child(i as usize) {
                Some(next) => {
                    spine.push((current, i as usize));
                    current = next;
                }
                None => return Ok(self.clone()),
            }
        }

        let mut rebuilt = replacement;
        while let Some((ancestor, i)) = spine.pop() {
            let Node::Branch(value, children) = ancestor else {
                unreachable!("only branches have children");
            };
            let mut children = children.clone();
            children[i] = Rc::new(rebuilt);
            rebuilt = Node::Branch(value.clone(), children);
        }
        return Ok(rebuilt);
    }

    /// Rebuild the tree with the first node (pre-order) for which
    /// `same(node, target)` holds swapped for `replacement`.
    ///
    /// No match leaves the tree unchanged.
    pub fn replace_node(
        &self,
        target: &Node<V>,
        replacement: Node<V>,
        same: impl Fn(&Node<V>, &Node<V>) -> bool,
    ) -> Result<Node<V>> {
        if matches!(replacement, Node::Leaf(_) | Node::Empty) {
            return Err(TreeError::InvalidReplacement);
        }
        return match self.path_to(|n| same(n, target)) {
            Some(path) => self.replace_at(&path, replacement),
            None => Ok(self.clone()),
        };
    }
}

impl<V: PartialEq> Node<V> {
    /// Plain value equality. Unknown when either side has no value.
    pub fn compare_values(&self, other: &Node<V>) -> Kleenean {
        return match (self.value(), other.value()) {
            (Some(a), Some(b)) => Kleenean::from(a == b),
            _ => Kleenean::Unknown,
        };
    }

    pub fn includes(&self, node: &Node<V>) -> bool {
        return self.nodes().any(|n| n == node);
    }

    pub fn includes_value(&self, value: &V) -> bool {
        return self.nodes().any(|n| n.value() == Some(value));
    }
}

/// Pre-order node iterator.
pub struct Nodes<'a, V> {
    stack: Vec<&'a Node<V>>,
}

impl<'a, V> Iterator for Nodes<'a, V> {
    type Item = &'a Node<V>;

    fn next(&mut self) -> Option<&'a Node<V>> {
        let node = self.stack.pop()?;
        for child in node.children().iter().rev() {
            self.stack.push(child.as_ref());
        }
        return Some(node);
    }
}

/// Pre-order iterator over `(path, node)` pairs.
pub struct Paths<'a, V> {
    stack: Vec<(Path, &'a Node<V>)>,
}

impl<'a, V> Iterator for Paths<'a, V> {
    type Item = (Path, &'a Node<V>);

    fn next(&mut self) -> Option<(Path, &'a Node<V>)> {
        let (path, node) = self.stack.pop()?;
        for (i, child) in node.children().iter().enumerate().rev() {
            let mut child_path = path.clone();
            child_path.push(i as u32);
            self.stack.push((child_path, child.as_ref()));
        }
        return Some((path, node));
    }
}

enum Frame<'a, V> {
    Visit(&'a Node<V>),
    Emit(&'a V),
}

/// Value iterator driven by a [`Traversal`].
pub struct Values<'a, V> {
    order: Traversal,
    stack: Vec<Frame<'a, V>>,
    queue: VecDeque<&'a Node<V>>,
}

impl<'a, V> Values<'a, V> {
    fn next_breadth_first(&mut self) -> Option<&'a V> {
        while let Some(node) = self.queue.pop_front() {
            for child in node.children() {
                self.queue.push_back(child.as_ref());
            }
            if let Some(v) = node.value() {
                return Some(v);
            }
        }
        return None;
    }

    /// Expand a node into frames so that popping yields the right order.
    fn expand(&mut self, node: &'a Node<V>) {
        let children = node.children();
        match self.order {
            Traversal::DepthFirst => {
                if let Some(v) = node.value() {
                    self.stack.push(Frame::Emit(v));
                }
                for child in children.iter().rev() {
                    self.stack.push(Frame::Visit(child.as_ref()));
                }
            }
            Traversal::PreOrder => {
                for child in children.iter().rev() {
                    self.stack.push(Frame::Visit(child.as_ref()));
                }
                if let Some(v) = node.value() {
                    self.stack.push(Frame::Emit(v));
                }
            }
            Traversal::InOrder => {
                for child in children.iter().skip(1).rev() {
                    self.stack.push(Frame::Visit(child.as_ref()));
                }
                if let Some(v) = node.value() {
                    self.stack.push(Frame::Emit(v));
                }
                if let Some(first) = children.first() {
                    self.stack.push(Frame::Visit(first.as_ref()));
                }
            }
            Traversal::BreadthFirst => unreachable!("breadth first uses the queue"),
        }
    }
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        if self.order == Traversal::BreadthFirst {
            return self.next_breadth_first();
        }
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Emit(v) => return Some(v),
                Frame::Visit(node) => self.expand(node),
            }
        }
        return None;
    }
}
