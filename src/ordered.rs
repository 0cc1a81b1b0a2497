// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Ordered binary trees built by merging.
//!
//! There is no structural key here: a value's place is decided purely by
//! the order. Each insertion resolves into one of five cases against the
//! two children `L` and `R` of the current branch:
//!
//! | Case | Condition                          | Result                  |
//! |------|------------------------------------|-------------------------|
//! | 1    | X overlaps L                       | `[merge(L, X), R]`      |
//! | 2    | X overlaps R                       | `[L, merge(R, X)]`      |
//! | 3    | L < X < R                          | `[merge(L, X), R]`      |
//! | 4    | L < X, X not before R              | `[tree, X]`             |
//! | 5    | X not after L                      | `[X, tree]`             |
//!
//! Overlapping ranges are merged rather than placed side by side, so an
//! in-order walk of the leaves is non-decreasing after every insertion.
//!
//! Branches may carry a value too. In case 3 a valued branch sends X to the
//! side of its own value X belongs on, keeping `(L, value, R)` sorted.
//!
//! A subtree X with several values is only moved as a unit when it lies
//! wholly on one side of every boundary it meets. If it reaches across the
//! split between L and R, or across a branch value, its values are merged
//! one at a time from that point down.
//!
//! Merging walks down with an explicit spine and rebuilds bottom-up, so a
//! skewed tree costs heap, not call stack.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::error::Result;
use crate::error::TreeError;
use crate::kleenean::Kleenean;
use crate::mptt::IndexedTree;
use crate::mptt::build_index;
use crate::node::Node;
use crate::node::Traversal;
use crate::order::NaturalOrder;
use crate::order::OrderPolicy;
use crate::order::is_ordered;
use crate::order::is_overlap;
use crate::order::relation;
use crate::policy::IdentityPolicy;
use crate::policy::TreeBuilder;

/// Which of the five merge cases applies to `x` against a binary branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeCase {
    OverlapsLeft,
    OverlapsRight,
    Between,
    After,
    Before,
}

/// Classify `x` against the children `left` and `right`.
pub fn classify<V, O: OrderPolicy<V>>(
    order: &O,
    left: &Node<V>,
    right: &Node<V>,
    x: &Node<V>,
) -> MergeCase {
    if is_overlap(order, x, left) {
        return MergeCase::OverlapsLeft;
    }
    if is_overlap(order, x, right) {
        return MergeCase::OverlapsRight;
    }
    if !is_ordered(order, left, x).is_true() {
        return MergeCase::Before;
    }
    if is_ordered(order, x, right).is_true() {
        return MergeCase::Between;
    }
    return MergeCase::After;
}

/// Two nodes side by side, smaller first.
fn pair<V, O: OrderPolicy<V>>(order: &O, a: Node<V>, b: Node<V>) -> Node<V> {
    return match is_ordered(order, &a, &b) {
        Kleenean::False => Node::branch(None, vec![b, a]),
        _ => Node::branch(None, vec![a, b]),
    };
}

/// True when `node` can be merged as a whole: every branch has exactly two
/// non-empty children and the in-order walk is sorted.
fn is_well_formed<V, O: OrderPolicy<V>>(order: &O, node: &Node<V>) -> bool {
    let binary = node.nodes().all(|n| match n {
        Node::Branch(_, children) => children.len() == 2 && children.iter().all(|c| !c.is_empty()),
        _ => true,
    });
    if !binary {
        return false;
    }
    let mut values = node.values(Traversal::InOrder);
    let Some(mut previous) = values.next() else {
        return true;
    };
    for value in values {
        if order.compare(previous, value) == Ordering::Greater {
            return false;
        }
        previous = value;
    }
    return true;
}

/// Merge `x` into `tree`, returning the new tree.
///
/// A well-formed `x` is merged whole where it fits between existing values.
/// Anything else is taken apart and its values merged one at a time.
pub fn merge<V: Clone, O: OrderPolicy<V>>(order: &O, tree: &Node<V>, x: Node<V>) -> Result<Node<V>> {
    if x.is_empty() {
        return Ok(tree.clone());
    }
    if !is_well_formed(order, &x) {
        return merge_values(order, tree, &x);
    }
    return merge_sorted(order, tree, x);
}

fn merge_values<V: Clone, O: OrderPolicy<V>>(order: &O, tree: &Node<V>, x: &Node<V>) -> Result<Node<V>> {
    let mut acc = tree.clone();
    for value in x.values(Traversal::PreOrder) {
        acc = merge_sorted(order, &acc, Node::Leaf(value.clone()))?;
    }
    return Ok(acc);
}

enum Side {
    Left,
    Right,
}

/// A branch on the way down, minus the child being rebuilt.
struct Spine<V> {
    value: Option<V>,
    other: Rc<Node<V>>,
    side: Side,
}

/// Walks down recording the spine, then rebuilds it bottom-up, sharing the
/// untouched sibling at every level.
fn merge_sorted<V: Clone, O: OrderPolicy<V>>(order: &O, tree: &Node<V>, x: Node<V>) -> Result<Node<V>> {
    let single = x.size() == 1;
    let mut spine: Vec<Spine<V>> = Vec::new();
    let mut current = tree;
    let merged = loop {
        let (value, left, right) = match current {
            Node::Empty => break x,
            Node::Leaf(_) => match x {
                // Merge the leaf into x instead; a single value never swaps back.
                Node::Branch(..) => break merge_sorted(order, &x, current.clone())?,
                _ => break pair(order, current.clone(), x),
            },
            Node::Branch(value, children) => {
                let [left, right] = children.as_slice() else {
                    return Err(TreeError::UnsupportedArity { arity: children.len() });
                };
                (value, left, right)
            }
        };
        let side = match classify(order, left, right, &x) {
            MergeCase::OverlapsLeft if single || is_ordered(order, &x, right).is_true() => Side::Left,
            MergeCase::OverlapsRight if single || is_ordered(order, left, &x).is_true() => Side::Right,
            // X reaches across the split between L and R.
            MergeCase::OverlapsLeft | MergeCase::OverlapsRight => {
                break merge_values(order, current, &x)?;
            }
            MergeCase::Between => match value {
                None => Side::Left,
                Some(v) => match relation(order, x.values(Traversal::PreOrder), [v]) {
                    Kleenean::True => Side::Left,
                    Kleenean::False => Side::Right,
                    // X straddles the branch value.
                    Kleenean::Unknown => break merge_values(order, current, &x)?,
                },
            },
            MergeCase::After => break Node::branch(None, vec![current.clone(), x]),
            MergeCase::Before => break Node::branch(None, vec![x, current.clone()]),
        };
        let (next, other) = match side {
            Side::Left => (left, right),
            Side::Right => (right, left),
        };
        spine.push(Spine {
            value: value.clone(),
            other: Rc::clone(other),
            side,
        });
        current = next.as_ref();
    };

    let mut rebuilt = merged;
    while let Some(level) = spine.pop() {
        let children = match level.side {
            Side::Left => vec![Rc::new(rebuilt), level.other],
            Side::Right => vec![level.other, Rc::new(rebuilt)],
        };
        rebuilt = Node::Branch(level.value, children);
    }
    return Ok(rebuilt);
}

/// Builder for binary trees kept in order by `O`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BinaryBuilder<O> {
    order: O,
}

impl<O> BinaryBuilder<O> {
    pub fn new(order: O) -> BinaryBuilder<O> {
        return BinaryBuilder { order };
    }

    pub fn order(&self) -> &O {
        return &self.order;
    }

    /// The first two children, ordered, with `value` between them.
    fn seed<V: Clone>(&self, value: Option<V>, first: Node<V>, second: Node<V>) -> Result<Node<V>>
    where
        O: OrderPolicy<V>,
    {
        let order = &self.order;
        let (first, second) = match is_ordered(order, &first, &second) {
            Kleenean::False => (second, first),
            _ => (first, second),
        };
        let around = match &value {
            None => is_ordered(order, &first, &second),
            Some(v) => relation(order, first.values(Traversal::PreOrder), [v])
                .and(relation(order, [v], second.values(Traversal::PreOrder))),
        };
        if around.is_true() && is_well_formed(order, &first) && is_well_formed(order, &second) {
            return Ok(Node::branch(value, vec![first, second]));
        }
        let mut tree = merge(order, &Node::Empty, first)?;
        tree = merge(order, &tree, second)?;
        if let Some(v) = value {
            tree = merge(order, &tree, Node::Leaf(v))?;
        }
        return Ok(tree);
    }
}

impl<V: Clone + PartialEq, O: OrderPolicy<V>> TreeBuilder<V> for BinaryBuilder<O> {
    /// Empties are dropped first. Two children already in order, with
    /// `value` (if any) between them, form a branch as given. Otherwise
    /// everything is merged into a fresh tree. Further children are merged
    /// in one at a time.
    fn build_tree(&self, value: Option<V>, children: Vec<Node<V>>) -> Result<Node<V>> {
        let children: Vec<Node<V>> = children.into_iter().filter(|c| !c.is_empty()).collect();
        let arity = children.len();
        let mut children = children.into_iter();
        let (Some(first), Some(second)) = (children.next(), children.next()) else {
            return Err(TreeError::UnsupportedArity { arity });
        };
        let mut tree = self.seed(value, first, second)?;
        for extra in children {
            tree = merge(&self.order, &tree, extra)?;
        }
        return Ok(tree);
    }

    /// Descends into whichever child `value` overlaps, stopping at the
    /// deepest node that would absorb it.
    fn locate_attachment_point<'a>(&self, tree: &'a Node<V>, value: &V) -> Option<&'a Node<V>> {
        if tree.is_empty() {
            return None;
        }
        let candidate = Node::Leaf(value.clone());
        let mut current = tree;
        loop {
            let [left, right] = current.children() else {
                return Some(current);
            };
            if is_overlap(&self.order, &candidate, left) {
                current = left.as_ref();
            } else if is_overlap(&self.order, &candidate, right) {
                current = right.as_ref();
            } else {
                return Some(current);
            }
        }
    }

    fn nodes_equivalent(&self, x: &Node<V>, y: &Node<V>) -> bool {
        return x == y;
    }
}

/// A binary tree whose in-order walk is sorted by `O`.
///
/// Immutable: every insertion returns a new tree sharing untouched
/// subtrees with the old one.
#[derive(Clone, Debug)]
pub struct OrderedTree<V, O = NaturalOrder> {
    builder: BinaryBuilder<O>,
    root: Node<V>,
}

impl<V: Clone + PartialEq + Ord> OrderedTree<V, NaturalOrder> {
    pub fn empty() -> OrderedTree<V, NaturalOrder> {
        return OrderedTree::new(NaturalOrder);
    }
}

impl<V: Clone + PartialEq, O: OrderPolicy<V> + Clone> OrderedTree<V, O> {
    pub fn new(order: O) -> OrderedTree<V, O> {
        return OrderedTree {
            builder: BinaryBuilder::new(order),
            root: Node::Empty,
        };
    }

    pub fn from_values(order: O, values: impl IntoIterator<Item = V>) -> Result<OrderedTree<V, O>> {
        let mut tree = OrderedTree::new(order);
        for value in values {
            tree = tree.insert(value)?;
        }
        return Ok(tree);
    }

    pub fn insert(&self, value: V) -> Result<OrderedTree<V, O>> {
        let leaf = self.builder.build_leaf(value);
        return self.insert_node(leaf);
    }

    /// Merge a prebuilt subtree in. It must carry at least one value.
    pub fn insert_node(&self, node: Node<V>) -> Result<OrderedTree<V, O>> {
        if node.size() == 0 {
            return Err(TreeError::ValuelessNode);
        }
        let root = merge(self.builder.order(), &self.root, node)?;
        trace_log!(size = root.size(), depth = root.depth(), "merged into ordered tree");
        return Ok(self.with_root(root));
    }

    /// Fold every value of `other` in, one at a time.
    pub fn merge_tree(&self, other: &OrderedTree<V, O>) -> Result<OrderedTree<V, O>> {
        let mut root = self.root.clone();
        for value in other.root.values(Traversal::InOrder) {
            root = merge(self.builder.order(), &root, Node::Leaf(value.clone()))?;
        }
        return Ok(self.with_root(root));
    }

    fn with_root(&self, root: Node<V>) -> OrderedTree<V, O> {
        return OrderedTree {
            builder: self.builder.clone(),
            root,
        };
    }

    /// The subtree `value` would be merged into.
    pub fn attachment_point(&self, value: &V) -> Option<&Node<V>> {
        return self.builder.locate_attachment_point(&self.root, value);
    }

    pub fn includes_value(&self, value: &V) -> bool {
        return self.root.includes_value(value);
    }

    pub fn min(&self) -> Option<&V> {
        return self.root.values(Traversal::InOrder).next();
    }

    pub fn max(&self) -> Option<&V> {
        return self.root.values(Traversal::InOrder).last();
    }

    /// Values in order.
    pub fn to_vec(&self) -> Vec<V> {
        return self.root.values(Traversal::InOrder).cloned().collect();
    }

    pub fn size(&self) -> usize {
        return self.root.size();
    }

    pub fn depth(&self) -> usize {
        return self.root.depth();
    }

    pub fn root(&self) -> &Node<V> {
        return &self.root;
    }

    pub fn into_root(self) -> Node<V> {
        return self.root;
    }
}

impl<V, O> OrderedTree<V, O>
where
    V: Clone + Eq + std::hash::Hash,
    O: OrderPolicy<V> + Clone,
{
    /// MPTT index keyed by the values themselves. Duplicate values share a
    /// key; the later one in pre-order wins.
    pub fn build_index(&self) -> IndexedTree<V, V> {
        return build_index(&self.root, &IdentityPolicy::new());
    }
}
