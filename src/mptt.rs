// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Modified Preorder Tree Traversal (MPTT) index.
//!
//! One pre-order pass gives every node an interval `(left, right)`:
//!
//! - a leaf at `i` gets `(i, i + 1)`
//! - a branch at `i` starts its first child at `i + 1`, each next sibling at
//!   the previous sibling's `right + 1`, and closes at the first free index
//!   after its last child (so a valued branch over `k` leaves closes at
//!   `i + 1 + 2k`)
//! - an empty node gets no interval and no entry
//!
//! Intervals nest strictly and siblings never overlap, so "is B inside A"
//! is two integer comparisons. The index is a snapshot: rebuild it after the
//! tree changes.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::node::Node;
use crate::policy::ValuePolicy;

/// One key's interval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MpttEntry<K> {
    pub key: K,
    pub left: i64,
    pub right: i64,
}

impl<K> MpttEntry<K> {
    pub fn new(key: K, left: i64, right: i64) -> MpttEntry<K> {
        return MpttEntry { key, left, right };
    }

    /// Whether `other`'s interval lies within this one. Reflexive.
    pub fn contains(&self, other: &MpttEntry<K>) -> bool {
        return other.left >= self.left && other.right <= self.right;
    }
}

impl<K: fmt::Display> fmt::Display for MpttEntry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}: {}..{}", self.key, self.left, self.right);
    }
}

/// Key to interval map answering containment without touching the tree.
#[derive(Clone, Debug)]
pub struct Mptt<K> {
    entries: FxHashMap<K, MpttEntry<K>>,
}

impl<K: Clone + Eq + Hash> Mptt<K> {
    fn new() -> Mptt<K> {
        return Mptt {
            entries: FxHashMap::default(),
        };
    }

    /// Whether `descendant` is `ancestor` or lies beneath it.
    /// None if either key is unknown.
    pub fn contains(&self, ancestor: &K, descendant: &K) -> Option<bool> {
        let outer = self.entries.get(ancestor)?;
        let inner = self.entries.get(descendant)?;
        return Some(outer.contains(inner));
    }

    pub fn get(&self, key: &K) -> Option<&MpttEntry<K>> {
        return self.entries.get(key);
    }

    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }

    /// All entries in pre-order (by left index).
    pub fn entries(&self) -> Vec<&MpttEntry<K>> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by_key(|e| e.left);
        return entries;
    }

    /// Strict ancestors of `key`, outermost first.
    pub fn ancestors_of(&self, key: &K) -> Option<Vec<&K>> {
        let target = self.entries.get(key)?;
        return Some(
            self.entries()
                .into_iter()
                .filter(|e| e.left < target.left && e.contains(target))
                .map(|e| &e.key)
                .collect(),
        );
    }

    /// Strict descendants of `key`, in pre-order.
    pub fn descendants_of(&self, key: &K) -> Option<Vec<&K>> {
        let target = self.entries.get(key)?;
        return Some(
            self.entries()
                .into_iter()
                .filter(|e| e.left > target.left && target.contains(e))
                .map(|e| &e.key)
                .collect(),
        );
    }

    fn record(&mut self, key: K, left: i64, right: i64) {
        self.entries.insert(key.clone(), MpttEntry::new(key, left, right));
    }
}

/// A node annotated with its interval. Empty nodes carry no indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexedNode<V> {
    Empty,
    Leaf {
        value: V,
        left: Option<i64>,
        right: Option<i64>,
    },
    Branch {
        value: Option<V>,
        left: Option<i64>,
        right: Option<i64>,
        children: Vec<IndexedNode<V>>,
    },
}

impl<V> IndexedNode<V> {
    pub fn value(&self) -> Option<&V> {
        return match self {
            IndexedNode::Empty => None,
            IndexedNode::Leaf { value, .. } => Some(value),
            IndexedNode::Branch { value, .. } => value.as_ref(),
        };
    }

    pub fn left(&self) -> Option<i64> {
        return match self {
            IndexedNode::Empty => None,
            IndexedNode::Leaf { left, .. } | IndexedNode::Branch { left, .. } => *left,
        };
    }

    pub fn right(&self) -> Option<i64> {
        return match self {
            IndexedNode::Empty => None,
            IndexedNode::Leaf { right, .. } | IndexedNode::Branch { right, .. } => *right,
        };
    }

    pub fn children(&self) -> &[IndexedNode<V>] {
        return match self {
            IndexedNode::Branch { children, .. } => children,
            _ => &[],
        };
    }
}

/// Deep chains would otherwise recurse once per level on drop.
impl<V> Drop for IndexedNode<V> {
    fn drop(&mut self) {
        let IndexedNode::Branch { children, .. } = self else {
            return;
        };
        let mut stack = std::mem::take(children);
        while let Some(mut node) = stack.pop() {
            if let IndexedNode::Branch { children, .. } = &mut node {
                stack.append(children);
            }
        }
    }
}

/// A finished tree's interval annotation together with its key map.
#[derive(Clone, Debug)]
pub struct IndexedTree<V, K> {
    root: IndexedNode<V>,
    index: Mptt<K>,
}

impl<V, K: Clone + Eq + Hash> IndexedTree<V, K> {
    pub fn root(&self) -> &IndexedNode<V> {
        return &self.root;
    }

    pub fn index(&self) -> &Mptt<K> {
        return &self.index;
    }

    pub fn contains(&self, ancestor: &K, descendant: &K) -> Option<bool> {
        return self.index.contains(ancestor, descendant);
    }

    pub fn into_parts(self) -> (IndexedNode<V>, Mptt<K>) {
        return (self.root, self.index);
    }
}

/// A branch whose children are still being indexed.
struct Open<V> {
    value: Option<V>,
    left: i64,
    children: Vec<IndexedNode<V>>,
}

enum Step<'a, V> {
    Enter(&'a Node<V>),
    Close,
}

/// Index `tree` starting at 0.
pub fn build_index<P: ValuePolicy>(tree: &Node<P::Value>, policy: &P) -> IndexedTree<P::Value, P::Key> {
    return build_index_from(tree, policy, 0);
}

/// Index `tree` with the root's left index at `start`.
pub fn build_index_from<P: ValuePolicy>(
    tree: &Node<P::Value>,
    policy: &P,
    start: i64,
) -> IndexedTree<P::Value, P::Key> {
    let mut index = Mptt::new();
    let mut cursor = start;
    let mut steps = vec![Step::Enter(tree)];
    let mut open: Vec<Open<P::Value>> = Vec::new();
    let mut finished: Option<IndexedNode<P::Value>> = None;

    while let Some(step) = steps.pop() {
        let done = match step {
            Step::Enter(Node::Empty) => IndexedNode::Empty,
            Step::Enter(Node::Leaf(value)) => {
                index.record(policy.key_of(value), cursor, cursor + 1);
                let leaf = IndexedNode::Leaf {
                    value: value.clone(),
                    left: Some(cursor),
                    right: Some(cursor + 1),
                };
                cursor += 2;
                leaf
            }
            Step::Enter(Node::Branch(value, children)) => {
                open.push(Open {
                    value: value.clone(),
                    left: cursor,
                    children: Vec::with_capacity(children.len()),
                });
                cursor += 1;
                steps.push(Step::Close);
                for child in children.iter().rev() {
                    steps.push(Step::Enter(child.as_ref()));
                }
                continue;
            }
            Step::Close => {
                let Some(branch) = open.pop() else {
                    unreachable!("close without open branch");
                };
                let right = cursor;
                cursor += 1;
                if let Some(value) = &branch.value {
                    index.record(policy.key_of(value), branch.left, right);
                }
                IndexedNode::Branch {
                    value: branch.value,
                    left: Some(branch.left),
                    right: Some(right),
                    children: branch.children,
                }
            }
        };
        match open.last_mut() {
            Some(parent) => parent.children.push(done),
            None => finished = Some(done),
        }
    }

    trace_log!(entries = index.len(), next = cursor, "built mptt index");
    return IndexedTree {
        root: finished.unwrap_or(IndexedNode::Empty),
        index,
    };
}
