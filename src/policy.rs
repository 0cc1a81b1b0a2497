// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Policies that let a value type dictate its own placement.
//!
//! The tree code never special-cases a value type. Everything it needs to
//! know (keys, parents, how to fabricate a missing ancestor, how to build a
//! branch) comes from one of the two traits here, passed in explicitly.

use std::hash::Hash;
use std::marker::PhantomData;

use crate::error::Result;
use crate::kleenean::Kleenean;
use crate::node::Node;

/// Per-value-type placement rules for key-addressed trees.
///
/// Keys must be unique across a tree; lookups become ambiguous otherwise.
pub trait ValuePolicy {
    type Key: Clone + Eq + Hash;
    type Value: Clone + PartialEq;

    /// Identity key, used by `find_by_key` and by the MPTT index.
    fn key_of(&self, value: &Self::Value) -> Self::Key;

    /// Key this value presents to would-be children.
    fn parent_key_of(&self, value: &Self::Value) -> Self::Key {
        return self.key_of(value);
    }

    /// Key of the parent this value belongs under. None for roots.
    fn inferred_parent_key(&self, value: &Self::Value) -> Option<Self::Key>;

    /// Manufacture a placeholder for a missing ancestor keyed `key`.
    fn synthesize_parent(
        &self,
        key: &Self::Key,
        child_hint: Option<&Self::Value>,
    ) -> Option<Self::Value>;
}

/// Builds nodes and decides where a value goes.
///
/// Implementations must be pure: same input, same answer, no side effects.
pub trait TreeBuilder<V> {
    fn build_tree(&self, value: Option<V>, children: Vec<Node<V>>) -> Result<Node<V>>;

    fn build_leaf(&self, value: V) -> Node<V> {
        return Node::Leaf(value);
    }

    /// The node `value` should be attached to or merged into, if any.
    fn locate_attachment_point<'a>(&self, tree: &'a Node<V>, value: &V) -> Option<&'a Node<V>>;

    /// Identity test used when splicing a rebuilt node back into a tree.
    fn nodes_equivalent(&self, x: &Node<V>, y: &Node<V>) -> bool;

    /// True when `locate_attachment_point` finds the node presenting the
    /// value's inferred parent key, so a keyed tree may answer it from its
    /// key index instead of calling the builder.
    fn attaches_by_parent_key(&self) -> bool {
        return false;
    }
}

/// Plain general trees: any arity, identity is value equality, and nothing
/// has a natural parent.
///
/// Injected into a `KeyedTree`, it never locates an existing parent, so each
/// value lands under a synthesized ancestor or directly under the root.
#[derive(Clone, Copy, Debug)]
pub struct GeneralBuilder<V> {
    _value: PhantomData<fn() -> V>,
}

impl<V> GeneralBuilder<V> {
    pub fn new() -> GeneralBuilder<V> {
        return GeneralBuilder { _value: PhantomData };
    }
}

impl<V> Default for GeneralBuilder<V> {
    fn default() -> GeneralBuilder<V> {
        return GeneralBuilder::new();
    }
}

impl<V: PartialEq> TreeBuilder<V> for GeneralBuilder<V> {
    fn build_tree(&self, value: Option<V>, children: Vec<Node<V>>) -> Result<Node<V>> {
        return Ok(Node::branch(value, children));
    }

    fn locate_attachment_point<'a>(&self, _tree: &'a Node<V>, _value: &V) -> Option<&'a Node<V>> {
        return None;
    }

    fn nodes_equivalent(&self, x: &Node<V>, y: &Node<V>) -> bool {
        return x.compare_values(y).is_true();
    }
}

/// Builder for key-addressed trees, driven by a [`ValuePolicy`].
#[derive(Clone, Debug)]
pub struct KeyedBuilder<P> {
    policy: P,
}

impl<P: ValuePolicy> KeyedBuilder<P> {
    pub fn new(policy: P) -> KeyedBuilder<P> {
        return KeyedBuilder { policy };
    }

    pub fn policy(&self) -> &P {
        return &self.policy;
    }

    /// Compare two nodes by key rather than by raw value.
    pub fn compare_values(&self, x: &Node<P::Value>, y: &Node<P::Value>) -> Kleenean {
        return match (x.value(), y.value()) {
            (Some(a), Some(b)) => Kleenean::from(self.policy.key_of(a) == self.policy.key_of(b)),
            _ => Kleenean::Unknown,
        };
    }
}

impl<P: ValuePolicy> TreeBuilder<P::Value> for KeyedBuilder<P> {
    fn build_tree(
        &self,
        value: Option<P::Value>,
        children: Vec<Node<P::Value>>,
    ) -> Result<Node<P::Value>> {
        return Ok(Node::branch(value, children));
    }

    /// Scans the whole tree for the node presenting `value`'s parent key.
    fn locate_attachment_point<'a>(
        &self,
        tree: &'a Node<P::Value>,
        value: &P::Value,
    ) -> Option<&'a Node<P::Value>> {
        let wanted = self.policy.inferred_parent_key(value)?;
        return tree.find(|n| match n.value() {
            Some(v) => self.policy.parent_key_of(v) == wanted,
            None => false,
        });
    }

    fn nodes_equivalent(&self, x: &Node<P::Value>, y: &Node<P::Value>) -> bool {
        return self.compare_values(x, y).is_true();
    }

    fn attaches_by_parent_key(&self) -> bool {
        return true;
    }
}

/// Every value is its own key and has no parent. Lets ordered trees and
/// plain trees be indexed.
#[derive(Clone, Copy, Debug)]
pub struct IdentityPolicy<V> {
    _value: PhantomData<fn() -> V>,
}

impl<V> IdentityPolicy<V> {
    pub fn new() -> IdentityPolicy<V> {
        return IdentityPolicy { _value: PhantomData };
    }
}

impl<V> Default for IdentityPolicy<V> {
    fn default() -> IdentityPolicy<V> {
        return IdentityPolicy::new();
    }
}

impl<V: Clone + Eq + Hash> ValuePolicy for IdentityPolicy<V> {
    type Key = V;
    type Value = V;

    fn key_of(&self, value: &V) -> V {
        return value.clone();
    }

    fn inferred_parent_key(&self, _value: &V) -> Option<V> {
        return None;
    }

    fn synthesize_parent(&self, _key: &V, _child_hint: Option<&V>) -> Option<V> {
        return None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Integers whose parent is `n / 10`; 0 is the root.
    #[derive(Clone, Copy)]
    struct Decimal;

    impl ValuePolicy for Decimal {
        type Key = u32;
        type Value = u32;

        fn key_of(&self, value: &u32) -> u32 {
            return *value;
        }

        fn inferred_parent_key(&self, value: &u32) -> Option<u32> {
            return if *value == 0 { None } else { Some(*value / 10) };
        }

        fn synthesize_parent(&self, key: &u32, _hint: Option<&u32>) -> Option<u32> {
            return Some(*key);
        }
    }

    #[test]
    fn keyed_builder_locates_by_parent_key() {
        let builder = KeyedBuilder::new(Decimal);
        let tree = Node::branch(Some(0), vec![Node::leaf(1), Node::leaf(2)]);
        let found = builder.locate_attachment_point(&tree, &21).unwrap();
        assert_eq!(found.value(), Some(&2));
        assert!(builder.locate_attachment_point(&tree, &35).is_none());
        assert!(builder.locate_attachment_point(&tree, &0).is_none());
    }

    #[test]
    fn keyed_builder_compares_keys() {
        let builder = KeyedBuilder::new(Decimal);
        let a = Node::leaf(7);
        let b = Node::branch(Some(7), vec![Node::leaf(70)]);
        assert!(builder.nodes_equivalent(&a, &b));
        assert_eq!(builder.compare_values(&a, &Node::Empty), Kleenean::Unknown);
        assert!(builder.attaches_by_parent_key());
    }

    #[test]
    fn general_builder_attaches_nowhere() {
        let builder = GeneralBuilder::new();
        let tree = Node::branch(None, vec![Node::leaf("a")]);
        assert!(builder.locate_attachment_point(&tree, &"a").is_none());
        assert!(builder.nodes_equivalent(&Node::leaf("a"), &Node::leaf("a")));
        assert!(!builder.attaches_by_parent_key());
        let built = builder.build_tree(Some("r"), vec![Node::leaf("a")]).unwrap();
        assert_eq!(built.size(), 2);
    }

    #[test]
    fn identity_policy_has_no_parents() {
        let policy = IdentityPolicy::<i32>::new();
        assert_eq!(policy.key_of(&4), 4);
        assert_eq!(policy.parent_key_of(&4), 4);
        assert_eq!(policy.inferred_parent_key(&4), None);
        assert_eq!(policy.synthesize_parent(&4, None), None);
    }
}
