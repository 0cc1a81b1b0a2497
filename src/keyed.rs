// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Key-addressed trees.
//!
//! A value's position is inferred from its structural keys rather than
//! given explicitly. Inserting `b`:
//!
//! 1. Find the node whose parent key equals `b`'s inferred parent key.
//! 2. If found, append `b` to it (promoting a leaf to a branch) and splice
//!    the rebuilt node back in.
//! 3. If not found but a parent key can be inferred, synthesize a
//!    placeholder ancestor, wrap `b` in it, and insert that instead.
//! 4. If no parent key can be inferred, attach under the root.
//!
//! Step 1 comes in two flavours selected by [`Lookup`]. The default keeps a
//! key to path scaffold next to the tree, updated by every attachment, so
//! lookups are O(1) and splicing touches only the ancestors of the target.
//! `Lookup::Scan` walks the whole tree instead and exists as a reference
//! for testing the scaffold against.
//!
//! Children are only ever appended, never reordered or removed, so a path
//! recorded once stays valid for the life of the tree.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::diagnostics::Diagnostic;
use crate::diagnostics::DiagnosticSink;
use crate::error::Result;
use crate::error::TreeError;
use crate::kleenean::Kleenean;
use crate::mptt::IndexedTree;
use crate::mptt::build_index_from;
use crate::node::Node;
use crate::node::Path;
use crate::policy::KeyedBuilder;
use crate::policy::TreeBuilder;
use crate::policy::ValuePolicy;

/// How attachment points are found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lookup {
    /// Key to path scaffold, O(1) per lookup.
    #[default]
    Indexed,
    /// Full pre-order scan, O(n) per lookup.
    Scan,
}

/// Knobs for a [`KeyedTree`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeConfig {
    pub lookup: Lookup,
}

impl TreeConfig {
    pub fn with_lookup(mut self, lookup: Lookup) -> TreeConfig {
        self.lookup = lookup;
        return self;
    }
}

/// Paths to every valued node, by identity key and by parent key.
#[derive(Clone, Debug)]
struct Scaffold<K> {
    by_key: FxHashMap<K, Path>,
    by_parent_key: FxHashMap<K, Path>,
}

impl<K: Clone + Eq + std::hash::Hash> Scaffold<K> {
    fn new() -> Scaffold<K> {
        return Scaffold {
            by_key: FxHashMap::default(),
            by_parent_key: FxHashMap::default(),
        };
    }

    /// Record every valued node of `node`, which sits at `at`.
    /// The first node to claim a key keeps it.
    fn register<P: ValuePolicy<Key = K>>(&mut self, policy: &P, node: &Node<P::Value>, at: &[u32]) {
        for (relative, n) in node.paths() {
            let Some(value) = n.value() else {
                continue;
            };
            let mut path = Path::from_slice(at);
            path.extend_from_slice(&relative);
            self.by_parent_key
                .entry(policy.parent_key_of(value))
                .or_insert_with(|| path.clone());
            self.by_key.entry(policy.key_of(value)).or_insert(path);
        }
    }
}

/// Where a resolved node will be attached.
enum Attachment<'a, V> {
    /// Under the node at this path (scaffold lookup).
    At(Path),
    /// Under this node (found by the builder).
    Found(&'a Node<V>),
    /// Under the root, for lack of anything better.
    Root,
}

/// An immutable tree whose shape is dictated by a [`ValuePolicy`].
///
/// `insert` consumes the tree and returns the grown one; untouched subtrees
/// are shared with the tree that came before.
///
/// The [`TreeBuilder`] is injected alongside the policy. It builds the
/// wrapping branches for synthesized ancestors, answers scan lookups and
/// decides node identity when splicing. The scaffold only stands in for
/// `locate_attachment_point` when the builder reports that it attaches by
/// parent key.
pub struct KeyedTree<P: ValuePolicy, B = KeyedBuilder<P>> {
    policy: P,
    builder: B,
    root: Node<P::Value>,
    scaffold: Scaffold<P::Key>,
    config: TreeConfig,
    sink: Option<Rc<dyn DiagnosticSink>>,
}

impl<P: ValuePolicy + Clone, B: Clone> Clone for KeyedTree<P, B> {
    fn clone(&self) -> KeyedTree<P, B> {
        return KeyedTree {
            policy: self.policy.clone(),
            builder: self.builder.clone(),
            root: self.root.clone(),
            scaffold: self.scaffold.clone(),
            config: self.config,
            sink: self.sink.clone(),
        };
    }
}

impl<P: ValuePolicy + Clone> KeyedTree<P> {
    /// An empty tree with an unvalued root.
    pub fn new(policy: P) -> KeyedTree<P> {
        return KeyedTree::from_node(policy, Node::Branch(None, Vec::new()));
    }

    /// An empty tree whose root carries `value`.
    pub fn with_root_value(policy: P, value: P::Value) -> KeyedTree<P> {
        return KeyedTree::from_node(policy, Node::Branch(Some(value), Vec::new()));
    }

    /// Adopt an existing tree.
    pub fn from_node(policy: P, root: Node<P::Value>) -> KeyedTree<P> {
        let builder = KeyedBuilder::new(policy.clone());
        return KeyedTree::with_builder(policy, builder, root);
    }

    /// Insert every value in turn.
    pub fn from_values(policy: P, values: impl IntoIterator<Item = P::Value>) -> Result<KeyedTree<P>> {
        let mut tree = KeyedTree::new(policy);
        for value in values {
            tree.insert_in_place(value)?;
        }
        return Ok(tree);
    }
}

impl<P: ValuePolicy, B: TreeBuilder<P::Value>> KeyedTree<P, B> {
    /// Adopt `root` with an explicit builder. A leaf or empty root is
    /// widened to a branch so there is always somewhere to attach.
    pub fn with_builder(policy: P, builder: B, root: Node<P::Value>) -> KeyedTree<P, B> {
        let root = match root {
            Node::Empty => Node::Branch(None, Vec::new()),
            Node::Leaf(ref value) => Node::Branch(Some(value.clone()), Vec::new()),
            branch => branch,
        };
        let mut tree = KeyedTree {
            policy,
            builder,
            root,
            scaffold: Scaffold::new(),
            config: TreeConfig::default(),
            sink: None,
        };
        tree.rebuild_scaffold();
        return tree;
    }

    pub fn with_config(mut self, config: TreeConfig) -> KeyedTree<P, B> {
        self.config = config;
        self.rebuild_scaffold();
        return self;
    }

    pub fn with_sink(mut self, sink: Rc<dyn DiagnosticSink>) -> KeyedTree<P, B> {
        self.sink = Some(sink);
        return self;
    }

    pub fn config(&self) -> TreeConfig {
        return self.config;
    }

    pub fn policy(&self) -> &P {
        return &self.policy;
    }

    pub fn builder(&self) -> &B {
        return &self.builder;
    }

    pub fn root(&self) -> &Node<P::Value> {
        return &self.root;
    }

    pub fn into_root(self) -> Node<P::Value> {
        return self.root;
    }

    /// Number of valued nodes, placeholders included.
    pub fn size(&self) -> usize {
        return self.root.size();
    }

    pub fn depth(&self) -> usize {
        return self.root.depth();
    }

    /// Insert `value` as a leaf.
    pub fn insert(mut self, value: P::Value) -> Result<KeyedTree<P, B>> {
        self.insert_in_place(value)?;
        return Ok(self);
    }

    /// Insert a prebuilt node, descendants and all.
    pub fn insert_node(mut self, node: Node<P::Value>) -> Result<KeyedTree<P, B>> {
        self.insert_node_in_place(node)?;
        return Ok(self);
    }

    /// Like [`KeyedTree::insert`], but in place. On error the tree is
    /// left exactly as it was.
    pub fn insert_in_place(&mut self, value: P::Value) -> Result<()> {
        let leaf = self.builder.build_leaf(value);
        return self.insert_node_in_place(leaf);
    }

    pub fn insert_node_in_place(&mut self, node: Node<P::Value>) -> Result<()> {
        if node.value().is_none() {
            return Err(TreeError::ValuelessNode);
        }
        // Everything fallible happens before the tree is touched.
        let (root, landed) = {
            let (attachment, node) = self.resolve(node)?;
            self.graft(attachment, node)?
        };
        self.root = root;
        if self.config.lookup == Lookup::Indexed {
            if let Some(node) = self.root.at_path(&landed) {
                self.scaffold.register(&self.policy, node, &landed);
            }
        }
        return Ok(());
    }

    /// Find where `node` goes, wrapping it in synthesized ancestors until
    /// something in the tree can adopt it.
    fn resolve(&self, node: Node<P::Value>) -> Result<(Attachment<'_, P::Value>, Node<P::Value>)> {
        let policy = &self.policy;
        let mut node = node;
        let mut chain: Vec<P::Key> = Vec::new();
        loop {
            let Some(value) = node.value() else {
                return Err(TreeError::ValuelessNode);
            };
            chain.push(policy.key_of(value));

            if let Some(attachment) = self.locate(value) {
                return Ok((attachment, node));
            }
            let Some(parent_key) = policy.inferred_parent_key(value) else {
                self.notify(Diagnostic::RootFallback { depth: chain.len() - 1 });
                return Ok((Attachment::Root, node));
            };
            let Some(parent) = policy.synthesize_parent(&parent_key, Some(value)) else {
                self.notify(Diagnostic::RootFallback { depth: chain.len() - 1 });
                return Ok((Attachment::Root, node));
            };
            if parent == *value || chain.contains(&policy.key_of(&parent)) {
                return Err(TreeError::ParentInferenceCycle { depth: chain.len() });
            }
            self.notify(Diagnostic::PlaceholderSynthesized { depth: chain.len() });
            node = self.builder.build_tree(Some(parent), vec![node])?;
        }
    }

    fn locate(&self, value: &P::Value) -> Option<Attachment<'_, P::Value>> {
        if self.config.lookup == Lookup::Indexed && self.builder.attaches_by_parent_key() {
            let key = self.policy.inferred_parent_key(value)?;
            return self.scaffold.by_parent_key.get(&key).cloned().map(Attachment::At);
        }
        self.notify(Diagnostic::NaiveLookup { size: self.root.size() });
        return self
            .builder
            .locate_attachment_point(&self.root, value)
            .map(Attachment::Found);
    }

    /// The rebuilt root, plus the path the node landed at.
    fn graft(
        &self,
        attachment: Attachment<'_, P::Value>,
        node: Node<P::Value>,
    ) -> Result<(Node<P::Value>, Path)> {
        let path = match attachment {
            Attachment::At(path) => path,
            Attachment::Found(parent) => {
                match self.root.path_to(|n| self.builder.nodes_equivalent(n, parent)) {
                    Some(path) => path,
                    None => {
                        self.notify(Diagnostic::RootFallback { depth: 0 });
                        return self.graft(Attachment::Root, node);
                    }
                }
            }
            Attachment::Root => {
                let mut landed = Path::new();
                landed.push(self.root.children().len() as u32);
                trace_log!(?landed, "attaching under root");
                return Ok((self.root.with_child(node), landed));
            }
        };
        let Some(parent) = self.root.at_path(&path) else {
            unreachable!("attachment paths always resolve");
        };
        let mut landed = path.clone();
        landed.push(parent.children().len() as u32);
        let merged = parent.with_child(node);
        return Ok((self.root.replace_at(&path, merged)?, landed));
    }

    fn rebuild_scaffold(&mut self) {
        self.scaffold = Scaffold::new();
        if self.config.lookup == Lookup::Indexed {
            self.scaffold.register(&self.policy, &self.root, &[]);
        }
    }

    fn notify(&self, event: Diagnostic) {
        if let Some(sink) = &self.sink {
            sink.notify(event);
        }
    }

    /// Node whose identity key is `key`.
    pub fn find_by_key(&self, key: &P::Key) -> Option<&Node<P::Value>> {
        let policy = &self.policy;
        return match self.config.lookup {
            Lookup::Indexed => {
                let path = self.scaffold.by_key.get(key)?;
                self.root.at_path(path)
            }
            Lookup::Scan => self.root.find(|n| match n.value() {
                Some(v) => policy.key_of(v) == *key,
                None => false,
            }),
        };
    }

    /// Node presenting `key` to its would-be children.
    pub fn find_by_parent_key(&self, key: &P::Key) -> Option<&Node<P::Value>> {
        let policy = &self.policy;
        return match self.config.lookup {
            Lookup::Indexed => {
                let path = self.scaffold.by_parent_key.get(key)?;
                self.root.at_path(path)
            }
            Lookup::Scan => self.root.find(|n| match n.value() {
                Some(v) => policy.parent_key_of(v) == *key,
                None => false,
            }),
        };
    }

    pub fn find(&self, pred: impl Fn(&Node<P::Value>) -> bool) -> Option<&Node<P::Value>> {
        return self.root.find(pred);
    }

    pub fn contains_key(&self, key: &P::Key) -> bool {
        return self.find_by_key(key).is_some();
    }

    /// Compare two nodes by key.
    pub fn compare_values(&self, x: &Node<P::Value>, y: &Node<P::Value>) -> Kleenean {
        return match (x.value(), y.value()) {
            (Some(a), Some(b)) => Kleenean::from(self.policy.key_of(a) == self.policy.key_of(b)),
            _ => Kleenean::Unknown,
        };
    }

    pub fn build_index(&self) -> IndexedTree<P::Value, P::Key> {
        return self.build_index_from(0);
    }

    pub fn build_index_from(&self, start: i64) -> IndexedTree<P::Value, P::Key> {
        return build_index_from(&self.root, &self.policy, start);
    }
}
