// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! End-to-end scenarios for the public API.

use std::rc::Rc;

use hierarchy::TreeError;
use hierarchy::diagnostics::Diagnostic;
use hierarchy::diagnostics::RecordingSink;
use hierarchy::diagnostics::TracingSink;
use hierarchy::keyed::KeyedTree;
use hierarchy::keyed::Lookup;
use hierarchy::keyed::TreeConfig;
use hierarchy::node::Node;
use hierarchy::node::Traversal;
use hierarchy::order::NaturalOrder;
use hierarchy::ordered::OrderedTree;
use hierarchy::policy::ValuePolicy;

// =============================================================================
// Helper policies
// =============================================================================

/// A value with an explicit id and optional parent id.
#[derive(Clone, Debug, PartialEq)]
struct Record {
    id: u32,
    parent: Option<u32>,
    label: &'static str,
}

fn record(id: u32, parent: Option<u32>, label: &'static str) -> Record {
    return Record { id, parent, label };
}

/// Records point at their parent by id; missing parents become "?" stubs.
#[derive(Clone, Copy)]
struct ById;

impl ValuePolicy for ById {
    type Key = u32;
    type Value = Record;

    fn key_of(&self, value: &Record) -> u32 {
        return value.id;
    }

    fn inferred_parent_key(&self, value: &Record) -> Option<u32> {
        return value.parent;
    }

    fn synthesize_parent(&self, key: &u32, _hint: Option<&Record>) -> Option<Record> {
        return Some(record(*key, None, "?"));
    }
}

/// Every nonzero integer is a child of 0.
#[derive(Clone, Copy)]
struct Flat;

impl ValuePolicy for Flat {
    type Key = String;
    type Value = i64;

    fn key_of(&self, value: &i64) -> String {
        return format!("k{}", value);
    }

    fn inferred_parent_key(&self, value: &i64) -> Option<String> {
        return if *value == 0 { None } else { Some(self.key_of(&0)) };
    }

    fn synthesize_parent(&self, key: &String, _hint: Option<&i64>) -> Option<i64> {
        return key.trim_start_matches('k').parse().ok();
    }
}

/// Synthesizes the child itself as its own parent.
#[derive(Clone, Copy)]
struct Mirror;

impl ValuePolicy for Mirror {
    type Key = i64;
    type Value = i64;

    fn key_of(&self, value: &i64) -> i64 {
        return *value;
    }

    fn inferred_parent_key(&self, value: &i64) -> Option<i64> {
        return Some(-*value);
    }

    fn synthesize_parent(&self, _key: &i64, hint: Option<&i64>) -> Option<i64> {
        return hint.copied();
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn ordered_insertion_sequence() {
    let mut tree = OrderedTree::empty();
    for value in [10, 5, 15, 3, 7, 20] {
        tree = tree.insert(value).unwrap();
    }
    assert_eq!(tree.to_vec(), vec![3, 5, 7, 10, 15, 20]);
    let leaves: Vec<i32> = tree.root().values(Traversal::InOrder).copied().collect();
    assert_eq!(leaves, vec![3, 5, 7, 10, 15, 20]);
}

#[test]
fn root_with_three_children_index() {
    let tree = KeyedTree::with_root_value(Flat, 0)
        .insert(1)
        .unwrap()
        .insert(2)
        .unwrap()
        .insert(3)
        .unwrap();
    assert_eq!(tree.root().children().len(), 3);

    let indexed = tree.build_index();
    let key = |v: i64| Flat.key_of(&v);
    assert_eq!(indexed.contains(&key(0), &key(2)), Some(true));
    assert_eq!(indexed.contains(&key(1), &key(2)), Some(false));
    assert_eq!(indexed.contains(&key(2), &key(0)), Some(false));
    assert_eq!(indexed.contains(&key(9), &key(0)), None);

    let root = indexed.index().get(&key(0)).unwrap();
    assert_eq!((root.left, root.right), (0, 7));
}

#[test]
fn find_by_key_absent_is_none() {
    let tree = KeyedTree::with_root_value(Flat, 0).insert(1).unwrap();
    assert!(tree.find_by_key(&"k42".to_string()).is_none());
    assert!(tree.find_by_key(&"k1".to_string()).is_some());
}

#[test]
fn self_synthesizing_parent_is_rejected() {
    let result = KeyedTree::new(Mirror).insert(5);
    assert!(matches!(result, Err(TreeError::ParentInferenceCycle { .. })));
}

#[test]
fn records_with_missing_parents_get_stubs() {
    let sink = Rc::new(RecordingSink::new());
    let tree = KeyedTree::new(ById)
        .with_sink(sink.clone())
        .insert(record(1, None, "root"))
        .unwrap()
        .insert(record(3, Some(2), "orphan"))
        .unwrap()
        .insert(record(4, Some(1), "child"))
        .unwrap();

    let stub = tree.find_by_key(&2).unwrap();
    assert_eq!(stub.value().map(|r| r.label), Some("?"));
    assert_eq!(stub.children().len(), 1);
    assert_eq!(tree.size(), 4);

    let placeholders = sink.count(|e| matches!(e, Diagnostic::PlaceholderSynthesized { .. }));
    assert_eq!(placeholders, 1);

    let indexed = tree.build_index();
    assert_eq!(indexed.contains(&2, &3), Some(true));
    assert_eq!(indexed.contains(&1, &4), Some(true));
    assert_eq!(indexed.contains(&1, &3), Some(false));
}

#[test]
fn insert_returns_new_tree_sharing_structure() {
    let before = KeyedTree::with_root_value(Flat, 0).insert(1).unwrap();
    let snapshot = before.root().clone();
    let after = before.insert(2).unwrap();
    assert_eq!(snapshot.size(), 2);
    assert_eq!(after.size(), 3);
    assert!(Rc::ptr_eq(&snapshot.children()[0], &after.root().children()[0]));
}

#[test]
fn prebuilt_node_without_value_is_rejected() {
    let tree = KeyedTree::new(Flat);
    let result = tree.insert_node(Node::branch(None, vec![Node::leaf(1)]));
    assert!(matches!(result, Err(TreeError::ValuelessNode)));
}

#[test]
fn tracing_sink_observes_root_fallback() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let tree = KeyedTree::new(ById)
        .with_config(TreeConfig::default().with_lookup(Lookup::Scan))
        .with_sink(Rc::new(TracingSink))
        .insert(record(1, None, "a"))
        .unwrap()
        .insert(record(2, None, "b"))
        .unwrap();
    assert_eq!(tree.root().children().len(), 2);
}

#[test]
fn index_is_a_snapshot() {
    let tree = KeyedTree::with_root_value(Flat, 0).insert(1).unwrap();
    let old = tree.build_index();
    let tree = tree.insert(2).unwrap();
    assert_eq!(old.contains(&"k0".to_string(), &"k2".to_string()), None);
    let fresh = tree.build_index();
    assert_eq!(fresh.contains(&"k0".to_string(), &"k2".to_string()), Some(true));
}

#[test]
fn ordered_index_reports_intervals() {
    let tree = OrderedTree::from_values(NaturalOrder, [2, 1, 3]).unwrap();
    let indexed = tree.build_index();
    assert_eq!(indexed.index().len(), 3);
    for key in [1, 2, 3] {
        assert_eq!(indexed.contains(&key, &key), Some(true));
    }
}
