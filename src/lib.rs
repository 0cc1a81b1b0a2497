// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Hierarchy - immutable trees with a fast ancestor/descendant index.
//!
//! Three structures live here:
//!
//! 1. **Keyed trees**: the value type decides where each node belongs by
//!    presenting structural keys (see [`policy::ValuePolicy`]). Missing
//!    ancestors are synthesized on demand.
//! 2. **Ordered trees**: binary trees that fold each new value in with a
//!    five-case merge so an in-order walk stays sorted.
//! 3. **MPTT indexes**: a single pre-order pass assigns `(left, right)`
//!    intervals, after which containment is an interval comparison.
//!
//! # Quick Start
//!
//! ```
//! use hierarchy::keyed::KeyedTree;
//! use hierarchy::policy::ValuePolicy;
//!
//! /// Dotted paths: "a.b" is a child of "a".
//! #[derive(Clone)]
//! struct Dotted;
//!
//! impl ValuePolicy for Dotted {
//!     type Key = String;
//!     type Value = String;
//!
//!     fn key_of(&self, value: &String) -> String { value.clone() }
//!     fn parent_key_of(&self, value: &String) -> String { value.clone() }
//!     fn inferred_parent_key(&self, value: &String) -> Option<String> {
//!         value.rsplit_once('.').map(|(parent, _)| parent.to_string())
//!     }
//!     fn synthesize_parent(&self, key: &String, _hint: Option<&String>) -> Option<String> {
//!         Some(key.clone())
//!     }
//! }
//!
//! let tree = KeyedTree::new(Dotted)
//!     .insert("a".to_string())?
//!     .insert("a.b".to_string())?
//!     .insert("c.d".to_string())?;
//!
//! let index = tree.build_index();
//! assert_eq!(index.contains(&"a".to_string(), &"a.b".to_string()), Some(true));
//! assert_eq!(index.contains(&"a".to_string(), &"c.d".to_string()), Some(false));
//! assert_eq!(index.contains(&"a".to_string(), &"zzz".to_string()), None);
//! # Ok::<(), hierarchy::error::TreeError>(())
//! ```

#[macro_use]
mod diagnostics_macros;

pub mod diagnostics;
pub mod error;
pub mod keyed;
pub mod kleenean;
pub mod mptt;
pub mod node;
pub mod order;
pub mod ordered;
pub mod policy;

pub use error::Result;
pub use error::TreeError;
pub use keyed::KeyedTree;
pub use kleenean::Kleenean;
pub use mptt::IndexedTree;
pub use mptt::Mptt;
pub use mptt::MpttEntry;
pub use node::Node;
pub use node::Traversal;
pub use ordered::OrderedTree;
