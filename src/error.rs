// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Errors raised while building or splicing trees.
//!
//! Construction is deterministic, so none of these are retried: the same
//! input always reproduces the same error. Missing keys are not errors,
//! lookups return `Option` instead.

use thiserror::Error;

/// Everything that can go wrong while growing a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Attempted to insert a node that carries no value.
    #[error("cannot insert a node that carries no value")]
    ValuelessNode,
    /// A splice tried to put a leaf or empty node where a branch is needed.
    #[error("replacement must be a branch that can carry children")]
    InvalidReplacement,
    /// Synthesizing an ancestor produced a value already on the chain.
    #[error("parent inference cycles after {depth} synthesized ancestor(s)")]
    ParentInferenceCycle { depth: usize },
    /// A builder was handed a number of children it cannot represent.
    #[error("builder cannot represent a branch with {arity} children")]
    UnsupportedArity { arity: usize },
}

/// Shorthand used across the crate.
pub type Result<T> = std::result::Result<T, TreeError>;
