// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Optional observer for degenerate-but-legal insertion paths.
//!
//! A sink never influences results: a tree with a sink and a tree without
//! one produce identical structures for identical input.

use std::cell::RefCell;

/// Something noteworthy that happened while inserting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// No parent could be found or inferred, so the node went under the root.
    RootFallback { depth: usize },
    /// A lookup scanned the whole tree instead of using the key index.
    NaiveLookup { size: usize },
    /// A placeholder ancestor was manufactured for a missing parent.
    PlaceholderSynthesized { depth: usize },
}

/// Receives [`Diagnostic`] events.
pub trait DiagnosticSink {
    fn notify(&self, event: Diagnostic);
}

/// Forwards events to `tracing` (when the feature is enabled).
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    #[allow(unused_variables)]
    fn notify(&self, event: Diagnostic) {
        match event {
            Diagnostic::RootFallback { depth } => {
                warn_log!(depth, "no parent key inferable, attaching at root");
            }
            Diagnostic::NaiveLookup { size } => {
                debug_log!(size, "scanning tree for attachment point");
            }
            Diagnostic::PlaceholderSynthesized { depth } => {
                trace_log!(depth, "synthesized placeholder ancestor");
            }
        }
    }
}

/// Keeps every event it sees. Handy in tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RefCell<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> RecordingSink {
        return RecordingSink::default();
    }

    /// Snapshot of the events seen so far.
    pub fn events(&self) -> Vec<Diagnostic> {
        return self.events.borrow().clone();
    }

    pub fn count(&self, pred: impl Fn(&Diagnostic) -> bool) -> usize {
        return self.events.borrow().iter().filter(|e| pred(e)).count();
    }
}

impl DiagnosticSink for RecordingSink {
    fn notify(&self, event: Diagnostic) {
        self.events.borrow_mut().push(event);
    }
}
