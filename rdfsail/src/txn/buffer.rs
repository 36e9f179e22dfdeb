// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Pending write buffers

use std::collections::HashSet;
use std::fmt;

use crate::closure::{ClosureEngine, ClosureStats};
use crate::storage::{Statement, StorageError, TripleStore};

/// Which direction a buffer writes in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    Assert,
    Retract,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferKind::Assert => write!(f, "assert"),
            BufferKind::Retract => write!(f, "retract"),
        }
    }
}

/// Result of a successful flush
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushOutcome {
    /// Pending statements handed to the store
    pub flushed: usize,
    /// Statements the store reported as changed
    pub applied: usize,
    pub closure: ClosureStats,
}

impl FlushOutcome {
    pub fn is_empty(&self) -> bool {
        self.flushed == 0
    }
}

/// Ordered set of pending statements for one write direction.
///
/// A flush applies the statements to the store and, when an engine is
/// supplied, runs closure over them. The buffer is cleared only once both
/// steps succeed, so a failed flush can be retried as-is.
#[derive(Debug)]
pub struct StatementBuffer {
    kind: BufferKind,
    pending: Vec<Statement>,
    seen: HashSet<Statement>,
    capacity: usize,
}

impl StatementBuffer {
    pub fn new(kind: BufferKind, capacity: usize) -> Self {
        Self {
            kind,
            pending: Vec::new(),
            seen: HashSet::new(),
            capacity,
        }
    }

    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.pending.len() >= self.capacity
    }

    pub fn pending(&self) -> &[Statement] {
        &self.pending
    }

    /// Buffer a statement; returns false if it is already pending
    pub fn add(&mut self, statement: Statement) -> bool {
        if !self.seen.insert(statement.clone()) {
            return false;
        }
        self.pending.push(statement);
        true
    }

    /// Buffer several statements, returning how many were new
    pub fn extend<I: IntoIterator<Item = Statement>>(&mut self, statements: I) -> usize {
        let mut added = 0;
        for statement in statements {
            if self.add(statement) {
                added += 1;
            }
        }
        added
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.seen.clear();
    }

    pub fn flush<C>(
        &mut self,
        store: &mut dyn TripleStore,
        closure: Option<&mut C>,
    ) -> Result<FlushOutcome, StorageError>
    where
        C: ClosureEngine + ?Sized,
    {
        if self.pending.is_empty() {
            return Ok(FlushOutcome::default());
        }

        let mut outcome = FlushOutcome {
            flushed: self.pending.len(),
            ..FlushOutcome::default()
        };

        match (self.kind, closure) {
            (BufferKind::Assert, closure) => {
                outcome.applied = store.add_statements(&self.pending)?;
                if let Some(engine) = closure {
                    outcome.closure = engine.compute_closure(store, Some(&self.pending))?;
                }
            }
            (BufferKind::Retract, Some(engine)) => {
                outcome.closure = engine.retract(store, &self.pending)?;
                outcome.applied = outcome.closure.removed;
            }
            (BufferKind::Retract, None) => {
                outcome.applied = store.remove_statements(&self.pending)?;
            }
        }

        log::debug!(
            "flushed {} buffer: {} pending, {} applied, {} inferred",
            self.kind,
            outcome.flushed,
            outcome.applied,
            outcome.closure.inferred_added
        );
        self.clear();
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Term;
    use crate::closure::SubClassClosure;
    use crate::storage::{MemoryTripleStore, StatementPattern};

    fn ex(local: &str) -> Term {
        Term::iri(format!("http://ex/{}", local))
    }

    fn stmt(s: &str, o: &str) -> Statement {
        Statement::explicit(ex(s), ex("p"), ex(o))
    }

    /// Store whose writes always fail
    struct Broken;

    impl TripleStore for Broken {
        fn add_statements(&mut self, _: &[Statement]) -> Result<usize, StorageError> {
            Err(StorageError::Unavailable("down".into()))
        }
        fn remove_statements(&mut self, _: &[Statement]) -> Result<usize, StorageError> {
            Err(StorageError::Unavailable("down".into()))
        }
        fn remove_matching(&mut self, _: &StatementPattern) -> Result<usize, StorageError> {
            Err(StorageError::Unavailable("down".into()))
        }
        fn matching(&self, _: &StatementPattern) -> Result<Vec<Statement>, StorageError> {
            Ok(Vec::new())
        }
        fn range_count(&self, _: &StatementPattern) -> Result<u64, StorageError> {
            Ok(0)
        }
        fn commit(&mut self) -> Result<(), StorageError> {
            Ok(())
        }
        fn clear(&mut self) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_dedup_and_capacity() {
        let mut buffer = StatementBuffer::new(BufferKind::Retract, 2);
        assert!(buffer.add(stmt("a", "b")));
        assert!(!buffer.add(stmt("a", "b")));
        assert!(!buffer.is_full());
        assert_eq!(buffer.extend(vec![stmt("a", "b"), stmt("c", "d")]), 1);
        assert!(buffer.is_full());
    }

    #[test]
    fn test_flush_assertions() {
        let mut store = MemoryTripleStore::new();
        let mut buffer = StatementBuffer::new(BufferKind::Assert, 10);
        buffer.add(stmt("a", "b"));
        buffer.add(stmt("c", "d"));

        let outcome = buffer
            .flush(&mut store, None::<&mut SubClassClosure>)
            .unwrap();
        assert_eq!(outcome.flushed, 2);
        assert_eq!(outcome.applied, 2);
        assert!(buffer.is_empty());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_empty_flush_is_a_no_op() {
        let mut store = MemoryTripleStore::new();
        let mut engine = SubClassClosure::new();
        let mut buffer = StatementBuffer::new(BufferKind::Assert, 10);

        let outcome = buffer.flush(&mut store, Some(&mut engine)).unwrap();
        assert!(outcome.is_empty());
        assert_eq!(engine.runs(), 0);
    }

    #[test]
    fn test_failed_flush_keeps_pending() {
        let mut buffer = StatementBuffer::new(BufferKind::Assert, 10);
        buffer.add(stmt("a", "b"));

        let err = buffer
            .flush(&mut Broken, None::<&mut SubClassClosure>)
            .unwrap_err();
        assert_eq!(err, StorageError::Unavailable("down".into()));
        assert_eq!(buffer.pending(), &[stmt("a", "b")]);
    }

    #[test]
    fn test_flush_retractions_without_closure() {
        let mut store = MemoryTripleStore::new();
        store.add_statements(&[stmt("a", "b"), stmt("c", "d")]).unwrap();

        let mut buffer = StatementBuffer::new(BufferKind::Retract, 10);
        buffer.add(stmt("a", "b"));
        let outcome = buffer
            .flush(&mut store, None::<&mut SubClassClosure>)
            .unwrap();
        assert_eq!(outcome.applied, 1);
        assert_eq!(store.len(), 1);
    }
}
