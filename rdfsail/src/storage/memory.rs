// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory triple store
//!
//! Statements are kept in an ordered map keyed by (s, p, o), so iteration
//! order is deterministic and range counts are exact.

use std::collections::BTreeMap;

use super::types::{Statement, StatementKind, StatementPattern, StorageError};
use super::TripleStore;
use crate::ast::Term;

type TripleKey = (Term, Term, Term);

/// Reference `TripleStore` backed by a `BTreeMap`
#[derive(Debug, Clone, Default)]
pub struct MemoryTripleStore {
    statements: BTreeMap<TripleKey, StatementKind>,
    commits: u64,
}

impl MemoryTripleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored statements, explicit and inferred
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Number of successful `commit` calls
    pub fn commit_count(&self) -> u64 {
        self.commits
    }

    /// Marker of a stored triple, if present
    pub fn kind_of(&self, subject: &Term, predicate: &Term, object: &Term) -> Option<StatementKind> {
        self.statements
            .get(&(subject.clone(), predicate.clone(), object.clone()))
            .copied()
    }

    fn matching_keys<'a>(
        &'a self,
        pattern: &'a StatementPattern,
    ) -> impl Iterator<Item = (&'a TripleKey, &'a StatementKind)> + 'a {
        self.statements
            .iter()
            .filter(move |((s, p, o), _)| pattern.matches_triple(s, p, o))
    }
}

impl TripleStore for MemoryTripleStore {
    fn add_statements(&mut self, statements: &[Statement]) -> Result<usize, StorageError> {
        let mut written = 0;
        for statement in statements {
            let key = (
                statement.subject.clone(),
                statement.predicate.clone(),
                statement.object.clone(),
            );
            match self.statements.get_mut(&key) {
                None => {
                    self.statements.insert(key, statement.kind);
                    written += 1;
                }
                // An explicit assertion upgrades a previously inferred fact
                Some(kind) if *kind == StatementKind::Inferred && statement.is_explicit() => {
                    *kind = StatementKind::Explicit;
                    written += 1;
                }
                Some(_) => {}
            }
        }
        Ok(written)
    }

    fn remove_statements(&mut self, statements: &[Statement]) -> Result<usize, StorageError> {
        let mut removed = 0;
        for statement in statements {
            let key = (
                statement.subject.clone(),
                statement.predicate.clone(),
                statement.object.clone(),
            );
            if self.statements.remove(&key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn remove_matching(&mut self, pattern: &StatementPattern) -> Result<usize, StorageError> {
        let before = self.statements.len();
        self.statements
            .retain(|(s, p, o), _| !pattern.matches_triple(s, p, o));
        Ok(before - self.statements.len())
    }

    fn matching(&self, pattern: &StatementPattern) -> Result<Vec<Statement>, StorageError> {
        Ok(self
            .matching_keys(pattern)
            .map(|((s, p, o), kind)| Statement::new(s.clone(), p.clone(), o.clone(), *kind))
            .collect())
    }

    fn range_count(&self, pattern: &StatementPattern) -> Result<u64, StorageError> {
        Ok(self.matching_keys(pattern).count() as u64)
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        self.commits += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.statements.clear();
        Ok(())
    }
}
