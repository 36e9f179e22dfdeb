// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Class hierarchy closure
//!
//! Two rules:
//! - `(a subClassOf b) (b subClassOf c) => (a subClassOf c)`
//! - `(x type a) (a subClassOf b) => (x type b)`
//!
//! Additions are handled semi-naively from the focus set. Retraction deletes
//! every inferred statement and recomputes from the explicit ones.

use crate::ast::vocab::{RDFS_SUBCLASS_OF, RDF_TYPE};
use crate::ast::Term;
use crate::storage::{Statement, StatementPattern, StorageError, TripleStore};

use super::{ClosureEngine, ClosureStats};

#[derive(Debug, Clone)]
pub struct SubClassClosure {
    rdf_type: Term,
    sub_class_of: Term,
    runs: u64,
}

impl Default for SubClassClosure {
    fn default() -> Self {
        Self::new()
    }
}

impl SubClassClosure {
    pub fn new() -> Self {
        Self {
            rdf_type: Term::iri(RDF_TYPE),
            sub_class_of: Term::iri(RDFS_SUBCLASS_OF),
            runs: 0,
        }
    }

    /// Number of closure computations run so far, including those triggered
    /// by retraction
    pub fn runs(&self) -> u64 {
        self.runs
    }

    fn is_relevant(&self, statement: &Statement) -> bool {
        statement.predicate == self.rdf_type || statement.predicate == self.sub_class_of
    }

    /// Facts derivable from `fact` joined against the store
    fn derive(
        &self,
        store: &dyn TripleStore,
        fact: &Statement,
    ) -> Result<Vec<Statement>, StorageError> {
        let mut derived = Vec::new();

        if fact.predicate == self.sub_class_of {
            let (sub, sup) = (&fact.subject, &fact.object);

            // (sub < sup) (sup < c) => (sub < c)
            for above in store.matching(&StatementPattern::new(
                Some(sup.clone()),
                Some(self.sub_class_of.clone()),
                None,
            ))? {
                derived.push(Statement::inferred(
                    sub.clone(),
                    self.sub_class_of.clone(),
                    above.object,
                ));
            }
            // (z < sub) (sub < sup) => (z < sup)
            for below in store.matching(&StatementPattern::new(
                None,
                Some(self.sub_class_of.clone()),
                Some(sub.clone()),
            ))? {
                derived.push(Statement::inferred(
                    below.subject,
                    self.sub_class_of.clone(),
                    sup.clone(),
                ));
            }
            // (x type sub) (sub < sup) => (x type sup)
            for member in store.matching(&StatementPattern::new(
                None,
                Some(self.rdf_type.clone()),
                Some(sub.clone()),
            ))? {
                derived.push(Statement::inferred(
                    member.subject,
                    self.rdf_type.clone(),
                    sup.clone(),
                ));
            }
        } else if fact.predicate == self.rdf_type {
            for above in store.matching(&StatementPattern::new(
                Some(fact.object.clone()),
                Some(self.sub_class_of.clone()),
                None,
            ))? {
                derived.push(Statement::inferred(
                    fact.subject.clone(),
                    self.rdf_type.clone(),
                    above.object,
                ));
            }
        }

        Ok(derived)
    }

    fn saturate(
        &self,
        store: &mut dyn TripleStore,
        mut delta: Vec<Statement>,
    ) -> Result<usize, StorageError> {
        let mut added = 0;

        while !delta.is_empty() {
            let mut next = Vec::new();
            for fact in &delta {
                for candidate in self.derive(&*store, fact)? {
                    let (s, p, o) = candidate.triple();
                    let key = StatementPattern::exact(s.clone(), p.clone(), o.clone());
                    if store.contains(&key)? {
                        continue;
                    }
                    added += store.add_statements(std::slice::from_ref(&candidate))?;
                    next.push(candidate);
                }
            }
            delta = next;
        }

        Ok(added)
    }
}

impl ClosureEngine for SubClassClosure {
    fn compute_closure(
        &mut self,
        store: &mut dyn TripleStore,
        focus: Option<&[Statement]>,
    ) -> Result<ClosureStats, StorageError> {
        self.runs += 1;

        let delta: Vec<Statement> = match focus {
            Some(statements) => statements
                .iter()
                .filter(|statement| self.is_relevant(statement))
                .cloned()
                .collect(),
            None => {
                let mut all = store.matching(&StatementPattern::new(
                    None,
                    Some(self.sub_class_of.clone()),
                    None,
                ))?;
                all.extend(store.matching(&StatementPattern::new(
                    None,
                    Some(self.rdf_type.clone()),
                    None,
                ))?);
                all
            }
        };

        let inferred_added = self.saturate(store, delta)?;
        log::debug!("closure added {} inferred statement(s)", inferred_added);
        Ok(ClosureStats {
            inferred_added,
            removed: 0,
        })
    }

    fn retract(
        &mut self,
        store: &mut dyn TripleStore,
        retracted: &[Statement],
    ) -> Result<ClosureStats, StorageError> {
        let mut removed = store.remove_statements(retracted)?;

        let inferred: Vec<Statement> = store
            .matching(&StatementPattern::any())?
            .into_iter()
            .filter(|statement| !statement.is_explicit())
            .collect();
        removed += store.remove_statements(&inferred)?;

        let mut stats = self.compute_closure(store, None)?;
        stats.removed = removed;
        log::debug!(
            "retraction removed {} statement(s), re-derived {}",
            stats.removed,
            stats.inferred_added
        );
        Ok(stats)
    }
}
