// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Statement data structures and error types

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::ast::Term;

/// Error types for store and closure operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Whether a statement was asserted by a client or derived by closure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    Explicit,
    Inferred,
}

/// A stored fact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
    pub kind: StatementKind,
}

impl Statement {
    pub fn new(subject: Term, predicate: Term, object: Term, kind: StatementKind) -> Self {
        Self {
            subject,
            predicate,
            object,
            kind,
        }
    }

    pub fn explicit(subject: Term, predicate: Term, object: Term) -> Self {
        Self::new(subject, predicate, object, StatementKind::Explicit)
    }

    pub fn inferred(subject: Term, predicate: Term, object: Term) -> Self {
        Self::new(subject, predicate, object, StatementKind::Inferred)
    }

    pub fn is_explicit(&self) -> bool {
        self.kind == StatementKind::Explicit
    }

    /// The (s, p, o) triple, ignoring the explicit/inferred marker
    pub fn triple(&self) -> (&Term, &Term, &Term) {
        (&self.subject, &self.predicate, &self.object)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.subject, self.predicate, self.object)
    }
}

/// A triple pattern with concrete bound positions; `None` matches anything
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatementPattern {
    pub subject: Option<Term>,
    pub predicate: Option<Term>,
    pub object: Option<Term>,
}

impl StatementPattern {
    pub fn new(subject: Option<Term>, predicate: Option<Term>, object: Option<Term>) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Matches every statement
    pub fn any() -> Self {
        Self::default()
    }

    /// Fully bound pattern matching a single triple
    pub fn exact(subject: Term, predicate: Term, object: Term) -> Self {
        Self::new(Some(subject), Some(predicate), Some(object))
    }

    pub fn bound_positions(&self) -> usize {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .filter(|position| position.is_some())
            .count()
    }

    pub fn matches(&self, statement: &Statement) -> bool {
        self.matches_triple(&statement.subject, &statement.predicate, &statement.object)
    }

    pub fn matches_triple(&self, subject: &Term, predicate: &Term, object: &Term) -> bool {
        fn position_matches(bound: &Option<Term>, value: &Term) -> bool {
            bound.as_ref().map_or(true, |term| term == value)
        }

        position_matches(&self.subject, subject)
            && position_matches(&self.predicate, predicate)
            && position_matches(&self.object, object)
    }
}

impl fmt::Display for StatementPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |position: &Option<Term>| {
            position
                .as_ref()
                .map_or_else(|| "*".to_string(), |term| term.to_string())
        };
        write!(
            f,
            "({} {} {})",
            show(&self.subject),
            show(&self.predicate),
            show(&self.object)
        )
    }
}
