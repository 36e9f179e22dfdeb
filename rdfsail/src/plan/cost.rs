// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cost model for join ordering
//!
//! Exact cardinalities beat the variable-count heuristic because they reflect
//! real data skew. The heuristic is the fallback for node kinds the estimator
//! cannot answer.

use crate::ast::TriplePattern;
use crate::storage::StatementPattern;

use super::bindings::BoundVariables;

/// Result of a range estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// Estimated or exact number of matching statements
    Known(u64),
    /// The pattern shape does not support estimation
    Unknown,
}

/// Range estimation contract.
///
/// Implementations must be a pure function of the current store state. A
/// probe may be expensive, so the optimizer calls it at most once per pattern
/// node per optimization pass.
pub trait RangeEstimator {
    fn estimate(&self, pattern: &StatementPattern) -> Cardinality;
}

/// Estimator that knows nothing; ordering falls back to the heuristic
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEstimates;

impl RangeEstimator for NoEstimates {
    fn estimate(&self, _pattern: &StatementPattern) -> Cardinality {
        Cardinality::Unknown
    }
}

/// Cost of evaluating one pattern node next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeCost {
    pub cardinality: Cardinality,
    /// Unbound variables, plus any kind penalty
    pub unbound: usize,
}

impl NodeCost {
    /// Strict comparison, so the first of two equal candidates wins
    pub fn is_cheaper_than(&self, other: &NodeCost) -> bool {
        match (self.cardinality, other.cardinality) {
            (Cardinality::Known(a), Cardinality::Known(b)) => a < b,
            (Cardinality::Known(_), Cardinality::Unknown) => true,
            (Cardinality::Unknown, Cardinality::Known(_)) => false,
            (Cardinality::Unknown, Cardinality::Unknown) => self.unbound < other.unbound,
        }
    }
}

/// Shape of a triple pattern as the estimator sees it: constants and inlined
/// values are bound positions, everything else is open
pub fn statement_pattern(triple: &TriplePattern, bound: &BoundVariables) -> StatementPattern {
    StatementPattern::new(
        bound.resolve(&triple.subject).cloned(),
        bound.resolve(&triple.predicate).cloned(),
        bound.resolve(&triple.object).cloned(),
    )
}
