// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Greedy selection of the next pattern node

use std::collections::HashMap;

use crate::ast::PatternNode;

use super::bindings::BoundVariables;
use super::cost::{statement_pattern, Cardinality, NodeCost, RangeEstimator};

/// Extra unbound variables charged to direct-membership patterns, which are
/// more expensive to evaluate than a plain index scan
pub const MEMBERSHIP_PENALTY: usize = 1;

/// A pattern node still waiting to be placed
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'p> {
    /// Position in the scope's original node list; keys the estimate cache
    pub id: usize,
    pub node: &'p PatternNode,
}

/// Picks the most selective remaining node for one optimization pass.
///
/// Range estimates are memoized per node id, so the estimator is probed at
/// most once per node for the lifetime of the selector.
pub struct PatternSelector<'e> {
    estimator: &'e dyn RangeEstimator,
    estimates: HashMap<usize, Cardinality>,
}

impl<'e> PatternSelector<'e> {
    pub fn new(estimator: &'e dyn RangeEstimator) -> Self {
        Self {
            estimator,
            estimates: HashMap::new(),
        }
    }

    /// Number of distinct nodes the estimator has been asked about
    pub fn probe_count(&self) -> usize {
        self.estimates.len()
    }

    pub fn cost(&mut self, candidate: &Candidate<'_>, bound: &BoundVariables) -> NodeCost {
        match candidate.node {
            PatternNode::Triple(triple) => {
                let estimator = self.estimator;
                let cardinality = *self
                    .estimates
                    .entry(candidate.id)
                    .or_insert_with(|| estimator.estimate(&statement_pattern(triple, bound)));
                NodeCost {
                    cardinality,
                    unbound: bound.count_unbound(&triple.variables()),
                }
            }
            PatternNode::Membership(membership) => NodeCost {
                cardinality: Cardinality::Unknown,
                unbound: bound.count_unbound(&membership.variables()) + MEMBERSHIP_PENALTY,
            },
            PatternNode::Optional(group) => NodeCost {
                cardinality: Cardinality::Unknown,
                unbound: bound.count_unbound(&group.variables()),
            },
        }
    }

    /// Position of the cheapest candidate, or `None` when there are none.
    /// Ties resolve to the earliest candidate.
    pub fn select<'c, 'p: 'c, I>(&mut self, candidates: I, bound: &BoundVariables) -> Option<usize>
    where
        I: IntoIterator<Item = &'c Candidate<'p>>,
    {
        let mut best: Option<(usize, NodeCost)> = None;

        for (position, candidate) in candidates.into_iter().enumerate() {
            let cost = self.cost(candidate, bound);
            let better = match &best {
                None => true,
                Some((_, best_cost)) => cost.is_cheaper_than(best_cost),
            };
            if better {
                best = Some((position, cost));
            }
        }

        if let Some((position, cost)) = &best {
            log::debug!(
                "selected candidate #{} (cardinality {:?}, unbound {})",
                position,
                cost.cardinality,
                cost.unbound
            );
        }
        best.map(|(position, _)| position)
    }
}
