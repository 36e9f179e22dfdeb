// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Selectivity-driven graph pattern optimizer
//!
//! Produces a linear plan for each scope of a pattern tree:
//!
//! 1. Optional children are optimized first, each against a private copy of
//!    the parent's bound variables plus the parent's local variables.
//! 2. Equalities between a local variable and a constant are inlined.
//! 3. Ordinary nodes are placed greedily, most selective first, with each
//!    constraint emitted right after the node that completes its variables.
//! 4. Optional groups are placed the same way, each as a single unit.
//! 5. Constraints that never became evaluable are a planning error (or are
//!    appended with a warning under [`ResidualPolicy::AppendWithWarning`]).

use crate::ast::{GraphPattern, PatternNode, Query};
use crate::config::ResidualPolicy;

use super::bindings::BoundVariables;
use super::constraints::ConstraintSet;
use super::cost::RangeEstimator;
use super::error::PlanError;
use super::evaluation::{EvaluationPlan, PlanStep, QueryPlan};
use super::selector::{Candidate, PatternSelector};

/// Orders the conjuncts of graph patterns by estimated selectivity
pub struct GraphPatternOptimizer<'e> {
    estimator: &'e dyn RangeEstimator,
    residual_policy: ResidualPolicy,
}

impl<'e> GraphPatternOptimizer<'e> {
    pub fn new(estimator: &'e dyn RangeEstimator) -> Self {
        Self {
            estimator,
            residual_policy: ResidualPolicy::default(),
        }
    }

    pub fn with_residual_policy(mut self, residual_policy: ResidualPolicy) -> Self {
        self.residual_policy = residual_policy;
        self
    }

    /// Optimize every graph pattern of a query. Set operator branches are
    /// planned independently; no bindings cross between them.
    pub fn optimize_query(&self, query: &Query) -> Result<QueryPlan, PlanError> {
        match query {
            Query::Pattern(pattern) => Ok(QueryPlan::Pattern(
                self.optimize(pattern, &BoundVariables::new())?,
            )),
            Query::SetOperation {
                operator,
                left,
                right,
            } => Ok(QueryPlan::SetOperation {
                operator: *operator,
                left: Box::new(self.optimize_query(left)?),
                right: Box::new(self.optimize_query(right)?),
            }),
        }
    }

    /// Optimize one graph pattern given the variables already bound by the
    /// caller. The caller's set is not modified.
    pub fn optimize(
        &self,
        pattern: &GraphPattern,
        bound: &BoundVariables,
    ) -> Result<EvaluationPlan, PlanError> {
        self.optimize_scope(pattern, bound.clone())
    }

    fn optimize_scope(
        &self,
        pattern: &GraphPattern,
        mut bound: BoundVariables,
    ) -> Result<EvaluationPlan, PlanError> {
        let local = pattern.local_variables();

        let mut child_scope = bound.clone();
        child_scope.bind_all(local.iter().cloned());

        let mut ordinary = Vec::new();
        let mut optionals = Vec::new();
        for (id, node) in pattern.nodes.iter().enumerate() {
            let candidate = Candidate { id, node };
            match node {
                PatternNode::Triple(triple) => {
                    ordinary.push((candidate, PlanStep::Triple(triple.clone())))
                }
                PatternNode::Membership(membership) => {
                    ordinary.push((candidate, PlanStep::Membership(membership.clone())))
                }
                PatternNode::Optional(group) => {
                    let plan = self.optimize_scope(group, child_scope.clone())?;
                    optionals.push((candidate, PlanStep::Optional(plan)));
                }
            }
        }

        let mut constraints = ConstraintSet::new(pattern.constraints.clone());
        let inlined =
            constraints.inline_assignments(&local, &pattern.optional_variables(), &mut bound);

        let mut plan = EvaluationPlan {
            steps: Vec::with_capacity(pattern.nodes.len() + pattern.constraints.len()),
            bindings: inlined.into_iter().collect(),
        };

        // Constraints that are evaluable before any node runs
        plan.steps.extend(
            constraints
                .take_satisfied(&bound)
                .into_iter()
                .map(PlanStep::Constraint),
        );

        let mut selector = PatternSelector::new(self.estimator);
        place(&mut selector, ordinary, &mut bound, &mut constraints, &mut plan);
        place(&mut selector, optionals, &mut bound, &mut constraints, &mut plan);

        let residual = constraints.into_remaining();
        if !residual.is_empty() {
            match self.residual_policy {
                ResidualPolicy::Reject => {
                    return Err(PlanError::UnresolvedConstraints {
                        constraints: residual,
                    })
                }
                ResidualPolicy::AppendWithWarning => {
                    log::warn!(
                        "{} constraint(s) could not be scheduled and were appended to the plan",
                        residual.len()
                    );
                    plan.steps
                        .extend(residual.into_iter().map(PlanStep::Constraint));
                }
            }
        }

        log::debug!(
            "optimized scope: {} pattern step(s), {} constraint(s), {} estimator probe(s)",
            plan.pattern_count(),
            plan.constraint_count(),
            selector.probe_count()
        );
        Ok(plan)
    }
}

/// Greedily move every unit into the plan, interleaving the constraints that
/// each placement makes evaluable
fn place(
    selector: &mut PatternSelector<'_>,
    mut units: Vec<(Candidate<'_>, PlanStep)>,
    bound: &mut BoundVariables,
    constraints: &mut ConstraintSet,
    plan: &mut EvaluationPlan,
) {
    while let Some(position) = selector.select(units.iter().map(|(candidate, _)| candidate), bound)
    {
        let (candidate, step) = units.remove(position);
        bound.bind_all(candidate.node.variables());
        plan.steps.push(step);
        plan.steps.extend(
            constraints
                .take_satisfied(bound)
                .into_iter()
                .map(PlanStep::Constraint),
        );
    }
}
