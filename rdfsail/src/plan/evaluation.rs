// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Linear evaluation plans produced by the optimizer

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::ast::{Constraint, MembershipPattern, SetOperator, Term, TriplePattern};

/// One step of an evaluation plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlanStep {
    Triple(TriplePattern),
    Membership(MembershipPattern),
    /// An optional group, evaluated as a unit with its own plan
    Optional(EvaluationPlan),
    Constraint(Constraint),
}

impl PlanStep {
    pub fn is_constraint(&self) -> bool {
        matches!(self, PlanStep::Constraint(_))
    }
}

/// Ordered plan for one graph pattern scope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationPlan {
    pub steps: Vec<PlanStep>,
    /// Variables bound to constants by inlining in this scope
    pub bindings: BTreeMap<String, Term>,
}

impl EvaluationPlan {
    /// Number of pattern steps (triples, memberships, optional groups)
    pub fn pattern_count(&self) -> usize {
        self.steps.iter().filter(|step| !step.is_constraint()).count()
    }

    pub fn constraint_count(&self) -> usize {
        self.steps.iter().filter(|step| step.is_constraint()).count()
    }

    pub fn triples(&self) -> impl Iterator<Item = &TriplePattern> {
        self.steps.iter().filter_map(|step| match step {
            PlanStep::Triple(triple) => Some(triple),
            _ => None,
        })
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        for (name, value) in &self.bindings {
            writeln!(f, "{}BIND ?{} := {}", indent, name, value)?;
        }
        for step in &self.steps {
            match step {
                PlanStep::Triple(triple) => writeln!(f, "{}{}", indent, triple)?,
                PlanStep::Membership(membership) => writeln!(f, "{}{}", indent, membership)?,
                PlanStep::Constraint(constraint) => {
                    writeln!(f, "{}FILTER {}", indent, constraint)?
                }
                PlanStep::Optional(plan) => {
                    writeln!(f, "{}OPTIONAL {{", indent)?;
                    plan.fmt_indented(f, depth + 1)?;
                    writeln!(f, "{}}}", indent)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for EvaluationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

/// Optimized form of a [`crate::ast::Query`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryPlan {
    Pattern(EvaluationPlan),
    SetOperation {
        operator: SetOperator,
        left: Box<QueryPlan>,
        right: Box<QueryPlan>,
    },
}

impl QueryPlan {
    pub fn as_pattern(&self) -> Option<&EvaluationPlan> {
        match self {
            QueryPlan::Pattern(plan) => Some(plan),
            QueryPlan::SetOperation { .. } => None,
        }
    }
}

impl fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryPlan::Pattern(plan) => write!(f, "{}", plan),
            QueryPlan::SetOperation {
                operator,
                left,
                right,
            } => write!(f, "{{\n{}}}\n{}\n{{\n{}}}\n", left, operator, right),
        }
    }
}
