// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Boolean constraints over pattern variables

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::pattern::PatternTerm;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// A conjunctive filter attached to a graph pattern scope.
///
/// Only comparisons are inspected by the optimizer; everything else is an
/// opaque predicate that becomes evaluable once its variables are bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constraint {
    Compare {
        op: CompareOp,
        left: PatternTerm,
        right: PatternTerm,
    },
    Opaque {
        expression: String,
        variables: BTreeSet<String>,
    },
}

impl Constraint {
    pub fn compare(op: CompareOp, left: impl Into<PatternTerm>, right: impl Into<PatternTerm>) -> Self {
        Constraint::Compare {
            op,
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn eq(left: impl Into<PatternTerm>, right: impl Into<PatternTerm>) -> Self {
        Self::compare(CompareOp::Eq, left, right)
    }

    pub fn opaque<I, S>(expression: impl Into<String>, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Constraint::Opaque {
            expression: expression.into(),
            variables: variables.into_iter().map(Into::into).collect(),
        }
    }

    pub fn variables(&self) -> BTreeSet<String> {
        match self {
            Constraint::Compare { left, right, .. } => [left, right]
                .into_iter()
                .filter_map(|operand| operand.as_var().map(str::to_string))
                .collect(),
            Constraint::Opaque { variables, .. } => variables.clone(),
        }
    }

    /// Operands of an equality comparison
    pub fn as_equality(&self) -> Option<(&PatternTerm, &PatternTerm)> {
        match self {
            Constraint::Compare {
                op: CompareOp::Eq,
                left,
                right,
            } => Some((left, right)),
            _ => None,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Compare { op, left, right } => {
                write!(f, "{} {} {}", left, op.as_str(), right)
            }
            Constraint::Opaque { expression, .. } => write!(f, "{}", expression),
        }
    }
}
