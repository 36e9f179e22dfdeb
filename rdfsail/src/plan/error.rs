// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Planning error types

use thiserror::Error;

use crate::ast::Constraint;

/// Planning errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// Constraints whose variables never become bound in their scope, e.g. a
    /// filter on a variable that only a sibling optional group binds
    #[error(
        "{} constraint(s) could not be placed in the plan: {}",
        .constraints.len(),
        describe(.constraints)
    )]
    UnresolvedConstraints { constraints: Vec<Constraint> },
}

fn describe(constraints: &[Constraint]) -> String {
    constraints
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
