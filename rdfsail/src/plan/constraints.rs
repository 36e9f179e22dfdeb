// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Unresolved constraints of one pattern scope

use std::collections::BTreeSet;

use crate::ast::{Constraint, PatternTerm, Term};

use super::bindings::BoundVariables;

/// Constraints not yet placed in the plan, in their original relative order
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    pending: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn new(constraints: Vec<Constraint>) -> Self {
        Self {
            pending: constraints,
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Inline `?var = constant` equalities into the bound set and drop them.
    ///
    /// Only variables local to this scope are inlined. A variable that any
    /// optional child references is left alone: its equality has to be
    /// checked at outer-join time rather than short-circuited. The constant
    /// side may be a variable inlined earlier in the same pass.
    ///
    /// Returns the inlined assignments in the order they were made.
    pub fn inline_assignments(
        &mut self,
        local: &BTreeSet<String>,
        optional: &BTreeSet<String>,
        bound: &mut BoundVariables,
    ) -> Vec<(String, Term)> {
        let mut inlined = Vec::new();
        let mut kept = Vec::with_capacity(self.pending.len());

        for constraint in self.pending.drain(..) {
            if let Some((name, value)) = assignment(&constraint, bound) {
                if local.contains(&name) && !optional.contains(&name) {
                    log::debug!("inlining {} (constraint {})", name, constraint);
                    bound.assign(name.clone(), value.clone());
                    inlined.push((name, value));
                    continue;
                }
            }
            kept.push(constraint);
        }

        self.pending = kept;
        inlined
    }

    /// Remove and return every constraint whose variables are all bound
    pub fn take_satisfied(&mut self, bound: &BoundVariables) -> Vec<Constraint> {
        let (ready, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|constraint| bound.contains_all(&constraint.variables()));
        self.pending = waiting;
        ready
    }

    pub fn into_remaining(self) -> Vec<Constraint> {
        self.pending
    }
}

/// `(variable, value)` if the constraint equates an unbound variable with a
/// concrete value
fn assignment(constraint: &Constraint, bound: &BoundVariables) -> Option<(String, Term)> {
    let (left, right) = constraint.as_equality()?;

    let unbound_var = |term: &PatternTerm| -> Option<String> {
        term.as_var()
            .filter(|name| !bound.is_bound(name))
            .map(str::to_string)
    };

    if let (Some(name), Some(value)) = (unbound_var(left), bound.resolve(right)) {
        return Some((name, value.clone()));
    }
    if let (Some(value), Some(name)) = (bound.resolve(left), unbound_var(right)) {
        return Some((name, value.clone()));
    }
    None
}
