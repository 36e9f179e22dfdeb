// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Bound-variable set threaded through the optimizer
//!
//! Each scope owns its own copy. Nested optional scopes receive a clone, so
//! bindings flow from parent to child and never back up or sideways.

use std::collections::{BTreeMap, BTreeSet};

use crate::ast::{PatternTerm, Term};

/// Variables known to be bound at a point in the plan, with the constant
/// values of those bound by inlining
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundVariables {
    names: BTreeSet<String>,
    values: BTreeMap<String, Term>,
}

impl BoundVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            values: BTreeMap::new(),
        }
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn bind(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn bind_all<I: IntoIterator<Item = String>>(&mut self, names: I) {
        self.names.extend(names);
    }

    /// Bind a variable to a constant. A variable that is already bound keeps
    /// its binding and `false` is returned.
    pub fn assign(&mut self, name: impl Into<String>, value: Term) -> bool {
        let name = name.into();
        if self.names.contains(&name) {
            return false;
        }
        self.names.insert(name.clone());
        self.values.insert(name, value);
        true
    }

    pub fn value(&self, name: &str) -> Option<&Term> {
        self.values.get(name)
    }

    /// Constant values introduced by inlining
    pub fn values(&self) -> &BTreeMap<String, Term> {
        &self.values
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains_all(&self, variables: &BTreeSet<String>) -> bool {
        variables.iter().all(|name| self.names.contains(name))
    }

    /// Number of the given variables that are not yet bound
    pub fn count_unbound<'a, I>(&self, variables: I) -> usize
    where
        I: IntoIterator<Item = &'a String>,
    {
        variables
            .into_iter()
            .filter(|name| !self.names.contains(*name))
            .count()
    }

    /// The concrete value at a pattern position: the constant itself, or the
    /// value a variable was inlined to
    pub fn resolve<'a>(&'a self, term: &'a PatternTerm) -> Option<&'a Term> {
        match term {
            PatternTerm::Const(value) => Some(value),
            PatternTerm::Var(name) => self.values.get(name),
        }
    }
}
