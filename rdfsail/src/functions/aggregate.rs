// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! MIN aggregate with a sticky first error

use std::cmp::Ordering;
use thiserror::Error;

use crate::ast::Term;

/// Errors raised while evaluating an aggregate's input expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregateError {
    #[error("Invalid argument type: {message}")]
    InvalidArgumentType { message: String },

    #[error("Expression evaluation failed: {message}")]
    EvaluationFailed { message: String },
}

/// Result type for aggregate folds
pub type AggregateResult<T> = Result<T, AggregateError>;

/// Running minimum over the values of one variable.
///
/// Values are ordered the way ORDER BY orders them (see [`Term::sort_cmp`]);
/// unbound values are skipped. The first error observed is latched: every
/// later `observe` and `done` returns it until `reset`.
#[derive(Debug, Clone, Default)]
pub struct MinAggregate {
    min: Option<Term>,
    first_error: Option<AggregateError>,
}

impl MinAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one evaluated input. `Ok(None)` is an unbound value.
    pub fn observe(&mut self, value: AggregateResult<Option<Term>>) -> AggregateResult<Option<&Term>> {
        if let Some(err) = &self.first_error {
            return Err(err.clone());
        }

        match value {
            Err(err) => {
                log::debug!("MIN latched error: {}", err);
                self.first_error = Some(err.clone());
                Err(err)
            }
            Ok(None) => Ok(self.min.as_ref()),
            Ok(Some(term)) => {
                let smaller = match &self.min {
                    None => true,
                    Some(current) => term.sort_cmp(current) == Ordering::Less,
                };
                if smaller {
                    self.min = Some(term);
                }
                Ok(self.min.as_ref())
            }
        }
    }

    /// Final value; `None` when no bound value was observed
    pub fn done(&self) -> AggregateResult<Option<Term>> {
        match &self.first_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.min.clone()),
        }
    }

    pub fn reset(&mut self) {
        self.min = None;
        self.first_error = None;
    }
}
