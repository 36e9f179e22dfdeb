// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query planning for graph-pattern queries
//!
//! This module turns a pattern tree into a linear evaluation plan. It
//! includes the range-estimation contract, the bound-variable set threaded
//! through nested scopes, constraint inlining and scheduling, and the greedy
//! selectivity-driven join ordering.

pub mod bindings;
pub mod constraints;
pub mod cost;
pub mod error;
pub mod evaluation;
pub mod optimizer;
pub mod selector;

pub use bindings::BoundVariables;
pub use constraints::ConstraintSet;
pub use cost::{Cardinality, NoEstimates, NodeCost, RangeEstimator};
pub use error::PlanError;
pub use evaluation::{EvaluationPlan, PlanStep, QueryPlan};
pub use optimizer::GraphPatternOptimizer;
pub use selector::{Candidate, PatternSelector};
