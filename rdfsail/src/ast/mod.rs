// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Pattern tree for graph-pattern queries
//!
//! This module provides the in-memory query representation consumed by the
//! optimizer:
//! - RDF terms (IRIs, blank nodes, literals)
//! - Triple patterns and the direct-membership patterns
//! - Graph patterns with nested optional scopes
//! - Boolean constraints over pattern variables
//! - Set operators composing whole queries

pub mod constraint;
pub mod pattern;
pub mod term;

pub use constraint::{CompareOp, Constraint};
pub use pattern::{
    GraphPattern, MembershipKind, MembershipPattern, PatternNode, PatternTerm, Query, SetOperator,
    TriplePattern,
};
pub use term::{vocab, Term};
