// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! rdfsail - write/query coordination for RDF triple stores
//!
//! rdfsail sits between a client and a triple store and owns two concerns:
//!
//! - **Join ordering**: graph patterns are reordered so that the most selective
//!   triple pattern runs first, using range counts from the store when they are
//!   available and a bound-variable heuristic when they are not. Equality
//!   constraints against constants are inlined, and the remaining constraints
//!   are scheduled at the earliest point where all of their variables are bound.
//! - **Write buffering**: assertions and retractions are buffered inside a
//!   transaction and flushed before any read or commit, optionally keeping the
//!   RDFS closure of the store up to date (truth maintenance).
//!
//! # Usage
//!
//! ```no_run
//! use rdfsail::{MemoryTripleStore, SailConfig, StatementPattern, Term, TransactionCoordinator};
//!
//! let mut sail = TransactionCoordinator::new(MemoryTripleStore::new(), SailConfig::default())?;
//! sail.start_transaction()?;
//! sail.add_statement(
//!     Term::iri("http://ex/alice"),
//!     Term::iri("http://ex/knows"),
//!     Term::iri("http://ex/bob"),
//! )?;
//! let found = sail.get_statements(&StatementPattern::any())?;
//! assert_eq!(found.len(), 1);
//! sail.commit_transaction()?;
//! # Ok::<(), rdfsail::SailError>(())
//! ```

pub mod ast;
pub mod closure;
pub mod config;
pub mod coordinator;
pub mod functions;
pub mod plan;
pub mod storage;
pub mod txn;

pub use ast::{
    CompareOp, Constraint, GraphPattern, MembershipKind, MembershipPattern, PatternNode,
    PatternTerm, Query, SetOperator, Term, TriplePattern,
};
pub use closure::{ClosureEngine, ClosureStats, SubClassClosure};
pub use config::{ResidualPolicy, SailConfig};
pub use coordinator::{SailError, SailResult, TransactionCoordinator};
pub use functions::{AggregateError, MinAggregate};
pub use plan::{
    BoundVariables, Cardinality, EvaluationPlan, GraphPatternOptimizer, PlanError, PlanStep,
    QueryPlan, RangeEstimator,
};
pub use storage::{
    MemoryTripleStore, Statement, StatementKind, StatementPattern, StorageError, StoreEstimator,
    TripleStore,
};
pub use txn::{ChangeEvent, ChangeListener, StateError, TransactionId, TransactionState};

/// rdfsail version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// rdfsail crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
