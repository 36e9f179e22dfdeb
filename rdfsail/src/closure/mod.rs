// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Closure (derived fact) maintenance
//!
//! The coordinator only decides *when* closure runs. The inference rules
//! belong to a [`ClosureEngine`]; [`SubClassClosure`] is a small engine for
//! class hierarchies.

pub mod subclass;

pub use subclass::SubClassClosure;

use crate::storage::{Statement, StorageError, TripleStore};

/// Work done by one closure call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClosureStats {
    /// Inferred statements written to the store
    pub inferred_added: usize,
    /// Statements deleted from the store, explicit and inferred
    pub removed: usize,
}

/// Inference engine invoked by buffer flushes under truth maintenance
pub trait ClosureEngine {
    /// Materialize facts derivable from `focus`, which has already been
    /// written to the store. `None` recomputes over the whole store.
    fn compute_closure(
        &mut self,
        store: &mut dyn TripleStore,
        focus: Option<&[Statement]>,
    ) -> Result<ClosureStats, StorageError>;

    /// Delete the retracted explicit statements together with every inferred
    /// statement that loses its support
    fn retract(
        &mut self,
        store: &mut dyn TripleStore,
        retracted: &[Statement],
    ) -> Result<ClosureStats, StorageError>;
}
