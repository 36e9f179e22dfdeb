// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Triple store collaborator interface
//!
//! This module provides:
//! - Statement and statement-pattern types shared by the write path and the planner
//! - The `TripleStore` trait the coordinator flushes into
//! - An in-memory reference store with exact range counts
//! - An adapter exposing any store as a range estimator for the optimizer

mod estimator;
pub mod memory;
pub mod types;

pub use estimator::StoreEstimator;
pub use memory::MemoryTripleStore;
pub use types::{Statement, StatementKind, StatementPattern, StorageError};

/// Storage backend contract.
///
/// Deduplication and normalization of statements are the store's concern:
/// adding a statement that is already present must not create a duplicate.
pub trait TripleStore {
    /// Apply a batch of assertions, returning how many statements were new
    fn add_statements(&mut self, statements: &[Statement]) -> Result<usize, StorageError>;

    /// Delete exactly the given statements, returning how many were present
    fn remove_statements(&mut self, statements: &[Statement]) -> Result<usize, StorageError>;

    /// Delete every statement matching the pattern, explicit or inferred
    fn remove_matching(&mut self, pattern: &StatementPattern) -> Result<usize, StorageError>;

    /// Visit the statements matching the pattern (the pattern's access path)
    fn matching(&self, pattern: &StatementPattern) -> Result<Vec<Statement>, StorageError>;

    /// Estimated or exact number of statements matching the pattern
    fn range_count(&self, pattern: &StatementPattern) -> Result<u64, StorageError>;

    fn contains(&self, pattern: &StatementPattern) -> Result<bool, StorageError> {
        Ok(self.range_count(pattern)? > 0)
    }

    fn commit(&mut self) -> Result<(), StorageError>;

    /// Drop every statement
    fn clear(&mut self) -> Result<(), StorageError>;
}
