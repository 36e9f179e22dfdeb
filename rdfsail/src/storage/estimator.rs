// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Range-count estimation backed by a triple store

use super::types::StatementPattern;
use super::TripleStore;
use crate::plan::{Cardinality, RangeEstimator};

/// Exposes a store's `range_count` as a [`RangeEstimator`].
///
/// A probe that fails is reported as `Unknown` so the optimizer falls back
/// to its variable-count heuristic instead of failing the query.
pub struct StoreEstimator<'a, S: TripleStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: TripleStore + ?Sized> StoreEstimator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }
}

impl<S: TripleStore + ?Sized> RangeEstimator for StoreEstimator<'_, S> {
    fn estimate(&self, pattern: &StatementPattern) -> Cardinality {
        match self.store.range_count(pattern) {
            Ok(count) => {
                log::debug!(
                    "rangeCount: {} : {} ({} bound)",
                    count,
                    pattern,
                    pattern.bound_positions()
                );
                Cardinality::Known(count)
            }
            Err(e) => {
                log::debug!("rangeCount unavailable for {}: {}", pattern, e);
                Cardinality::Unknown
            }
        }
    }
}
