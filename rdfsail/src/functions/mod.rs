// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Aggregate folds over solution values

pub mod aggregate;

pub use aggregate::{AggregateError, AggregateResult, MinAggregate};
