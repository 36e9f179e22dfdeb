// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Transaction coordination
//!
//! The coordinator is the single owner of the transaction state and of the
//! assert/retract buffers. It enforces the flush ordering between the two
//! buffers and flushes before every read and commit.

pub mod error;
pub mod transaction_coordinator;

pub use error::{SailError, SailResult};
pub use transaction_coordinator::TransactionCoordinator;
