// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Coordinator error types

use thiserror::Error;

use crate::plan::PlanError;
use crate::storage::StorageError;
use crate::txn::{BufferKind, StateError};

/// Errors surfaced by the coordinator's public operations
#[derive(Error, Debug)]
pub enum SailError {
    #[error("Transaction state error: {0}")]
    State(#[from] StateError),

    #[error("Planning error: {0}")]
    Plan(#[from] PlanError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A buffer flush failed; the buffer still holds its statements.
    /// The second consecutive failure aborts the transaction.
    #[error("Flush of {buffer} buffer failed (attempt {attempt}): {source}")]
    FlushFailed {
        buffer: BufferKind,
        attempt: u32,
        #[source]
        source: StorageError,
    },

    #[error("Closure error: {0}")]
    Closure(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Listener error: {0}")]
    Listener(String),
}

impl SailError {
    /// The protocol violation behind this error, if any
    pub fn state_error(&self) -> Option<StateError> {
        match self {
            SailError::State(err) => Some(*err),
            _ => None,
        }
    }
}

/// Result type for coordinator operations
pub type SailResult<T> = Result<T, SailError>;
