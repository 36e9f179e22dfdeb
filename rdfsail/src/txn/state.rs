// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Transaction state machine
//!
//! Transitions are pure: [`TransactionState::apply`] returns the next state
//! and the side effects the coordinator must perform, in order. The
//! coordinator only adopts the next state once every effect succeeded.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Generate a new random transaction ID
    pub fn new() -> Self {
        TransactionId(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "txn_{}", self.0)
    }
}

/// Transaction protocol violations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    #[error("A transaction is already active")]
    AlreadyActive,

    #[error("No active transaction")]
    NotActive,

    #[error("Transaction aborted after repeated flush failures; abandon it first")]
    Aborted,

    #[error("Only an aborted transaction can be abandoned")]
    NotAborted,
}

/// Coordinator lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransactionState {
    #[default]
    Idle,
    Active,
    /// A flush failed twice in a row; only abandoning is allowed
    Aborted,
}

/// Inputs to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionEvent {
    Start,
    Commit,
    /// Fatal flush failure
    Abort,
    Abandon,
}

/// Side effects a transition requires, executed in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ResetChangeFlags,
    FlushBuffers,
    CommitStore,
    NotifyListeners,
    DiscardBuffers,
}

impl TransactionState {
    pub fn apply(
        self,
        event: TransactionEvent,
    ) -> Result<(TransactionState, Vec<Effect>), StateError> {
        use TransactionEvent as E;
        use TransactionState as S;

        match (self, event) {
            (S::Idle, E::Start) => Ok((S::Active, vec![Effect::ResetChangeFlags])),
            (S::Active, E::Start) => Err(StateError::AlreadyActive),

            (S::Active, E::Commit) => Ok((
                S::Idle,
                vec![
                    Effect::FlushBuffers,
                    Effect::CommitStore,
                    Effect::NotifyListeners,
                ],
            )),
            (S::Idle, E::Commit) => Err(StateError::NotActive),

            (S::Active, E::Abort) => Ok((S::Aborted, Vec::new())),
            (S::Idle, E::Abort) => Err(StateError::NotActive),

            (S::Aborted, E::Abandon) => Ok((S::Idle, vec![Effect::DiscardBuffers])),
            (S::Idle | S::Active, E::Abandon) => Err(StateError::NotAborted),

            (S::Aborted, _) => Err(StateError::Aborted),
        }
    }

    /// Gate for operations that need an open transaction
    pub fn require_active(self) -> Result<(), StateError> {
        match self {
            TransactionState::Active => Ok(()),
            TransactionState::Idle => Err(StateError::NotActive),
            TransactionState::Aborted => Err(StateError::Aborted),
        }
    }

    pub fn is_active(self) -> bool {
        self == TransactionState::Active
    }
}
