// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Transaction support
//!
//! This module provides:
//! - The Idle/Active/Aborted state machine with pure transitions
//! - Assert and retract statement buffers
//! - Change flags and the listener registry notified on commit

pub mod buffer;
pub mod listener;
pub mod state;

pub use buffer::{BufferKind, FlushOutcome, StatementBuffer};
pub use listener::{ChangeEvent, ChangeFlags, ChangeListener, ListenerRegistry};
pub use state::{Effect, StateError, TransactionEvent, TransactionId, TransactionState};
