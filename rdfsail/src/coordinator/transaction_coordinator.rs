// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Transaction Coordinator - buffered writes and flush-before-read
//!
//! Flush ordering between the two buffers:
//! - before an assertion is buffered, pending retractions are flushed
//! - before a removal, pending assertions are flushed
//! - every read and every commit flushes assertions, then retractions
//!
//! With truth maintenance on, each flush also runs the closure engine, so
//! closure is never computed against a store with outstanding writes in the
//! other direction.

use std::sync::Arc;

use crate::ast::{Query, Term};
use crate::closure::{ClosureEngine, ClosureStats};
use crate::config::SailConfig;
use crate::plan::{GraphPatternOptimizer, QueryPlan};
use crate::storage::{Statement, StatementPattern, StoreEstimator, TripleStore};
use crate::txn::{
    BufferKind, ChangeFlags, ChangeListener, Effect, ListenerRegistry, StateError,
    StatementBuffer, TransactionEvent, TransactionId, TransactionState,
};

use super::error::{SailError, SailResult};

/// Consecutive flush failures after which the transaction is aborted
const MAX_FLUSH_ATTEMPTS: u32 = 2;

/// Owns the transaction state and both statement buffers for one store.
///
/// Not meant for concurrent use: one transaction at a time, driven from a
/// single thread of control.
pub struct TransactionCoordinator<S: TripleStore> {
    store: S,
    closure: Option<Box<dyn ClosureEngine>>,
    config: SailConfig,
    state: TransactionState,
    transaction_id: Option<TransactionId>,
    assert_buffer: StatementBuffer,
    retract_buffer: StatementBuffer,
    changes: ChangeFlags,
    listeners: ListenerRegistry,
    consecutive_flush_failures: u32,
}

impl<S: TripleStore> TransactionCoordinator<S> {
    /// Coordinator without a closure engine. Fails if the configuration asks
    /// for truth maintenance.
    pub fn new(store: S, config: SailConfig) -> SailResult<Self> {
        config.validate()?;
        if config.truth_maintenance {
            return Err(SailError::Config(
                "truth maintenance requires a closure engine".to_string(),
            ));
        }
        Ok(Self::build(store, None, config))
    }

    pub fn with_closure<E>(store: S, engine: E, config: SailConfig) -> SailResult<Self>
    where
        E: ClosureEngine + 'static,
    {
        config.validate()?;
        Ok(Self::build(store, Some(Box::new(engine)), config))
    }

    fn build(store: S, closure: Option<Box<dyn ClosureEngine>>, config: SailConfig) -> Self {
        let capacity = config.buffer_capacity;
        Self {
            store,
            closure,
            config,
            state: TransactionState::Idle,
            transaction_id: None,
            assert_buffer: StatementBuffer::new(BufferKind::Assert, capacity),
            retract_buffer: StatementBuffer::new(BufferKind::Retract, capacity),
            changes: ChangeFlags::default(),
            listeners: ListenerRegistry::new(),
            consecutive_flush_failures: 0,
        }
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    pub fn config(&self) -> &SailConfig {
        &self.config
    }

    /// The underlying store, without flushing
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn pending_assertions(&self) -> usize {
        self.assert_buffer.len()
    }

    pub fn pending_retractions(&self) -> usize {
        self.retract_buffer.len()
    }

    pub fn start_transaction(&mut self) -> SailResult<TransactionId> {
        let (next, effects) = self.state.apply(TransactionEvent::Start)?;
        self.run_effects(&effects)?;
        self.state = next;
        self.consecutive_flush_failures = 0;

        let id = TransactionId::new();
        self.transaction_id = Some(id);
        log::info!("Started transaction {}", id);
        Ok(id)
    }

    /// Buffer an explicit statement. Pending retractions are flushed first
    /// so the assertion cannot mask a retraction of the same fact.
    pub fn add_statement(&mut self, subject: Term, predicate: Term, object: Term) -> SailResult<()> {
        self.state.require_active()?;
        self.flush_buffer(BufferKind::Retract)?;
        if self.assert_buffer.is_full() {
            log::debug!(
                "assert buffer reached capacity {}, flushing",
                self.config.buffer_capacity
            );
            self.flush_buffer(BufferKind::Assert)?;
        }
        self.assert_buffer
            .add(Statement::explicit(subject, predicate, object));
        Ok(())
    }

    /// Remove the explicit statements matching `pattern`, returning how many
    /// were affected.
    ///
    /// Pending assertions are flushed first so they are visible to the
    /// removal. With truth maintenance the matches are buffered for
    /// retraction; otherwise they are deleted from the store immediately.
    pub fn remove_statements(&mut self, pattern: &StatementPattern) -> SailResult<usize> {
        self.state.require_active()?;
        self.flush_buffer(BufferKind::Assert)?;

        let removed = if self.config.truth_maintenance {
            let explicit: Vec<Statement> = self
                .store
                .matching(pattern)?
                .into_iter()
                .filter(Statement::is_explicit)
                .collect();
            self.retract_buffer.extend(explicit)
        } else {
            self.store.remove_matching(pattern)?
        };

        if removed > 0 {
            self.changes.removed = true;
        }
        log::debug!("{} statement(s) removed for {}", removed, pattern);
        Ok(removed)
    }

    /// Flush pending assertions, then pending retractions. A no-op while
    /// idle or when both buffers are empty.
    pub fn flush(&mut self) -> SailResult<()> {
        match self.state {
            TransactionState::Idle => Ok(()),
            TransactionState::Aborted => Err(StateError::Aborted.into()),
            TransactionState::Active => self.flush_buffers(),
        }
    }

    /// Flush, commit the store, return to idle and notify listeners if the
    /// transaction added or removed anything
    pub fn commit_transaction(&mut self) -> SailResult<()> {
        let (next, effects) = self.state.apply(TransactionEvent::Commit)?;
        self.run_effects(&effects)?;
        self.state = next;

        if let Some(id) = self.transaction_id.take() {
            log::info!("Committed transaction {}", id);
        }
        Ok(())
    }

    /// Leave an aborted transaction. Pending statements are discarded and
    /// the store is left untouched; no change event is sent.
    pub fn abandon_transaction(&mut self) -> SailResult<()> {
        let (next, effects) = self.state.apply(TransactionEvent::Abandon)?;
        self.run_effects(&effects)?;
        self.state = next;
        self.consecutive_flush_failures = 0;

        if let Some(id) = self.transaction_id.take() {
            log::info!("Abandoned transaction {}", id);
        }
        Ok(())
    }

    pub fn get_statements(&mut self, pattern: &StatementPattern) -> SailResult<Vec<Statement>> {
        self.prepare_read()?;
        Ok(self.store.matching(pattern)?)
    }

    pub fn has_statement(&mut self, pattern: &StatementPattern) -> SailResult<bool> {
        self.prepare_read()?;
        Ok(self.store.contains(pattern)?)
    }

    /// Plan a query using the store's range counts as cardinality estimates
    pub fn optimize_query(&mut self, query: &Query) -> SailResult<QueryPlan> {
        self.prepare_read()?;
        let estimator = StoreEstimator::new(&self.store);
        let optimizer = GraphPatternOptimizer::new(&estimator)
            .with_residual_policy(self.config.residual_policy);
        Ok(optimizer.optimize_query(query)?)
    }

    /// Drop every statement, pending or stored
    pub fn clear_repository(&mut self) -> SailResult<()> {
        self.state.require_active()?;
        self.assert_buffer.clear();
        self.retract_buffer.clear();
        self.store.clear()?;
        self.changes.removed = true;
        log::info!("Cleared repository");
        Ok(())
    }

    /// Recompute the closure of the whole store and commit it. Works with or
    /// without an open transaction; pending writes are flushed first.
    pub fn full_forward_closure(&mut self) -> SailResult<ClosureStats> {
        if self.state == TransactionState::Aborted {
            return Err(StateError::Aborted.into());
        }
        if self.closure.is_none() {
            return Err(SailError::Closure(
                "no closure engine configured".to_string(),
            ));
        }
        if self.state.is_active() {
            self.flush_buffers()?;
        }

        let engine = self
            .closure
            .as_deref_mut()
            .ok_or_else(|| SailError::Closure("no closure engine configured".to_string()))?;
        let stats = engine
            .compute_closure(&mut self.store, None)
            .map_err(|e| SailError::Closure(e.to_string()))?;
        self.store.commit()?;

        if self.state.is_active() && stats.inferred_added > 0 {
            self.changes.added = true;
        }
        log::info!(
            "Full forward closure added {} inferred statement(s)",
            stats.inferred_added
        );
        Ok(stats)
    }

    pub fn add_listener(&mut self, listener: Arc<dyn ChangeListener>) -> SailResult<()> {
        if !self.listeners.add(listener) {
            return Err(SailError::Listener(
                "listener is already registered".to_string(),
            ));
        }
        Ok(())
    }

    pub fn remove_listener(&mut self, listener: &Arc<dyn ChangeListener>) -> SailResult<()> {
        if !self.listeners.remove(listener) {
            return Err(SailError::Listener("listener is not registered".to_string()));
        }
        Ok(())
    }

    fn prepare_read(&mut self) -> SailResult<()> {
        self.state.require_active()?;
        self.flush_buffers()
    }

    fn run_effects(&mut self, effects: &[Effect]) -> SailResult<()> {
        for effect in effects {
            match effect {
                Effect::ResetChangeFlags => self.changes.reset(),
                Effect::FlushBuffers => self.flush_buffers()?,
                Effect::CommitStore => self.store.commit()?,
                Effect::NotifyListeners => {
                    if let Some(event) = self.changes.to_event() {
                        log::debug!(
                            "Notifying {} listener(s): added={}, removed={}",
                            self.listeners.len(),
                            event.added,
                            event.removed
                        );
                        self.listeners.notify(&event);
                    }
                }
                Effect::DiscardBuffers => {
                    self.assert_buffer.clear();
                    self.retract_buffer.clear();
                }
            }
        }
        Ok(())
    }

    fn flush_buffers(&mut self) -> SailResult<()> {
        self.flush_buffer(BufferKind::Assert)?;
        self.flush_buffer(BufferKind::Retract)
    }

    fn flush_buffer(&mut self, kind: BufferKind) -> SailResult<()> {
        let closure = if self.config.truth_maintenance {
            self.closure.as_deref_mut()
        } else {
            None
        };
        let buffer = match kind {
            BufferKind::Assert => &mut self.assert_buffer,
            BufferKind::Retract => &mut self.retract_buffer,
        };

        match buffer.flush(&mut self.store, closure) {
            Ok(outcome) => {
                if !outcome.is_empty() {
                    self.consecutive_flush_failures = 0;
                    match kind {
                        BufferKind::Assert => self.changes.added = true,
                        BufferKind::Retract => self.changes.removed = true,
                    }
                }
                Ok(())
            }
            Err(source) => {
                self.consecutive_flush_failures += 1;
                let attempt = self.consecutive_flush_failures;
                log::warn!("Flush of {} buffer failed (attempt {}): {}", kind, attempt, source);

                if attempt >= MAX_FLUSH_ATTEMPTS {
                    let (next, _) = self.state.apply(TransactionEvent::Abort)?;
                    self.state = next;
                    if let Some(id) = self.transaction_id {
                        log::warn!("Transaction {} aborted; it must be abandoned", id);
                    }
                }
                Err(SailError::FlushFailed {
                    buffer: kind,
                    attempt,
                    source,
                })
            }
        }
    }
}
