//! Shared fixtures for coordinator and optimizer tests

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use rdfsail::{
    Cardinality, ChangeEvent, ChangeListener, ClosureEngine, ClosureStats, MemoryTripleStore,
    RangeEstimator, Statement, StatementPattern, StorageError, SubClassClosure, Term, TripleStore,
};

pub fn ex(local: &str) -> Term {
    Term::iri(format!("http://ex/{}", local))
}

/// Handle for arming failures on a [`FlakyStore`] or [`RecordingClosure`]
/// after it has been moved into a coordinator
#[derive(Clone, Default)]
pub struct FailureSwitch {
    remaining: Arc<Mutex<u32>>,
}

impl FailureSwitch {
    /// Make the next `count` guarded calls fail
    pub fn fail_next(&self, count: u32) {
        *self.remaining.lock() = count;
    }

    pub fn remaining(&self) -> u32 {
        *self.remaining.lock()
    }

    fn trip(&self) -> Result<(), StorageError> {
        let mut remaining = self.remaining.lock();
        if *remaining > 0 {
            *remaining -= 1;
            return Err(StorageError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

/// In-memory store whose writes can be made to fail on demand
pub struct FlakyStore {
    inner: MemoryTripleStore,
    switch: FailureSwitch,
}

impl FlakyStore {
    pub fn new() -> (Self, FailureSwitch) {
        let switch = FailureSwitch::default();
        let store = Self {
            inner: MemoryTripleStore::new(),
            switch: switch.clone(),
        };
        (store, switch)
    }

    pub fn inner(&self) -> &MemoryTripleStore {
        &self.inner
    }
}

impl TripleStore for FlakyStore {
    fn add_statements(&mut self, statements: &[Statement]) -> Result<usize, StorageError> {
        self.switch.trip()?;
        self.inner.add_statements(statements)
    }

    fn remove_statements(&mut self, statements: &[Statement]) -> Result<usize, StorageError> {
        self.switch.trip()?;
        self.inner.remove_statements(statements)
    }

    fn remove_matching(&mut self, pattern: &StatementPattern) -> Result<usize, StorageError> {
        self.switch.trip()?;
        self.inner.remove_matching(pattern)
    }

    fn matching(&self, pattern: &StatementPattern) -> Result<Vec<Statement>, StorageError> {
        self.inner.matching(pattern)
    }

    fn range_count(&self, pattern: &StatementPattern) -> Result<u64, StorageError> {
        self.inner.range_count(pattern)
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        self.inner.commit()
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.inner.clear()
    }
}

/// One call received by a [`RecordingClosure`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClosureCall {
    /// `Some(n)`: focused on `n` statements, `None`: whole store
    Compute(Option<usize>),
    Retract(usize),
}

/// Closure engine that records its calls and delegates to [`SubClassClosure`].
/// An armed switch fails the call before the store is touched.
pub struct RecordingClosure {
    engine: SubClassClosure,
    calls: Arc<Mutex<Vec<ClosureCall>>>,
    switch: FailureSwitch,
}

impl RecordingClosure {
    pub fn new() -> (Self, Arc<Mutex<Vec<ClosureCall>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let engine = Self {
            engine: SubClassClosure::new(),
            calls: calls.clone(),
            switch: FailureSwitch::default(),
        };
        (engine, calls)
    }

    pub fn switch(&self) -> FailureSwitch {
        self.switch.clone()
    }
}

impl ClosureEngine for RecordingClosure {
    fn compute_closure(
        &mut self,
        store: &mut dyn TripleStore,
        focus: Option<&[Statement]>,
    ) -> Result<ClosureStats, StorageError> {
        self.calls
            .lock()
            .push(ClosureCall::Compute(focus.map(<[Statement]>::len)));
        self.switch.trip()?;
        self.engine.compute_closure(store, focus)
    }

    fn retract(
        &mut self,
        store: &mut dyn TripleStore,
        retracted: &[Statement],
    ) -> Result<ClosureStats, StorageError> {
        self.calls.lock().push(ClosureCall::Retract(retracted.len()));
        self.switch.trip()?;
        self.engine.retract(store, retracted)
    }
}

/// Listener that keeps every event it receives
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<ChangeEvent>>,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events.lock().clone()
    }
}

impl ChangeListener for RecordingListener {
    fn sail_changed(&self, event: &ChangeEvent) {
        self.events.lock().push(*event);
    }
}

/// Estimator answering from a per-predicate table and counting probes
#[derive(Default)]
pub struct CountingEstimator {
    counts: HashMap<String, u64>,
    probes: Mutex<usize>,
}

impl CountingEstimator {
    pub fn new<'a>(counts: impl IntoIterator<Item = (&'a str, u64)>) -> Self {
        Self {
            counts: counts
                .into_iter()
                .map(|(predicate, count)| (predicate.to_string(), count))
                .collect(),
            probes: Mutex::new(0),
        }
    }

    pub fn probes(&self) -> usize {
        *self.probes.lock()
    }
}

impl RangeEstimator for CountingEstimator {
    fn estimate(&self, pattern: &StatementPattern) -> Cardinality {
        *self.probes.lock() += 1;
        pattern
            .predicate
            .as_ref()
            .and_then(Term::as_iri)
            .and_then(|iri| self.counts.get(iri))
            .map_or(Cardinality::Unknown, |count| Cardinality::Known(*count))
    }
}
