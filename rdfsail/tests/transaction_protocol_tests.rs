//! Transaction state machine, flush-before-read and flush failure handling

#[path = "testutils/mod.rs"]
mod testutils;

use std::collections::HashMap;
use std::sync::Arc;

use rdfsail::{
    ChangeEvent, ChangeListener, Constraint, GraphPattern, MemoryTripleStore, PatternTerm,
    PlanStep, Query, SailConfig, SailError, Statement, StatementPattern, StateError, StorageError,
    TransactionCoordinator, TransactionState, TripleStore,
};
use testutils::fixtures::{ex, FlakyStore, RecordingListener};
use testutils::init_logging;

fn sail() -> TransactionCoordinator<MemoryTripleStore> {
    TransactionCoordinator::new(MemoryTripleStore::new(), SailConfig::default())
        .expect("default config is valid")
}

fn flaky_sail() -> (TransactionCoordinator<FlakyStore>, testutils::fixtures::FailureSwitch) {
    let (store, switch) = FlakyStore::new();
    let sail = TransactionCoordinator::new(store, SailConfig::default())
        .expect("default config is valid");
    (sail, switch)
}

fn state_error<T>(result: Result<T, SailError>) -> StateError {
    match result {
        Err(SailError::State(err)) => err,
        Err(other) => panic!("expected a state error, got {}", other),
        Ok(_) => panic!("expected a state error, got success"),
    }
}

fn listen<S: TripleStore>(sail: &mut TransactionCoordinator<S>) -> Arc<RecordingListener> {
    let recorder = RecordingListener::new();
    sail.add_listener(recorder.clone())
        .expect("fresh listener registers");
    recorder
}

#[test]
fn test_start_twice_fails_on_second_call() {
    init_logging();
    let mut sail = sail();
    sail.start_transaction().unwrap();

    assert_eq!(
        state_error(sail.start_transaction()),
        StateError::AlreadyActive
    );
    assert_eq!(sail.state(), TransactionState::Active);
}

#[test]
fn test_commit_without_start_fails() {
    init_logging();
    let mut sail = sail();
    assert_eq!(
        state_error(sail.commit_transaction()),
        StateError::NotActive
    );
    assert_eq!(sail.state(), TransactionState::Idle);
}

#[test]
fn test_writes_after_commit_fail() {
    init_logging();
    let mut sail = sail();
    sail.start_transaction().unwrap();
    sail.add_statement(ex("a"), ex("p"), ex("b")).unwrap();
    sail.commit_transaction().unwrap();

    assert_eq!(sail.state(), TransactionState::Idle);
    assert_eq!(
        state_error(sail.add_statement(ex("c"), ex("p"), ex("d"))),
        StateError::NotActive
    );
    assert_eq!(
        state_error(sail.remove_statements(&StatementPattern::any())),
        StateError::NotActive
    );
    assert_eq!(sail.store().len(), 1);
}

#[test]
fn test_reads_require_active_transaction() {
    init_logging();
    let mut sail = sail();
    assert_eq!(
        state_error(sail.get_statements(&StatementPattern::any())),
        StateError::NotActive
    );
    assert_eq!(
        state_error(sail.has_statement(&StatementPattern::any())),
        StateError::NotActive
    );
    assert_eq!(
        state_error(sail.optimize_query(&Query::Pattern(GraphPattern::new()))),
        StateError::NotActive
    );
    assert_eq!(
        state_error(sail.clear_repository()),
        StateError::NotActive
    );
    // flush outside a transaction has nothing to do
    assert!(sail.flush().is_ok());
}

#[test]
fn test_read_your_own_writes() {
    init_logging();
    let mut sail = sail();
    sail.start_transaction().unwrap();
    sail.add_statement(ex("alice"), ex("knows"), ex("bob"))
        .unwrap();

    let found = sail
        .get_statements(&StatementPattern::new(Some(ex("alice")), None, None))
        .unwrap();
    assert_eq!(
        found,
        vec![Statement::explicit(ex("alice"), ex("knows"), ex("bob"))]
    );
}

#[test]
fn test_add_then_remove_then_read_sees_nothing() {
    init_logging();
    let mut sail = sail();
    sail.start_transaction().unwrap();
    sail.add_statement(ex("a"), ex("p"), ex("b")).unwrap();

    let removed = sail
        .remove_statements(&StatementPattern::exact(ex("a"), ex("p"), ex("b")))
        .unwrap();

    assert_eq!(removed, 1);
    assert!(sail
        .get_statements(&StatementPattern::exact(ex("a"), ex("p"), ex("b")))
        .unwrap()
        .is_empty());
}

#[test]
fn test_remove_without_truth_maintenance_is_immediate() {
    init_logging();
    let mut sail = sail();
    sail.start_transaction().unwrap();
    for object in ["1", "2", "3"] {
        sail.add_statement(ex("s"), ex("p"), ex(object)).unwrap();
    }
    sail.flush().unwrap();

    let removed = sail
        .remove_statements(&StatementPattern::new(Some(ex("s")), None, None))
        .unwrap();

    assert_eq!(removed, 3);
    assert_eq!(sail.pending_retractions(), 0);
    assert!(sail.store().is_empty());
}

#[test]
fn test_read_only_transaction_sends_no_event() {
    init_logging();
    let mut sail = sail();
    let recorder = listen(&mut sail);

    sail.start_transaction().unwrap();
    sail.get_statements(&StatementPattern::any()).unwrap();
    sail.commit_transaction().unwrap();

    assert!(recorder.events().is_empty());
}

#[test]
fn test_commit_sends_one_event_per_transaction() {
    init_logging();
    let mut sail = sail();
    let recorder = listen(&mut sail);

    sail.start_transaction().unwrap();
    sail.add_statement(ex("a"), ex("p"), ex("b")).unwrap();
    sail.add_statement(ex("a"), ex("p"), ex("c")).unwrap();
    sail.commit_transaction().unwrap();

    sail.start_transaction().unwrap();
    sail.remove_statements(&StatementPattern::exact(ex("a"), ex("p"), ex("b")))
        .unwrap();
    sail.commit_transaction().unwrap();

    assert_eq!(
        recorder.events(),
        vec![
            ChangeEvent {
                added: true,
                removed: false
            },
            ChangeEvent {
                added: false,
                removed: true
            },
        ]
    );
}

#[test]
fn test_removal_matching_nothing_is_not_a_change() {
    init_logging();
    let mut sail = sail();
    let recorder = listen(&mut sail);

    sail.start_transaction().unwrap();
    let removed = sail
        .remove_statements(&StatementPattern::new(Some(ex("ghost")), None, None))
        .unwrap();
    sail.commit_transaction().unwrap();

    assert_eq!(removed, 0);
    assert!(recorder.events().is_empty());
}

#[test]
fn test_listener_registration_is_checked() {
    init_logging();
    let mut sail = sail();
    let recorder = RecordingListener::new();
    let listener: Arc<dyn ChangeListener> = recorder;

    sail.add_listener(listener.clone()).unwrap();
    assert!(matches!(
        sail.add_listener(listener.clone()),
        Err(SailError::Listener(_))
    ));

    sail.remove_listener(&listener).unwrap();
    assert!(matches!(
        sail.remove_listener(&listener),
        Err(SailError::Listener(_))
    ));
}

#[test]
fn test_failed_flush_keeps_buffer_and_transaction() {
    init_logging();
    let (mut sail, switch) = flaky_sail();
    sail.start_transaction().unwrap();
    sail.add_statement(ex("a"), ex("p"), ex("b")).unwrap();

    switch.fail_next(1);
    let err = sail.flush().unwrap_err();
    match err {
        SailError::FlushFailed {
            attempt, source, ..
        } => {
            assert_eq!(attempt, 1);
            assert_eq!(
                source,
                StorageError::Unavailable("injected failure".to_string())
            );
        }
        other => panic!("expected a flush failure, got {}", other),
    }
    assert_eq!(sail.state(), TransactionState::Active);
    assert_eq!(sail.pending_assertions(), 1);

    // The retry applies the same statement
    sail.flush().unwrap();
    assert_eq!(sail.pending_assertions(), 0);
    assert_eq!(sail.store().inner().len(), 1);
    sail.commit_transaction().unwrap();
}

#[test]
fn test_second_flush_failure_aborts_transaction() {
    init_logging();
    let (mut sail, switch) = flaky_sail();
    let recorder = listen(&mut sail);
    sail.start_transaction().unwrap();
    sail.add_statement(ex("a"), ex("p"), ex("b")).unwrap();

    switch.fail_next(2);
    assert!(matches!(
        sail.commit_transaction(),
        Err(SailError::FlushFailed { attempt: 1, .. })
    ));
    assert_eq!(sail.state(), TransactionState::Active);

    assert!(matches!(
        sail.commit_transaction(),
        Err(SailError::FlushFailed { attempt: 2, .. })
    ));
    assert_eq!(sail.state(), TransactionState::Aborted);

    assert_eq!(
        state_error(sail.add_statement(ex("c"), ex("p"), ex("d"))),
        StateError::Aborted
    );
    assert_eq!(
        state_error(sail.get_statements(&StatementPattern::any())),
        StateError::Aborted
    );
    assert_eq!(state_error(sail.commit_transaction()), StateError::Aborted);
    assert_eq!(state_error(sail.start_transaction()), StateError::Aborted);

    sail.abandon_transaction().unwrap();
    assert_eq!(sail.state(), TransactionState::Idle);
    assert_eq!(sail.pending_assertions(), 0);
    assert!(sail.store().inner().is_empty());
    assert!(recorder.events().is_empty());
    assert_eq!(switch.remaining(), 0);

    // A new transaction starts cleanly
    sail.start_transaction().unwrap();
    sail.add_statement(ex("a"), ex("p"), ex("b")).unwrap();
    sail.commit_transaction().unwrap();
    assert_eq!(sail.store().inner().len(), 1);
}

#[test]
fn test_abandon_requires_aborted_transaction() {
    init_logging();
    let mut sail = sail();
    assert_eq!(
        state_error(sail.abandon_transaction()),
        StateError::NotAborted
    );
    sail.start_transaction().unwrap();
    assert_eq!(
        state_error(sail.abandon_transaction()),
        StateError::NotAborted
    );
}

#[test]
fn test_each_transaction_gets_a_new_id() {
    init_logging();
    let mut sail = sail();
    let first = sail.start_transaction().unwrap();
    sail.commit_transaction().unwrap();
    let second = sail.start_transaction().unwrap();
    assert_ne!(first, second);
    assert_eq!(sail.transaction_id(), Some(second));
}

#[test]
fn test_optimize_query_uses_store_range_counts() {
    init_logging();
    let mut sail = sail();
    sail.start_transaction().unwrap();
    for i in 0..20 {
        sail.add_statement(ex(&format!("p{}", i)), ex("knows"), ex("hub"))
            .unwrap();
    }
    sail.add_statement(ex("p3"), ex("ceo"), ex("acme")).unwrap();

    let pattern = GraphPattern::new()
        .triple(
            PatternTerm::var("who"),
            ex("knows"),
            PatternTerm::var("friend"),
        )
        .triple(PatternTerm::var("who"), ex("ceo"), PatternTerm::var("org"));
    let plan = sail.optimize_query(&pattern.into()).unwrap();

    let plan = plan.as_pattern().unwrap();
    let first = plan.triples().next().unwrap();
    assert_eq!(first.predicate, PatternTerm::from(ex("ceo")));
}

#[test]
fn test_optimize_query_reports_unresolved_constraints() {
    init_logging();
    let mut sail = sail();
    sail.start_transaction().unwrap();

    let pattern = GraphPattern::new()
        .triple(PatternTerm::var("a"), ex("p"), PatternTerm::var("b"))
        .filter(Constraint::opaque("?missing > 3", ["missing"]));

    assert!(matches!(
        sail.optimize_query(&pattern.clone().into()),
        Err(SailError::Plan(_))
    ));

    let mut properties = HashMap::new();
    properties.insert("residualPolicy".to_string(), "append".to_string());
    let config = SailConfig::from_properties(&properties).unwrap();
    let mut lenient = TransactionCoordinator::new(MemoryTripleStore::new(), config).unwrap();
    lenient.start_transaction().unwrap();

    let plan = lenient.optimize_query(&pattern.into()).unwrap();
    let plan = plan.as_pattern().unwrap();
    assert!(matches!(plan.steps.last(), Some(PlanStep::Constraint(_))));
}

#[test]
fn test_clear_repository_discards_everything() {
    init_logging();
    let mut sail = sail();
    let recorder = listen(&mut sail);
    sail.start_transaction().unwrap();
    sail.add_statement(ex("a"), ex("p"), ex("b")).unwrap();
    sail.commit_transaction().unwrap();

    sail.start_transaction().unwrap();
    sail.add_statement(ex("c"), ex("p"), ex("d")).unwrap();
    sail.clear_repository().unwrap();
    sail.commit_transaction().unwrap();

    assert!(sail.store().is_empty());
    assert_eq!(
        recorder.events().last(),
        Some(&ChangeEvent {
            added: false,
            removed: true
        })
    );
}
