//! Migration session: compile-and-submit while a migration runs.

mod common;

use common::{alice, catalog, render, schema};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use stmtc::{
    Catalog, Dispatch, Error, InMemorySink, MigrationSession, MigrationSink, Query,
    StatementBatch,
};

fn session(migrating: bool) -> MigrationSession<Arc<InMemorySink>> {
    MigrationSession::new(Arc::new(catalog()), Arc::new(InMemorySink::new(migrating)))
}

#[test]
fn persist_submits_one_ordered_batch() {
    let session = session(true);

    assert_eq!(session.persist(&alice()).unwrap(), Dispatch::Submitted(4));

    let batches = session.sink().take_batches();
    assert_eq!(batches.len(), 1);
    let tables: Vec<&str> = batches[0].iter().filter_map(|s| s.table()).collect();
    assert_eq!(
        tables,
        vec!["PHONE", "EMPLOYEE", "EMPLOYEE_PROJECT", "EMPLOYEE_PROJECT"]
    );
}

#[test]
fn idle_session_compiles_nothing() {
    let session = session(false);

    assert_eq!(session.persist(&alice()).unwrap(), Dispatch::Delegate);
    assert_eq!(session.merge(&alice()).unwrap(), Dispatch::Delegate);
    assert_eq!(session.remove(&alice()).unwrap(), Dispatch::Delegate);
    // Not even parsed while idle.
    assert_eq!(
        session.execute_update(&Query::new("not a query")).unwrap(),
        Dispatch::Delegate
    );
    assert_eq!(session.sink().batch_count(), 0);
}

#[test]
fn execute_update_dispatches_on_leading_keyword() {
    let session = session(true);

    let update = Query::new("UPDATE Employee e SET e.salary = :s WHERE e.name = :n")
        .with_parameter("s", 5000i64)
        .with_parameter("n", "Bob");
    let delete = Query::new("DELETE FROM Employee e WHERE e.id = :id").with_parameter("id", "E1");

    assert_eq!(session.execute_update(&update).unwrap(), Dispatch::Submitted(1));
    assert_eq!(session.execute_update(&delete).unwrap(), Dispatch::Submitted(1));

    assert_eq!(
        render(&session.sink().statements()),
        vec![
            "UPDATE EMPLOYEE SET SALARY = 5000 WHERE NAME = 'Bob'",
            "DELETE FROM EMPLOYEE WHERE EMPLOYEE_ID = 'E1'",
        ]
    );
}

#[test]
fn native_queries_produce_no_statements() {
    let session = session(true);

    let err = session.create_native_query("DELETE FROM EMPLOYEE").unwrap_err();
    assert!(matches!(err, Error::UnsupportedQueryForm(_)));

    let err = session
        .execute_update(&Query::native("DELETE FROM EMPLOYEE"))
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedQueryForm(_)));

    assert_eq!(session.sink().batch_count(), 0);
}

#[test]
fn failed_build_submits_nothing() {
    let session = session(true);
    let err = session
        .execute_update(&Query::new("UPDATE Employee e SET e.salary = :missing"))
        .unwrap_err();

    assert!(matches!(err, Error::MissingParameter(_)));
    assert_eq!(session.sink().batch_count(), 0);
}

/// Sink whose propagation layer is down.
struct OfflineSink;

impl MigrationSink for OfflineSink {
    fn is_migrating(&self) -> bool {
        true
    }

    fn submit(&self, batch: StatementBatch) -> stmtc::Result<()> {
        Err(Error::Sink(format!("replica offline, {} statements dropped", batch.len())))
    }
}

#[test]
fn refused_batch_surfaces_sink_error() {
    let session = MigrationSession::new(Arc::new(catalog()), OfflineSink);

    let err = session.persist(&alice()).unwrap_err();
    assert!(matches!(err, Error::Sink(_)));
    assert_eq!(err.to_string(), "sink error: replica offline, 4 statements dropped");

    let err = session
        .execute_update(&Query::new("DELETE FROM Employee e WHERE e.id = 'E1'"))
        .unwrap_err();
    assert!(matches!(err, Error::Sink(_)));
}

#[test]
fn submitted_batches_survive_encoding() {
    let session = session(true);
    session.remove(&alice()).unwrap();

    let batch = session.sink().take_batches().remove(0);
    let bytes = batch.to_bytes().unwrap();
    let decoded = StatementBatch::from_bytes(&bytes).unwrap();

    assert_eq!(decoded, batch);
    assert_eq!(decoded.len(), 4);
}

#[test]
fn global_catalog_backs_sessions() {
    Catalog::new(schema()).unwrap().install().unwrap();
    assert!(Catalog::new(schema()).unwrap().install().is_err());

    let session = MigrationSession::with_global_catalog(InMemorySink::new(true)).unwrap();
    assert_eq!(session.persist(&common::phone()).unwrap(), Dispatch::Submitted(1));
}

#[test]
fn sessions_share_a_catalog_across_threads() {
    let catalog = Arc::new(catalog());
    let sink = Arc::new(InMemorySink::new(true));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let session = MigrationSession::new(Arc::clone(&catalog), Arc::clone(&sink));
            std::thread::spawn(move || {
                let employee = alice().with("id", format!("E{}", i));
                session.persist(&employee).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Dispatch::Submitted(4));
    }
    assert_eq!(sink.batch_count(), 4);
}
