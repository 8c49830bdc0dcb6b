//! Migration session: the narrow seam between an application's persistence
//! calls and the statement compiler.
//!
//! While the sink reports an active migration, every persist, merge, remove
//! and bulk update is compiled and submitted as one [`StatementBatch`]. When
//! no migration is running the session compiles nothing and tells the caller
//! to forward the call to its own persistence provider.

use crate::builder::StatementBuilder;
use crate::config::BuilderConfig;
use crate::error::{Error, Result};
use crate::query::Query;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use stmtc_core::{Catalog, EntityObject};
use stmtc_proto::{Statement, StatementBatch, StatementKind};
use tracing::{debug, info};

/// Receives finished statement batches.
pub trait MigrationSink: Send + Sync {
    /// Check if a migration is currently running.
    fn is_migrating(&self) -> bool;

    /// Accept one build's statements.
    fn submit(&self, batch: StatementBatch) -> Result<()>;
}

impl<S: MigrationSink + ?Sized> MigrationSink for Arc<S> {
    fn is_migrating(&self) -> bool {
        (**self).is_migrating()
    }

    fn submit(&self, batch: StatementBatch) -> Result<()> {
        (**self).submit(batch)
    }
}

/// Outcome of a session call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Statements were compiled and submitted.
    Submitted(usize),
    /// No migration is running; forward the call to the persistence provider.
    Delegate,
}

/// Sink that keeps batches in memory.
#[derive(Debug, Default)]
pub struct InMemorySink {
    migrating: AtomicBool,
    batches: Mutex<Vec<StatementBatch>>,
}

impl InMemorySink {
    /// Create a sink with the given migration state.
    pub fn new(migrating: bool) -> Self {
        Self {
            migrating: AtomicBool::new(migrating),
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Start or stop the migration.
    pub fn set_migrating(&self, migrating: bool) {
        self.migrating.store(migrating, Ordering::SeqCst);
    }

    /// Number of batches received so far.
    pub fn batch_count(&self) -> usize {
        self.batches.lock().len()
    }

    /// Copy of every received statement, in submission order.
    pub fn statements(&self) -> Vec<Statement> {
        self.batches
            .lock()
            .iter()
            .flat_map(|b| b.iter().cloned())
            .collect()
    }

    /// Remove and return the received batches.
    pub fn take_batches(&self) -> Vec<StatementBatch> {
        std::mem::take(&mut *self.batches.lock())
    }
}

impl MigrationSink for InMemorySink {
    fn is_migrating(&self) -> bool {
        self.migrating.load(Ordering::SeqCst)
    }

    fn submit(&self, batch: StatementBatch) -> Result<()> {
        self.batches.lock().push(batch);
        Ok(())
    }
}

/// Compiles persistence calls into statement batches while a migration runs.
pub struct MigrationSession<S> {
    catalog: Arc<Catalog>,
    sink: S,
    config: BuilderConfig,
}

impl<S: MigrationSink> MigrationSession<S> {
    /// Create a session over a catalog and a sink.
    pub fn new(catalog: Arc<Catalog>, sink: S) -> Self {
        Self {
            catalog,
            sink,
            config: BuilderConfig::default(),
        }
    }

    /// Create a session over the process-wide catalog.
    pub fn with_global_catalog(sink: S) -> Result<Self> {
        let catalog = Catalog::global().ok_or_else(|| {
            stmtc_core::Error::MetadataNotFound("no catalog installed".to_string())
        })?;
        Ok(Self::new(catalog, sink))
    }

    /// Replace the builder configuration.
    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Check if a migration is running.
    pub fn is_migrating(&self) -> bool {
        self.sink.is_migrating()
    }

    /// Record the insertion of a new entity.
    pub fn persist(&self, entity: &EntityObject) -> Result<Dispatch> {
        self.dispatch_entity(StatementKind::Insert, entity)
    }

    /// Record changes to an existing entity.
    pub fn merge(&self, entity: &EntityObject) -> Result<Dispatch> {
        self.dispatch_entity(StatementKind::Update, entity)
    }

    /// Record the removal of an entity.
    pub fn remove(&self, entity: &EntityObject) -> Result<Dispatch> {
        self.dispatch_entity(StatementKind::Delete, entity)
    }

    /// Record a bulk update or delete query.
    pub fn execute_update(&self, query: &Query) -> Result<Dispatch> {
        if !self.is_migrating() {
            return Ok(Dispatch::Delegate);
        }
        let builder = StatementBuilder::for_query(&self.catalog, query)?.with_config(self.config);
        self.submit(builder.build_query(query)?)
    }

    /// Native queries bypass the entity mapping and cannot be migrated.
    pub fn create_native_query(&self, sql: &str) -> Result<Query> {
        debug!(sql, "native query rejected");
        Err(Error::UnsupportedQueryForm(format!(
            "native query '{}' cannot be translated",
            sql
        )))
    }

    fn dispatch_entity(&self, kind: StatementKind, entity: &EntityObject) -> Result<Dispatch> {
        if !self.is_migrating() {
            return Ok(Dispatch::Delegate);
        }
        let builder = StatementBuilder::new(&self.catalog, kind).with_config(self.config);
        self.submit(builder.build_entity(entity)?)
    }

    fn submit(&self, statements: Vec<Statement>) -> Result<Dispatch> {
        let count = statements.len();
        if count == 0 {
            return Ok(Dispatch::Submitted(0));
        }
        self.sink.submit(StatementBatch::from_statements(statements))?;
        info!(count, "statement batch submitted");
        Ok(Dispatch::Submitted(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stmtc_core::{EntityDef, FieldDef, SchemaBundle};

    fn session(migrating: bool) -> MigrationSession<Arc<InMemorySink>> {
        let schema = SchemaBundle::new(1).with_entity(
            EntityDef::new("Tag")
                .with_field(FieldDef::id("id"))
                .with_field(FieldDef::new("label")),
        );
        let catalog = Arc::new(Catalog::new(schema).unwrap());
        MigrationSession::new(catalog, Arc::new(InMemorySink::new(migrating)))
    }

    #[test]
    fn test_delegates_when_idle() {
        let session = session(false);
        let tag = EntityObject::new("Tag").with("id", 1i64);

        assert_eq!(session.persist(&tag).unwrap(), Dispatch::Delegate);
        assert_eq!(session.sink().batch_count(), 0);
    }

    #[test]
    fn test_submits_when_migrating() {
        let session = session(true);
        let tag = EntityObject::new("Tag").with("id", 1i64).with("label", "x");

        assert_eq!(session.persist(&tag).unwrap(), Dispatch::Submitted(1));
        assert_eq!(session.remove(&tag).unwrap(), Dispatch::Submitted(1));

        let batches = session.sink().take_batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(session.sink().batch_count(), 0);
    }

    #[test]
    fn test_toggle_migration() {
        let session = session(false);
        let tag = EntityObject::new("Tag").with("id", 1i64);

        session.sink().set_migrating(true);
        assert_eq!(session.merge(&tag).unwrap(), Dispatch::Submitted(1));
        session.sink().set_migrating(false);
        assert_eq!(session.merge(&tag).unwrap(), Dispatch::Delegate);
        assert_eq!(session.sink().batch_count(), 1);
    }

    #[test]
    fn test_native_query_rejected() {
        let session = session(true);
        let err = session.create_native_query("DELETE FROM Tag").unwrap_err();
        assert!(matches!(err, Error::UnsupportedQueryForm(_)));
        assert_eq!(session.sink().batch_count(), 0);
    }

    #[test]
    fn test_sink_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InMemorySink>();
        assert_send_sync::<MigrationSession<Arc<InMemorySink>>>();
    }
}
