use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Add entity tables with `with_table()` and call `build()` to create the in-memory
/// database.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use entity::prelude::{NationRole, TownRole};
///
/// let test = TestBuilder::new()
///     .with_table(NationRole)
///     .with_table(TownRole)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// CREATE TABLE statements executed in insertion order during `build()`.
    tables: Vec<TableCreateStatement>,
}

impl TestBuilder {
    /// Creates a new test builder with no tables configured.
    ///
    /// # Returns
    /// - New `TestBuilder` instance with empty table configuration
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// Generates a CREATE TABLE statement from the provided SeaORM entity using SQLite
    /// backend syntax. The table is created when `build()` is called.
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity to create the table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Adds every table the role mapping store reads during a sync run.
    ///
    /// Adds:
    /// - NationRole
    /// - TownRole
    /// - Alliance
    /// - SyncException
    /// - SyncTargetRole
    /// - ManagedRole
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_mapping_tables(self) -> Self {
        self.with_table(NationRole)
            .with_table(TownRole)
            .with_table(Alliance)
            .with_table(SyncException)
            .with_table(SyncTargetRole)
            .with_table(ManagedRole)
    }

    /// Adds the mapping tables plus the linked account cache and the audit log.
    ///
    /// Use this when testing a complete sync run.
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_sync_tables(self) -> Self {
        self.with_mapping_tables()
            .with_table(LinkedAccount)
            .with_table(AuditLog)
    }

    /// Builds and initializes the test context with configured tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Initialized test context with database and tables ready
    /// - `Err(TestError::Database)` - Failed to connect to database or create tables
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new();

        setup.with_tables(self.tables).await?;

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
