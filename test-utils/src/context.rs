use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};
use std::sync::Arc;
use time::Duration;
use tower_sessions::{Expiry, Session};
use tower_sessions_sqlx_store::SqliteStore;

use crate::error::TestError;

/// Test environment with an in-memory SQLite database and an optional session.
///
/// The session shares the database pool, the same way the server stores sessions
/// next to application data.
pub struct TestContext {
    /// Connection to the in-memory SQLite database.
    pub db: DatabaseConnection,

    /// Session created on first call to `session()`.
    pub session: Option<Session>,
}

impl TestContext {
    /// Connects to a fresh in-memory SQLite database.
    pub async fn connect() -> Result<Self, TestError> {
        let db = Database::connect("sqlite::memory:").await?;

        Ok(Self { db, session: None })
    }

    /// Executes the provided CREATE TABLE statements in order.
    ///
    /// # Arguments
    /// - `stmts` - Statements generated by `TestBuilder::with_table`
    ///
    /// # Returns
    /// - `Ok(())` - All tables created
    /// - `Err(TestError::Database)` - A statement failed
    pub async fn create_tables(
        &mut self,
        stmts: Vec<TableCreateStatement>,
    ) -> Result<(), TestError> {
        for stmt in stmts {
            self.db.execute(&stmt).await?;
        }

        Ok(())
    }

    /// Gets or creates the test session.
    ///
    /// On first call the tower-sessions SQLite store table is migrated inside the test
    /// database and a new, unsaved session is created with a 7 day inactivity expiry.
    ///
    /// # Returns
    /// - `Ok(&Session)` - Reference to the session instance
    /// - `Err(TestError::SessionStore)` - Failed to migrate the session table
    pub async fn session(&mut self) -> Result<&Session, TestError> {
        if self.session.is_none() {
            let pool = self.db.get_sqlite_connection_pool();
            let store = SqliteStore::new(pool.clone());

            store
                .migrate()
                .await
                .map_err(|e| TestError::SessionStore(e.to_string()))?;

            self.session = Some(Session::new(
                None,
                Arc::new(store),
                Some(Expiry::OnInactivity(Duration::days(7))),
            ));
        }

        self.session
            .as_ref()
            .ok_or_else(|| TestError::SessionStore("session missing after init".to_string()))
    }

    /// Returns the database together with the session, creating the session if needed.
    ///
    /// Avoids holding a mutable borrow of the context while both references are in use.
    pub async fn db_and_session(&mut self) -> Result<(&DatabaseConnection, &Session), TestError> {
        self.session().await?;

        let session = self
            .session
            .as_ref()
            .ok_or_else(|| TestError::SessionStore("session missing after init".to_string()))?;

        Ok((&self.db, session))
    }
}
