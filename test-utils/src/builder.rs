use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Tables are created from the SeaORM entity definitions using SQLite syntax, in the
/// order they are added. Add referenced tables before the tables that reference them.
///
/// # Example
///
/// ```rust,ignore
/// let test = TestBuilder::new()
///     .with_table(User)
///     .with_table(Course)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// CREATE TABLE statements executed during `build()`.
    tables: Vec<TableCreateStatement>,
    /// Whether a session store should be created alongside the database.
    session: bool,
}

impl TestBuilder {
    /// Creates a new test builder with no tables configured.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            session: false,
        }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity implementing `EntityTrait` to create a table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Creates the session store table on build so `TestContext::session()` is ready.
    pub fn with_session(mut self) -> Self {
        self.session = true;
        self
    }

    /// Adds the user table.
    pub fn with_user_tables(self) -> Self {
        self.with_table(User)
    }

    /// Adds the tables required for course and enrollment operations.
    ///
    /// - User
    /// - Course
    /// - CourseEnrollment
    pub fn with_course_tables(self) -> Self {
        self.with_user_tables()
            .with_table(Course)
            .with_table(CourseEnrollment)
    }

    /// Adds the tables required for activities and their responses.
    ///
    /// Includes everything from `with_course_tables()` followed by Activity,
    /// ActivityResponse and ActivityAnalytics.
    pub fn with_activity_tables(self) -> Self {
        self.with_course_tables()
            .with_table(Activity)
            .with_table(ActivityResponse)
            .with_table(ActivityAnalytics)
    }

    /// Adds the course tables plus the document table.
    pub fn with_document_tables(self) -> Self {
        self.with_course_tables().with_table(Document)
    }

    /// Adds the course tables plus posts, replies and read markers.
    pub fn with_forum_tables(self) -> Self {
        self.with_course_tables()
            .with_table(ForumPost)
            .with_table(ForumReply)
            .with_table(UserForumRead)
    }

    /// Adds every table in the schema.
    pub fn with_all_tables(self) -> Self {
        self.with_activity_tables()
            .with_table(Document)
            .with_table(ForumPost)
            .with_table(ForumReply)
            .with_table(UserForumRead)
    }

    /// Builds and initializes the test context with configured tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Test context with database (and optionally session) ready
    /// - `Err(TestError)` - Failed to connect, create tables or migrate the session store
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut context = TestContext::connect().await?;

        context.create_tables(self.tables).await?;

        if self.session {
            context.session().await?;
        }

        Ok(context)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
