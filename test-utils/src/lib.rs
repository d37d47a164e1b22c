//! Classroom Test Utils
//!
//! Shared testing utilities for the classroom backend. Provides a builder for in-memory
//! SQLite test databases with the tables a test needs, a session backed by the same
//! database, and factories for inserting entities with sensible defaults.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment holding the database connection and session
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Entity factories (`UserFactory`, `CourseFactory`, ...)
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{builder::TestBuilder, factory};
//!
//! #[tokio::test]
//! async fn enrolls_student() -> Result<(), sea_orm::DbErr> {
//!     let test = TestBuilder::new().with_course_tables().build().await.unwrap();
//!     let db = &test.db;
//!
//!     let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
//!     let student = factory::user::create_student(db).await?;
//!     factory::enrollment::create_enrollment(db, course.id, student.id).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
