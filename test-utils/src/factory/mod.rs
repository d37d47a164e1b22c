//! Factory methods for creating test data.
//!
//! Each entity has a `Factory` builder for customization and a `create_*` shortcut for
//! quick default creation. Factories never create their dependencies implicitly; use the
//! functions in `helpers` when a test needs a ready-made course with its teacher.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let teacher = factory::user::create_teacher(&db).await?;
//! let course = factory::course::create_course(&db, teacher.id).await?;
//! let activity = factory::activity::ActivityFactory::new(&db, course.id, teacher.id)
//!     .status(ActivityStatus::Active)
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `user` - Users of any role
//! - `course` - Courses owned by a teacher
//! - `enrollment` - Student enrollments
//! - `activity` - Activities inside a course
//! - `response` - Student responses to activities
//! - `document` - Course document metadata
//! - `forum` - Forum posts and replies
//! - `helpers` - ID generation and multi-entity shortcuts

pub mod activity;
pub mod course;
pub mod document;
pub mod enrollment;
pub mod forum;
pub mod helpers;
pub mod response;
pub mod user;

pub use activity::create_activity;
pub use course::create_course;
pub use document::create_document;
pub use enrollment::create_enrollment;
pub use forum::{create_post, create_reply};
pub use response::create_response;
pub use user::{create_admin, create_student, create_teacher, create_user};
