//! SeaORM entities for the classroom database schema.

pub mod prelude;

pub mod activity;
pub mod activity_analytics;
pub mod activity_response;
pub mod course;
pub mod course_enrollment;
pub mod document;
pub mod forum_post;
pub mod forum_reply;
pub mod user;
pub mod user_forum_read;
