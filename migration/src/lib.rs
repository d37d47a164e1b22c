pub use sea_orm_migration::prelude::*;

mod m20260105_000001_create_user_table;
mod m20260105_000002_create_course_table;
mod m20260105_000003_create_course_enrollment_table;
mod m20260105_000004_create_activity_table;
mod m20260105_000005_create_activity_response_table;
mod m20260105_000006_create_activity_analytics_table;
mod m20260112_000007_create_document_table;
mod m20260119_000008_create_forum_post_table;
mod m20260119_000009_create_forum_reply_table;
mod m20260119_000010_create_user_forum_read_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_000001_create_user_table::Migration),
            Box::new(m20260105_000002_create_course_table::Migration),
            Box::new(m20260105_000003_create_course_enrollment_table::Migration),
            Box::new(m20260105_000004_create_activity_table::Migration),
            Box::new(m20260105_000005_create_activity_response_table::Migration),
            Box::new(m20260105_000006_create_activity_analytics_table::Migration),
            Box::new(m20260112_000007_create_document_table::Migration),
            Box::new(m20260119_000008_create_forum_post_table::Migration),
            Box::new(m20260119_000009_create_forum_reply_table::Migration),
            Box::new(m20260119_000010_create_user_forum_read_table::Migration),
        ]
    }
}
