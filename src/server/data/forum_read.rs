//! Per user, per course forum read markers.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait};

/// Repository for `user_forum_read` markers.
pub struct ForumReadRepository<'a, C: ConnectionTrait = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ForumReadRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// When the user last marked the course forum as read.
    pub async fn get_last_read(
        &self,
        user_id: i32,
        course_id: i32,
    ) -> Result<Option<DateTime<Utc>>, DbErr> {
        let marker = entity::prelude::UserForumRead::find_by_id((user_id, course_id))
            .one(self.db)
            .await?;

        Ok(marker.map(|m| m.last_read_at))
    }

    /// Inserts or moves the marker to `at`.
    ///
    /// # Arguments
    /// - `user_id` - Reader
    /// - `course_id` - Course forum that was read
    /// - `at` - New marker time
    ///
    /// # Returns
    /// - `Ok(())` - Marker stored
    /// - `Err(DbErr)` - Database error during upsert
    pub async fn mark_read(
        &self,
        user_id: i32,
        course_id: i32,
        at: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        entity::prelude::UserForumRead::insert(entity::user_forum_read::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            course_id: ActiveValue::Set(course_id),
            last_read_at: ActiveValue::Set(at),
        })
        .on_conflict(
            OnConflict::columns([
                entity::user_forum_read::Column::UserId,
                entity::user_forum_read::Column::CourseId,
            ])
            .update_column(entity::user_forum_read::Column::LastReadAt)
            .to_owned(),
        )
        .exec(self.db)
        .await?;

        Ok(())
    }
}
