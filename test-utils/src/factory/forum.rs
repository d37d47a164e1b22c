//! Forum post and reply factories.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating forum posts.
pub struct PostFactory<'a> {
    db: &'a DatabaseConnection,
    course_id: i32,
    user_id: i32,
    title: String,
    content: String,
    is_pinned: bool,
    created_at: DateTime<Utc>,
}

impl<'a> PostFactory<'a> {
    pub fn new(db: &'a DatabaseConnection, course_id: i32, user_id: i32) -> Self {
        let id = next_id();
        Self {
            db,
            course_id,
            user_id,
            title: format!("Post {}", id),
            content: format!("Content of post {}", id),
            is_pinned: false,
            created_at: Utc::now(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn pinned(mut self, is_pinned: bool) -> Self {
        self.is_pinned = is_pinned;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub async fn build(self) -> Result<entity::forum_post::Model, DbErr> {
        entity::forum_post::ActiveModel {
            course_id: ActiveValue::Set(self.course_id),
            user_id: ActiveValue::Set(self.user_id),
            title: ActiveValue::Set(self.title),
            content: ActiveValue::Set(self.content),
            is_pinned: ActiveValue::Set(self.is_pinned),
            reply_count: ActiveValue::Set(0),
            created_at: ActiveValue::Set(self.created_at),
            updated_at: ActiveValue::Set(self.created_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a post with default title and content.
pub async fn create_post(
    db: &DatabaseConnection,
    course_id: i32,
    user_id: i32,
) -> Result<entity::forum_post::Model, DbErr> {
    PostFactory::new(db, course_id, user_id).build().await
}

/// Inserts a reply row directly, bypassing depth checks and reply counters.
///
/// # Arguments
/// - `db` - Database connection
/// - `post_id` - Post the reply belongs to
/// - `user_id` - Author of the reply
/// - `parent_reply_id` - Optional parent reply for nested replies
pub async fn create_reply(
    db: &DatabaseConnection,
    post_id: i32,
    user_id: i32,
    parent_reply_id: Option<i32>,
) -> Result<entity::forum_reply::Model, DbErr> {
    let now = Utc::now();
    entity::forum_reply::ActiveModel {
        post_id: ActiveValue::Set(post_id),
        user_id: ActiveValue::Set(user_id),
        content: ActiveValue::Set(format!("Reply {}", next_id())),
        parent_reply_id: ActiveValue::Set(parent_reply_id),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builder::TestBuilder, factory};

    #[tokio::test]
    async fn creates_nested_reply() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_forum_tables().build().await.unwrap();
        let db = &test.db;

        let (teacher, course) = factory::helpers::create_course_with_teacher(db).await?;
        let post = create_post(db, course.id, teacher.id).await?;
        let top = create_reply(db, post.id, teacher.id, None).await?;
        let nested = create_reply(db, post.id, teacher.id, Some(top.id)).await?;

        assert_eq!(nested.parent_reply_id, Some(top.id));
        assert_eq!(post.reply_count, 0);

        Ok(())
    }
}
