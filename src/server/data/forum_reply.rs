//! Forum reply repository.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use entity::user::Role;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};

use crate::server::model::forum::{CreateReplyParams, ForumReply};

/// Repository providing database operations for forum replies.
pub struct ForumReplyRepository<'a, C: ConnectionTrait = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ForumReplyRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a reply.
    ///
    /// Does not touch the post's reply counter; callers pair this with
    /// `ForumPostRepository::increment_reply_count` inside one transaction.
    ///
    /// # Arguments
    /// - `params` - Post, author, content and optional parent reply
    ///
    /// # Returns
    /// - `Ok(ForumReply)` - The stored reply with author details
    /// - `Err(DbErr)` - Database error during insert
    pub async fn create(&self, params: CreateReplyParams) -> Result<ForumReply, DbErr> {
        let now = Utc::now();

        let entity = entity::forum_reply::ActiveModel {
            post_id: ActiveValue::Set(params.post_id),
            user_id: ActiveValue::Set(params.user_id),
            content: ActiveValue::Set(params.content),
            parent_reply_id: ActiveValue::Set(params.parent_reply_id),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        self.single_with_author(entity).await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<ForumReply>, DbErr> {
        let Some(entity) = entity::prelude::ForumReply::find_by_id(id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(self.single_with_author(entity).await?))
    }

    /// Parent pointer of a reply; `Ok(None)` for top-level or missing replies.
    pub async fn get_parent_id(&self, id: i32) -> Result<Option<i32>, DbErr> {
        let parent: Option<Option<i32>> = entity::prelude::ForumReply::find_by_id(id)
            .select_only()
            .column(entity::forum_reply::Column::ParentReplyId)
            .into_tuple()
            .one(self.db)
            .await?;

        Ok(parent.flatten())
    }

    /// Every reply of a post ordered by creation time.
    pub async fn get_by_post(&self, post_id: i32) -> Result<Vec<ForumReply>, DbErr> {
        let entities = entity::prelude::ForumReply::find()
            .filter(entity::forum_reply::Column::PostId.eq(post_id))
            .order_by_asc(entity::forum_reply::Column::CreatedAt)
            .order_by_asc(entity::forum_reply::Column::Id)
            .all(self.db)
            .await?;

        let mut replies: Vec<ForumReply> = entities
            .into_iter()
            .map(ForumReply::from_entity)
            .collect();
        let user_ids: Vec<i32> = replies.iter().map(|r| r.user_id).collect();
        let authors = attach_authors(self.db, &user_ids).await?;

        for reply in replies.iter_mut() {
            set_author(reply, &authors);
        }

        Ok(replies)
    }

    /// Replaces the reply content and bumps `updated_at`.
    ///
    /// # Returns
    /// - `Ok(Some(ForumReply))` - Updated reply
    /// - `Ok(None)` - No reply with that ID
    /// - `Err(DbErr)` - Database error during update
    pub async fn update_content(
        &self,
        id: i32,
        content: String,
    ) -> Result<Option<ForumReply>, DbErr> {
        let Some(entity) = entity::prelude::ForumReply::find_by_id(id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active = entity.into_active_model();
        active.content = ActiveValue::Set(content);
        active.updated_at = ActiveValue::Set(Utc::now());

        let entity = active.update(self.db).await?;

        Ok(Some(self.single_with_author(entity).await?))
    }

    /// Whether someone other than `user_id` replied in the course after `since`.
    pub async fn exists_by_others_since(
        &self,
        course_id: i32,
        user_id: i32,
        since: Option<DateTime<Utc>>,
    ) -> Result<bool, DbErr> {
        let mut query = entity::prelude::ForumReply::find()
            .join(JoinType::InnerJoin, entity::forum_reply::Relation::ForumPost.def())
            .filter(entity::forum_post::Column::CourseId.eq(course_id))
            .filter(entity::forum_reply::Column::UserId.ne(user_id));
        if let Some(since) = since {
            query = query.filter(entity::forum_reply::Column::CreatedAt.gt(since));
        }

        Ok(query.count(self.db).await? > 0)
    }

    async fn single_with_author(
        &self,
        entity: entity::forum_reply::Model,
    ) -> Result<ForumReply, DbErr> {
        let mut reply = ForumReply::from_entity(entity);
        let authors = attach_authors(self.db, &[reply.user_id]).await?;
        set_author(&mut reply, &authors);

        Ok(reply)
    }
}

fn set_author(reply: &mut ForumReply, authors: &HashMap<i32, (String, Role)>) {
    if let Some((name, role)) = authors.get(&reply.user_id) {
        reply.author_name = Some(name.clone());
        reply.author_role = Some(*role);
    }
}

/// Loads display name and role for forum authors.
pub(crate) async fn attach_authors<C: ConnectionTrait>(
    db: &C,
    user_ids: &[i32],
) -> Result<HashMap<i32, (String, Role)>, DbErr> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let authors = entity::prelude::User::find()
        .filter(entity::user::Column::Id.is_in(user_ids.to_vec()))
        .all(db)
        .await?
        .into_iter()
        .map(|user| (user.id, (user.full_name, user.role)))
        .collect();

    Ok(authors)
}
