//! Forum post repository.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, ExprTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use crate::server::{
    data::forum_reply::attach_authors,
    model::forum::{CreatePostParams, ForumPost, UpdatePostParams},
};

/// Repository providing database operations for forum posts.
pub struct ForumPostRepository<'a, C: ConnectionTrait = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ForumPostRepository<'a, C> {
    /// Creates a new ForumPostRepository instance.
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts an unpinned post with no replies.
    ///
    /// # Arguments
    /// - `params` - Course, author, title and content
    ///
    /// # Returns
    /// - `Ok(ForumPost)` - The stored post with author details
    /// - `Err(DbErr)` - Database error during insert
    pub async fn create(&self, params: CreatePostParams) -> Result<ForumPost, DbErr> {
        let now = Utc::now();

        let entity = entity::forum_post::ActiveModel {
            course_id: ActiveValue::Set(params.course_id),
            user_id: ActiveValue::Set(params.user_id),
            title: ActiveValue::Set(params.title),
            content: ActiveValue::Set(params.content),
            is_pinned: ActiveValue::Set(false),
            reply_count: ActiveValue::Set(0),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        self.single_with_author(entity).await
    }

    /// Finds a post with author details.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<ForumPost>, DbErr> {
        let Some(entity) = entity::prelude::ForumPost::find_by_id(id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(self.single_with_author(entity).await?))
    }

    /// Gets a page of a course's posts, pinned first then newest.
    ///
    /// # Arguments
    /// - `course_id` - Course forum to list
    /// - `search` - Optional substring matched against title and content
    /// - `page` - 1-based page number
    /// - `per_page` - Posts per page
    ///
    /// # Returns
    /// - `Ok((posts, total))` - Posts for the requested page and the total matching count
    /// - `Err(DbErr)` - Database error during pagination query
    pub async fn get_paginated(
        &self,
        course_id: i32,
        search: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<ForumPost>, u64), DbErr> {
        let mut query = entity::prelude::ForumPost::find()
            .filter(entity::forum_post::Column::CourseId.eq(course_id));

        if let Some(search) = search {
            query = query.filter(
                Condition::any()
                    .add(entity::forum_post::Column::Title.contains(search))
                    .add(entity::forum_post::Column::Content.contains(search)),
            );
        }

        let paginator = query
            .order_by_desc(entity::forum_post::Column::IsPinned)
            .order_by_desc(entity::forum_post::Column::CreatedAt)
            .order_by_desc(entity::forum_post::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let entities = paginator.fetch_page(page.saturating_sub(1)).await?;

        let posts = entities.into_iter().map(ForumPost::from_entity).collect();

        Ok((self.with_authors(posts).await?, total))
    }

    /// Applies a partial update and bumps `updated_at`.
    ///
    /// # Returns
    /// - `Ok(Some(ForumPost))` - Updated post
    /// - `Ok(None)` - No post with that ID
    /// - `Err(DbErr)` - Database error during update
    pub async fn update(&self, params: UpdatePostParams) -> Result<Option<ForumPost>, DbErr> {
        let Some(entity) = entity::prelude::ForumPost::find_by_id(params.id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active = entity.into_active_model();

        if let Some(title) = params.title {
            active.title = ActiveValue::Set(title);
        }
        if let Some(content) = params.content {
            active.content = ActiveValue::Set(content);
        }
        if let Some(is_pinned) = params.is_pinned {
            active.is_pinned = ActiveValue::Set(is_pinned);
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let entity = active.update(self.db).await?;

        Ok(Some(self.single_with_author(entity).await?))
    }

    /// Adds one to the post's reply counter.
    pub async fn increment_reply_count(&self, id: i32) -> Result<(), DbErr> {
        entity::prelude::ForumPost::update_many()
            .filter(entity::forum_post::Column::Id.eq(id))
            .col_expr(
                entity::forum_post::Column::ReplyCount,
                Expr::col(entity::forum_post::Column::ReplyCount).add(1),
            )
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Whether someone other than `user_id` posted in the course after `since`.
    ///
    /// With no `since`, any post by someone else counts.
    pub async fn exists_by_others_since(
        &self,
        course_id: i32,
        user_id: i32,
        since: Option<DateTime<Utc>>,
    ) -> Result<bool, DbErr> {
        let mut query = entity::prelude::ForumPost::find()
            .filter(entity::forum_post::Column::CourseId.eq(course_id))
            .filter(entity::forum_post::Column::UserId.ne(user_id));
        if let Some(since) = since {
            query = query.filter(entity::forum_post::Column::CreatedAt.gt(since));
        }

        Ok(query.count(self.db).await? > 0)
    }

    async fn single_with_author(
        &self,
        entity: entity::forum_post::Model,
    ) -> Result<ForumPost, DbErr> {
        let mut posts = self.with_authors(vec![ForumPost::from_entity(entity)]).await?;

        posts
            .pop()
            .ok_or_else(|| DbErr::RecordNotFound("forum post".to_string()))
    }

    async fn with_authors(&self, mut posts: Vec<ForumPost>) -> Result<Vec<ForumPost>, DbErr> {
        let user_ids: Vec<i32> = posts.iter().map(|p| p.user_id).collect();
        let authors = attach_authors(self.db, &user_ids).await?;

        for post in posts.iter_mut() {
            if let Some((name, role)) = authors.get(&post.user_id) {
                post.author_name = Some(name.clone());
                post.author_role = Some(*role);
            }
        }

        Ok(posts)
    }
}
