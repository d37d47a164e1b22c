//! Course discussion forum: posts, threaded replies, soft deletion and unread markers.

use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::forum::{
        CreatePostDto, CreateReplyDto, ForumNotificationDto, ForumPostDto, ForumReplyDto,
        PaginatedPostsDto, PostThreadDto, UpdatePostDto, UpdateReplyDto,
    },
    server::{
        data::{
            forum_post::ForumPostRepository, forum_read::ForumReadRepository,
            forum_reply::ForumReplyRepository,
        },
        error::AppError,
        model::{
            course::Course,
            forum::{
                build_reply_tree, post_deleted_marker, reply_deleted_marker, CreatePostParams,
                CreateReplyParams, ForumPost, ForumReply, PaginatedPosts, UpdatePostParams,
                MAX_REPLY_DEPTH,
            },
            user::User,
        },
        service::access::{denied, ensure_course_viewer, load_course, owns_course},
    },
};

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;

/// Listing parameters for a course forum.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub search: Option<String>,
}

pub struct ForumService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ForumService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a page of a course's posts, pinned first then newest.
    ///
    /// # Arguments
    /// - `user` - Caller, must be able to view the course
    /// - `course_id` - Course forum
    /// - `query` - Page, page size and optional search text
    ///
    /// # Returns
    /// - `Ok(PaginatedPostsDto)` - Posts with `can_delete` set for the caller
    /// - `Err(AppError::NotFound)` - Course does not exist
    /// - `Err(AppError::AuthErr)` - Caller cannot view the course
    pub async fn list_posts(
        &self,
        user: &User,
        course_id: i32,
        query: PostQuery,
    ) -> Result<PaginatedPostsDto, AppError> {
        let course = self.viewable_course(user, course_id).await?;

        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let (posts, total) = ForumPostRepository::new(self.db)
            .get_paginated(course.id, search, page, per_page)
            .await?;

        let paginated = PaginatedPosts {
            posts,
            total,
            per_page,
            page,
        };

        Ok(paginated.into_dto(|author_id| can_modify(user, &course, author_id)))
    }

    pub async fn create_post(
        &self,
        user: &User,
        course_id: i32,
        payload: CreatePostDto,
    ) -> Result<ForumPostDto, AppError> {
        let course = self.viewable_course(user, course_id).await?;

        let title = non_blank(payload.title, "Title")?;
        let content = non_blank(payload.content, "Content")?;
        let (Some(title), Some(content)) = (title, content) else {
            return Err(AppError::bad_request("Title and content are required"));
        };

        let post = ForumPostRepository::new(self.db)
            .create(CreatePostParams {
                course_id: course.id,
                user_id: user.id,
                title,
                content,
            })
            .await?;

        Ok(post.into_dto(true))
    }

    /// Edits a post. Pinning is only applied for the teacher who owns the course and is
    /// silently ignored for anyone else.
    pub async fn update_post(
        &self,
        user: &User,
        post_id: i32,
        payload: UpdatePostDto,
    ) -> Result<ForumPostDto, AppError> {
        let (post, course) = self.load_post(user, post_id).await?;
        ensure_can_modify(user, &course, post.user_id, "post")?;

        let params = UpdatePostParams {
            id: post.id,
            title: non_blank(payload.title, "Title")?,
            content: non_blank(payload.content, "Content")?,
            is_pinned: payload.is_pinned.filter(|_| owns_course(user, &course)),
        };

        let post = ForumPostRepository::new(self.db)
            .update(params)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;

        Ok(post.into_dto(true))
    }

    /// Replaces the post content with a deletion marker; the post and its replies stay.
    pub async fn delete_post(&self, user: &User, post_id: i32) -> Result<(), AppError> {
        let (post, course) = self.load_post(user, post_id).await?;
        ensure_can_modify(user, &course, post.user_id, "post")?;

        ForumPostRepository::new(self.db)
            .update(UpdatePostParams {
                id: post.id,
                content: Some(post_deleted_marker(user.role).to_string()),
                ..Default::default()
            })
            .await?;

        tracing::info!("User {} deleted forum post {}", user.id, post.id);

        Ok(())
    }

    /// A post with its replies arranged into a tree.
    pub async fn thread(&self, user: &User, post_id: i32) -> Result<PostThreadDto, AppError> {
        let (post, course) = self.load_post(user, post_id).await?;

        let replies = ForumReplyRepository::new(self.db).get_by_post(post.id).await?;
        let replies = build_reply_tree(replies, |author_id| can_modify(user, &course, author_id));
        let can_delete = can_modify(user, &course, post.user_id);

        Ok(PostThreadDto {
            post: post.into_dto(can_delete),
            replies,
        })
    }

    /// Adds a reply, optionally under another reply of the same post.
    ///
    /// # Returns
    /// - `Ok(ForumReplyDto)` - Stored reply
    /// - `Err(AppError::BadRequest)` - Blank content, unknown parent, or a parent already
    ///   at the deepest level
    /// - `Err(AppError::NotFound)` - Post does not exist
    /// - `Err(AppError::AuthErr)` - Caller cannot view the course
    pub async fn reply(
        &self,
        user: &User,
        post_id: i32,
        payload: CreateReplyDto,
    ) -> Result<ForumReplyDto, AppError> {
        let (post, course) = self.load_post(user, post_id).await?;

        let Some(content) = non_blank(payload.content, "Reply content")? else {
            return Err(AppError::bad_request("Missing reply content"));
        };

        let replies = ForumReplyRepository::new(self.db);
        if let Some(parent_id) = payload.parent_reply_id {
            let parent = replies
                .find_by_id(parent_id)
                .await?
                .filter(|parent| parent.post_id == post.id)
                .ok_or_else(|| AppError::bad_request("Parent reply does not exist"))?;

            if self.depth_of(&parent).await? + 1 >= MAX_REPLY_DEPTH {
                return Err(AppError::bad_request(
                    "Cannot reply to this comment. Maximum nesting depth (3 levels) exceeded.",
                ));
            }
        }

        let txn = self.db.begin().await?;
        let reply = ForumReplyRepository::new(&txn)
            .create(CreateReplyParams {
                post_id: post.id,
                user_id: user.id,
                content,
                parent_reply_id: payload.parent_reply_id,
            })
            .await?;
        ForumPostRepository::new(&txn)
            .increment_reply_count(post.id)
            .await?;
        txn.commit().await?;

        let can_delete = can_modify(user, &course, reply.user_id);

        Ok(reply.into_dto(can_delete))
    }

    pub async fn update_reply(
        &self,
        user: &User,
        reply_id: i32,
        payload: UpdateReplyDto,
    ) -> Result<ForumReplyDto, AppError> {
        let (reply, course) = self.load_reply(user, reply_id).await?;
        ensure_can_modify(user, &course, reply.user_id, "reply")?;

        let Some(content) = non_blank(payload.content, "Content")? else {
            return Err(AppError::bad_request("Missing reply content"));
        };

        let reply = ForumReplyRepository::new(self.db)
            .update_content(reply.id, content)
            .await?
            .ok_or_else(|| AppError::not_found("Reply not found"))?;

        Ok(reply.into_dto(true))
    }

    /// Replaces the reply content with a deletion marker; the reply count is unchanged.
    pub async fn delete_reply(&self, user: &User, reply_id: i32) -> Result<(), AppError> {
        let (reply, course) = self.load_reply(user, reply_id).await?;
        ensure_can_modify(user, &course, reply.user_id, "reply")?;

        ForumReplyRepository::new(self.db)
            .update_content(reply.id, reply_deleted_marker(user.role).to_string())
            .await?;

        Ok(())
    }

    /// Whether others posted or replied since the caller last marked the forum read.
    pub async fn notifications(
        &self,
        user: &User,
        course_id: i32,
    ) -> Result<ForumNotificationDto, AppError> {
        let course = self.viewable_course(user, course_id).await?;

        let last_read_at = ForumReadRepository::new(self.db)
            .get_last_read(user.id, course.id)
            .await?;

        let has_unread = ForumPostRepository::new(self.db)
            .exists_by_others_since(course.id, user.id, last_read_at)
            .await?
            || ForumReplyRepository::new(self.db)
                .exists_by_others_since(course.id, user.id, last_read_at)
                .await?;

        Ok(ForumNotificationDto {
            has_unread,
            last_read_at,
        })
    }

    pub async fn mark_read(&self, user: &User, course_id: i32) -> Result<(), AppError> {
        let course = self.viewable_course(user, course_id).await?;

        ForumReadRepository::new(self.db)
            .mark_read(user.id, course.id, Utc::now())
            .await?;

        Ok(())
    }

    async fn viewable_course(&self, user: &User, course_id: i32) -> Result<Course, AppError> {
        let course = load_course(self.db, course_id).await?;
        ensure_course_viewer(self.db, user, &course, true).await?;

        Ok(course)
    }

    async fn load_post(&self, user: &User, post_id: i32) -> Result<(ForumPost, Course), AppError> {
        let post = ForumPostRepository::new(self.db)
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;
        let course = self.viewable_course(user, post.course_id).await?;

        Ok((post, course))
    }

    async fn load_reply(
        &self,
        user: &User,
        reply_id: i32,
    ) -> Result<(ForumReply, Course), AppError> {
        let reply = ForumReplyRepository::new(self.db)
            .find_by_id(reply_id)
            .await?
            .ok_or_else(|| AppError::not_found("Reply not found"))?;
        let (_, course) = self.load_post(user, reply.post_id).await?;

        Ok((reply, course))
    }

    /// Level of a reply below the post, 0 for a top-level reply.
    async fn depth_of(&self, reply: &ForumReply) -> Result<usize, AppError> {
        let replies = ForumReplyRepository::new(self.db);
        let mut depth = 0;
        let mut parent = reply.parent_reply_id;

        while let Some(id) = parent {
            depth += 1;
            if depth >= MAX_REPLY_DEPTH {
                break;
            }
            parent = replies.get_parent_id(id).await?;
        }

        Ok(depth)
    }
}

/// Authors may modify their own content; the course teacher may modify anything.
fn can_modify(user: &User, course: &Course, author_id: i32) -> bool {
    author_id == user.id || owns_course(user, course)
}

fn ensure_can_modify(
    user: &User,
    course: &Course,
    author_id: i32,
    what: &str,
) -> Result<(), AppError> {
    if can_modify(user, course, author_id) {
        Ok(())
    } else {
        Err(denied(user, format!("cannot modify this {}", what)))
    }
}

/// Trims a supplied field; `None` when absent, 400 when present but blank.
fn non_blank(value: Option<String>, field: &str) -> Result<Option<String>, AppError> {
    match value {
        None => Ok(None),
        Some(value) => {
            let value = value.trim();
            if value.is_empty() {
                Err(AppError::BadRequest(format!("{} cannot be empty", field)))
            } else {
                Ok(Some(value.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{
        data::user::UserRepository,
        model::forum::{POST_DELETED_BY_OWNER, REPLY_DELETED_BY_TEACHER},
    };
    use test_utils::{builder::TestBuilder, factory};

    async fn user(db: &DatabaseConnection, id: i32) -> User {
        UserRepository::new(db).find_by_id(id).await.unwrap().unwrap()
    }

    fn post(title: &str, content: &str) -> CreatePostDto {
        CreatePostDto {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
        }
    }

    fn reply_to(parent: Option<i32>) -> CreateReplyDto {
        CreateReplyDto {
            content: Some("reply".to_string()),
            parent_reply_id: parent,
        }
    }

    #[tokio::test]
    async fn outsider_cannot_read_forum() -> Result<(), AppError> {
        let test = TestBuilder::new().with_forum_tables().build().await.unwrap();
        let db = &test.db;

        let (_, course) = factory::helpers::create_course_with_teacher(db).await?;
        let outsider = user(db, factory::user::create_student(db).await?.id).await;

        let result = ForumService::new(db)
            .list_posts(&outsider, course.id, PostQuery::default())
            .await;

        assert!(matches!(result, Err(AppError::AuthErr(_))));

        Ok(())
    }

    #[tokio::test]
    async fn blank_fields_rejected_and_trimmed() -> Result<(), AppError> {
        let test = TestBuilder::new().with_forum_tables().build().await.unwrap();
        let db = &test.db;

        let (_, course) = factory::helpers::create_course_with_teacher(db).await?;
        let student = factory::helpers::create_enrolled_student(db, course.id).await?;
        let student = user(db, student.id).await;
        let service = ForumService::new(db);

        let blank = service.create_post(&student, course.id, post("  ", "text")).await;
        assert!(matches!(blank, Err(AppError::BadRequest(_))));

        let created = service
            .create_post(&student, course.id, post("  Question ", " body "))
            .await?;
        assert_eq!(created.title, "Question");
        assert_eq!(created.content, "body");
        assert!(created.can_delete);

        Ok(())
    }

    #[tokio::test]
    async fn pinning_is_reserved_for_course_teacher() -> Result<(), AppError> {
        let test = TestBuilder::new().with_forum_tables().build().await.unwrap();
        let db = &test.db;

        let (_, course) = factory::helpers::create_course_with_teacher(db).await?;
        let student = factory::helpers::create_enrolled_student(db, course.id).await?;
        let student = user(db, student.id).await;
        let teacher = user(db, course.teacher_id).await;
        let service = ForumService::new(db);

        let created = service.create_post(&student, course.id, post("Q", "A")).await?;
        let pin = UpdatePostDto {
            is_pinned: Some(true),
            ..Default::default()
        };

        let by_student = service.update_post(&student, created.id, pin.clone()).await?;
        assert!(!by_student.is_pinned);

        let by_teacher = service.update_post(&teacher, created.id, pin).await?;
        assert!(by_teacher.is_pinned);

        let listing = service
            .list_posts(&student, course.id, PostQuery::default())
            .await?;
        assert_eq!(listing.total, 1);
        assert!(listing.posts[0].can_delete);

        Ok(())
    }

    #[tokio::test]
    async fn classmates_cannot_modify_each_other() -> Result<(), AppError> {
        let test = TestBuilder::new().with_forum_tables().build().await.unwrap();
        let db = &test.db;

        let (_, course) = factory::helpers::create_course_with_teacher(db).await?;
        let author = factory::helpers::create_enrolled_student(db, course.id).await?;
        let author = user(db, author.id).await;
        let classmate = factory::helpers::create_enrolled_student(db, course.id).await?;
        let classmate = user(db, classmate.id).await;
        let service = ForumService::new(db);

        let created = service.create_post(&author, course.id, post("Q", "A")).await?;

        let result = service.delete_post(&classmate, created.id).await;
        assert!(matches!(result, Err(AppError::AuthErr(_))));

        let thread = service.thread(&classmate, created.id).await?;
        assert!(!thread.post.can_delete);

        Ok(())
    }

    #[tokio::test]
    async fn soft_delete_keeps_post_and_counts() -> Result<(), AppError> {
        let test = TestBuilder::new().with_forum_tables().build().await.unwrap();
        let db = &test.db;

        let (_, course) = factory::helpers::create_course_with_teacher(db).await?;
        let student = factory::helpers::create_enrolled_student(db, course.id).await?;
        let student = user(db, student.id).await;
        let teacher = user(db, course.teacher_id).await;
        let service = ForumService::new(db);

        let created = service.create_post(&student, course.id, post("Q", "A")).await?;
        let reply = service.reply(&student, created.id, reply_to(None)).await?;

        service.delete_reply(&teacher, reply.id).await?;
        service.delete_post(&student, created.id).await?;

        let thread = service.thread(&student, created.id).await?;
        assert_eq!(thread.post.content, POST_DELETED_BY_OWNER);
        assert_eq!(thread.post.reply_count, 1);
        assert_eq!(thread.replies[0].content, REPLY_DELETED_BY_TEACHER);

        Ok(())
    }

    #[tokio::test]
    async fn replies_nest_three_levels_deep() -> Result<(), AppError> {
        let test = TestBuilder::new().with_forum_tables().build().await.unwrap();
        let db = &test.db;

        let (_, course) = factory::helpers::create_course_with_teacher(db).await?;
        let student = factory::helpers::create_enrolled_student(db, course.id).await?;
        let student = user(db, student.id).await;
        let service = ForumService::new(db);

        let created = service.create_post(&student, course.id, post("Q", "A")).await?;
        let first = service.reply(&student, created.id, reply_to(None)).await?;
        let second = service.reply(&student, created.id, reply_to(Some(first.id))).await?;
        let third = service.reply(&student, created.id, reply_to(Some(second.id))).await?;

        let too_deep = service.reply(&student, created.id, reply_to(Some(third.id))).await;
        assert!(matches!(too_deep, Err(AppError::BadRequest(_))));

        let thread = service.thread(&student, created.id).await?;
        assert_eq!(thread.post.reply_count, 3);
        assert_eq!(thread.replies.len(), 1);
        assert_eq!(thread.replies[0].child_replies[0].child_replies[0].id, third.id);

        Ok(())
    }

    #[tokio::test]
    async fn parent_must_belong_to_same_post() -> Result<(), AppError> {
        let test = TestBuilder::new().with_forum_tables().build().await.unwrap();
        let db = &test.db;

        let (_, course) = factory::helpers::create_course_with_teacher(db).await?;
        let student = factory::helpers::create_enrolled_student(db, course.id).await?;
        let student = user(db, student.id).await;
        let service = ForumService::new(db);

        let first = service.create_post(&student, course.id, post("One", "A")).await?;
        let second = service.create_post(&student, course.id, post("Two", "B")).await?;
        let foreign = service.reply(&student, first.id, reply_to(None)).await?;

        let result = service.reply(&student, second.id, reply_to(Some(foreign.id))).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        Ok(())
    }

    #[tokio::test]
    async fn unread_tracks_other_authors_until_marked() -> Result<(), AppError> {
        let test = TestBuilder::new().with_forum_tables().build().await.unwrap();
        let db = &test.db;

        let (_, course) = factory::helpers::create_course_with_teacher(db).await?;
        let student = factory::helpers::create_enrolled_student(db, course.id).await?;
        let student = user(db, student.id).await;
        let teacher = user(db, course.teacher_id).await;
        let service = ForumService::new(db);

        service.create_post(&student, course.id, post("Mine", "A")).await?;
        let own = service.notifications(&student, course.id).await?;
        assert!(!own.has_unread);
        assert!(own.last_read_at.is_none());

        service.create_post(&teacher, course.id, post("Notice", "B")).await?;
        assert!(service.notifications(&student, course.id).await?.has_unread);

        service.mark_read(&student, course.id).await?;
        let after = service.notifications(&student, course.id).await?;
        assert!(!after.has_unread);
        assert!(after.last_read_at.is_some());

        Ok(())
    }
}
