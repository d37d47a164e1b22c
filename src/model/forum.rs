use chrono::{DateTime, Utc};
use entity::user::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ForumPostDto {
    pub id: i32,
    pub course_id: i32,
    pub user_id: i32,
    pub author_name: Option<String>,
    pub author_role: Option<Role>,
    pub title: String,
    pub content: String,
    pub is_pinned: bool,
    pub reply_count: i32,
    pub can_delete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A reply with its nested children, ordered by creation time.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ForumReplyDto {
    pub id: i32,
    pub post_id: i32,
    pub user_id: i32,
    pub author_name: Option<String>,
    pub author_role: Option<Role>,
    pub content: String,
    pub parent_reply_id: Option<i32>,
    pub can_delete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[schema(no_recursion)]
    pub child_replies: Vec<ForumReplyDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct PaginatedPostsDto {
    pub posts: Vec<ForumPostDto>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct PostSavedDto {
    pub message: String,
    pub post: ForumPostDto,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct PostThreadDto {
    pub post: ForumPostDto,
    pub replies: Vec<ForumReplyDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ReplySavedDto {
    pub message: String,
    pub reply: ForumReplyDto,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct CreatePostDto {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct UpdatePostDto {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_pinned: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct CreateReplyDto {
    pub content: Option<String>,
    pub parent_reply_id: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct UpdateReplyDto {
    pub content: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ForumNotificationDto {
    pub has_unread: bool,
    pub last_read_at: Option<DateTime<Utc>>,
}
