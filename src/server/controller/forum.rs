use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        forum::{
            CreatePostDto, CreateReplyDto, ForumNotificationDto, PaginatedPostsDto, PostSavedDto,
            PostThreadDto, ReplySavedDto, UpdatePostDto, UpdateReplyDto,
        },
    },
    server::{
        controller::extract::{JsonBody, PathParam, QueryParams},
        error::AppError,
        middleware::auth::AuthGuard,
        service::forum::{ForumService, PostQuery},
        state::AppState,
    },
};

/// Tag for grouping forum endpoints in OpenAPI documentation
pub static FORUM_TAG: &str = "forum";

#[derive(Deserialize)]
pub struct PostListParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub q: Option<String>,
}

/// Get a page of a course forum.
///
/// Pinned posts come first, then the newest. `q` filters by a substring of the title or
/// content.
///
/// # Access Control
/// - Owning teacher, enrolled students and admins
///
/// # Arguments
/// - `course_id` - Course whose forum to list
/// - `params` - 1-based page, page size (default 20) and search text
///
/// # Returns
/// - `200 OK` - Page of posts with navigation flags
/// - `403 Forbidden` - Caller cannot view the course
/// - `404 Not Found` - Course not found
#[utoipa::path(
    get,
    path = "/api/forum/{course_id}",
    tag = FORUM_TAG,
    params(
        ("course_id" = i32, Path, description = "Course ID"),
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Posts per page (default: 20)"),
        ("q" = Option<String>, Query, description = "Search text")
    ),
    responses(
        (status = 200, description = "Page of posts", body = PaginatedPostsDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot view the course", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_posts(
    State(state): State<AppState>,
    session: Session,
    PathParam(course_id): PathParam<i32>,
    QueryParams(params): QueryParams<PostListParams>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let query = PostQuery {
        page: params.page,
        per_page: params.per_page,
        search: params.q,
    };
    let posts = ForumService::new(&state.db)
        .list_posts(&user, course_id, query)
        .await?;

    Ok(Json(posts))
}

#[utoipa::path(
    post,
    path = "/api/forum/{course_id}",
    tag = FORUM_TAG,
    params(
        ("course_id" = i32, Path, description = "Course ID")
    ),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostSavedDto),
        (status = 400, description = "Missing or blank title or content", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot view the course", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_post(
    State(state): State<AppState>,
    session: Session,
    PathParam(course_id): PathParam<i32>,
    JsonBody(payload): JsonBody<CreatePostDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let post = ForumService::new(&state.db)
        .create_post(&user, course_id, payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PostSavedDto {
            message: "Post created successfully".to_string(),
            post,
        }),
    ))
}

/// Edit a post.
///
/// Authors and the course teacher may edit; only the course teacher can change
/// `is_pinned`, which is ignored for anyone else.
#[utoipa::path(
    put,
    path = "/api/forum/post/{post_id}",
    tag = FORUM_TAG,
    params(
        ("post_id" = i32, Path, description = "Post ID")
    ),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = PostSavedDto),
        (status = 400, description = "Blank title or content", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot modify the post", body = ErrorDto),
        (status = 404, description = "Post not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_post(
    State(state): State<AppState>,
    session: Session,
    PathParam(post_id): PathParam<i32>,
    JsonBody(payload): JsonBody<UpdatePostDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let post = ForumService::new(&state.db)
        .update_post(&user, post_id, payload)
        .await?;

    Ok(Json(PostSavedDto {
        message: "Post updated successfully".to_string(),
        post,
    }))
}

/// Soft delete a post; its content is replaced by a deletion notice.
#[utoipa::path(
    delete,
    path = "/api/forum/post/{post_id}",
    tag = FORUM_TAG,
    params(
        ("post_id" = i32, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Post deleted", body = MessageDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot modify the post", body = ErrorDto),
        (status = 404, description = "Post not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_post(
    State(state): State<AppState>,
    session: Session,
    PathParam(post_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ForumService::new(&state.db).delete_post(&user, post_id).await?;

    Ok(Json(MessageDto::new("Post deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/forum/post/{post_id}/replies",
    tag = FORUM_TAG,
    params(
        ("post_id" = i32, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Post with threaded replies", body = PostThreadDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot view the course", body = ErrorDto),
        (status = 404, description = "Post not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_replies(
    State(state): State<AppState>,
    session: Session,
    PathParam(post_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let thread = ForumService::new(&state.db).thread(&user, post_id).await?;

    Ok(Json(thread))
}

/// Reply to a post or to another reply.
///
/// Replies nest at most three levels deep and the parent must belong to the same post.
///
/// # Returns
/// - `201 Created` - Reply stored and the post's reply count incremented
/// - `400 Bad Request` - Blank content, unknown parent or nesting too deep
/// - `403 Forbidden` - Caller cannot view the course
/// - `404 Not Found` - Post not found
#[utoipa::path(
    post,
    path = "/api/forum/post/{post_id}/reply",
    tag = FORUM_TAG,
    params(
        ("post_id" = i32, Path, description = "Post ID")
    ),
    request_body = CreateReplyDto,
    responses(
        (status = 201, description = "Reply created", body = ReplySavedDto),
        (status = 400, description = "Invalid reply", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot view the course", body = ErrorDto),
        (status = 404, description = "Post not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_reply(
    State(state): State<AppState>,
    session: Session,
    PathParam(post_id): PathParam<i32>,
    JsonBody(payload): JsonBody<CreateReplyDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let reply = ForumService::new(&state.db)
        .reply(&user, post_id, payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReplySavedDto {
            message: "Reply created successfully".to_string(),
            reply,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/forum/reply/{reply_id}",
    tag = FORUM_TAG,
    params(
        ("reply_id" = i32, Path, description = "Reply ID")
    ),
    request_body = UpdateReplyDto,
    responses(
        (status = 200, description = "Reply updated", body = ReplySavedDto),
        (status = 400, description = "Blank content", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot modify the reply", body = ErrorDto),
        (status = 404, description = "Reply not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_reply(
    State(state): State<AppState>,
    session: Session,
    PathParam(reply_id): PathParam<i32>,
    JsonBody(payload): JsonBody<UpdateReplyDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let reply = ForumService::new(&state.db)
        .update_reply(&user, reply_id, payload)
        .await?;

    Ok(Json(ReplySavedDto {
        message: "Reply updated successfully".to_string(),
        reply,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/forum/reply/{reply_id}",
    tag = FORUM_TAG,
    params(
        ("reply_id" = i32, Path, description = "Reply ID")
    ),
    responses(
        (status = 200, description = "Reply deleted", body = MessageDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot modify the reply", body = ErrorDto),
        (status = 404, description = "Reply not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_reply(
    State(state): State<AppState>,
    session: Session,
    PathParam(reply_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ForumService::new(&state.db).delete_reply(&user, reply_id).await?;

    Ok(Json(MessageDto::new("Reply deleted successfully")))
}

/// Whether the course forum has posts or replies by others since the last visit.
#[utoipa::path(
    get,
    path = "/api/forum/{course_id}/notifications",
    tag = FORUM_TAG,
    params(
        ("course_id" = i32, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Unread state", body = ForumNotificationDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot view the course", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_notifications(
    State(state): State<AppState>,
    session: Session,
    PathParam(course_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let notifications = ForumService::new(&state.db)
        .notifications(&user, course_id)
        .await?;

    Ok(Json(notifications))
}

#[utoipa::path(
    post,
    path = "/api/forum/{course_id}/mark-read",
    tag = FORUM_TAG,
    params(
        ("course_id" = i32, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Forum marked as read", body = MessageDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot view the course", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn mark_read(
    State(state): State<AppState>,
    session: Session,
    PathParam(course_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ForumService::new(&state.db).mark_read(&user, course_id).await?;

    Ok(Json(MessageDto::new("Forum marked as read")))
}
