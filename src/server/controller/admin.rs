use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    model::{
        activity::ActivityListDto,
        admin::{AdminStatsDto, PaginatedUsersDto, UpdateUserDto},
        api::{ErrorDto, MessageDto},
        course::{CourseDetailDto, CourseListDto, CourseSavedDto, UpdateCourseDto},
        import::ImportSummaryDto,
        user::{RegisterDto, UserDetailDto, UserSavedDto},
    },
    server::{
        controller::{
            extract::{JsonBody, MultipartBody, PathParam, QueryParams},
            form::read_spreadsheet,
        },
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::{
            admin::AdminService,
            import::{ImportService, USER_COLUMNS},
        },
        state::AppState,
    },
};

/// Tag for grouping admin endpoints in OpenAPI documentation
pub static ADMIN_TAG: &str = "admin";

#[derive(Deserialize)]
pub struct UserListParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub role: Option<String>,
}

/// Get a page of users, newest first.
///
/// # Access Control
/// - `Admin` - Only admins can list users
///
/// # Arguments
/// - `params` - 1-based page, page size (default 20) and optional role filter
///
/// # Returns
/// - `200 OK` - Page of users with totals
/// - `400 Bad Request` - Unknown role filter
/// - `401 Unauthorized` - Not logged in
/// - `403 Forbidden` - Caller is not an admin
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = ADMIN_TAG,
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Users per page (default: 20)"),
        ("role" = Option<String>, Query, description = "Role filter")
    ),
    responses(
        (status = 200, description = "Page of users", body = PaginatedUsersDto),
        (status = 400, description = "Invalid role filter", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_users(
    State(state): State<AppState>,
    session: Session,
    QueryParams(params): QueryParams<UserListParams>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let users = AdminService::new(&state.db, &state.email_domain)
        .list_users(params.role, params.page, params.per_page)
        .await?;

    Ok(Json(users.into_dto()))
}

/// Create an account of any role. Students must carry a unique student ID.
#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = ADMIN_TAG,
    request_body = RegisterDto,
    responses(
        (status = 201, description = "User created", body = UserSavedDto),
        (status = 400, description = "Invalid user data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_user(
    State(state): State<AppState>,
    session: Session,
    JsonBody(payload): JsonBody<RegisterDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let user = AdminService::new(&state.db, &state.email_domain)
        .create_user(payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserSavedDto {
            message: "User created successfully".to_string(),
            user: user.into_dto(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{user_id}",
    tag = ADMIN_TAG,
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = UserDetailDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user(
    State(state): State<AppState>,
    session: Session,
    PathParam(user_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let user = AdminService::new(&state.db, &state.email_domain)
        .get_user(user_id)
        .await?;

    Ok(Json(UserDetailDto {
        user: user.into_dto(),
    }))
}

/// Update any account. An unknown role is ignored.
#[utoipa::path(
    put,
    path = "/api/admin/users/{user_id}",
    tag = ADMIN_TAG,
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = UserSavedDto),
        (status = 400, description = "Invalid or duplicate email or student ID", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_user(
    State(state): State<AppState>,
    session: Session,
    PathParam(user_id): PathParam<i32>,
    JsonBody(payload): JsonBody<UpdateUserDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let user = AdminService::new(&state.db, &state.email_domain)
        .update_user(user_id, payload)
        .await?;

    Ok(Json(UserSavedDto {
        message: "User updated successfully".to_string(),
        user: user.into_dto(),
    }))
}

/// Delete an account other than the caller's own.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{user_id}",
    tag = ADMIN_TAG,
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageDto),
        (status = 400, description = "Cannot delete own account", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_user(
    State(state): State<AppState>,
    session: Session,
    PathParam(user_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    AdminService::new(&state.db, &state.email_domain)
        .delete_user(&admin, user_id, state.storage.as_ref())
        .await?;

    Ok(Json(MessageDto::new("User deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/admin/courses",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Every course", body = CourseListDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_courses(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let courses = AdminService::new(&state.db, &state.email_domain)
        .list_courses()
        .await?;

    Ok(Json(CourseListDto {
        courses: courses.into_iter().map(|c| c.into_dto()).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/admin/courses/{course_id}",
    tag = ADMIN_TAG,
    params(
        ("course_id" = i32, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course details", body = CourseDetailDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_course(
    State(state): State<AppState>,
    session: Session,
    PathParam(course_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let course = AdminService::new(&state.db, &state.email_domain)
        .get_course(course_id)
        .await?;

    Ok(Json(CourseDetailDto {
        course: course.into_dto(),
    }))
}

/// Update any course, including its code.
#[utoipa::path(
    put,
    path = "/api/admin/courses/{course_id}",
    tag = ADMIN_TAG,
    params(
        ("course_id" = i32, Path, description = "Course ID")
    ),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = CourseSavedDto),
        (status = 400, description = "Course code already in use", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_course(
    State(state): State<AppState>,
    session: Session,
    PathParam(course_id): PathParam<i32>,
    JsonBody(payload): JsonBody<UpdateCourseDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let course = AdminService::new(&state.db, &state.email_domain)
        .update_course(course_id, payload)
        .await?;

    Ok(Json(CourseSavedDto {
        message: "Course updated successfully".to_string(),
        course: course.into_dto(),
    }))
}

/// Delete a course with everything under it, including stored documents.
#[utoipa::path(
    delete,
    path = "/api/admin/courses/{course_id}",
    tag = ADMIN_TAG,
    params(
        ("course_id" = i32, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course deleted", body = MessageDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_course(
    State(state): State<AppState>,
    session: Session,
    PathParam(course_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    AdminService::new(&state.db, &state.email_domain)
        .delete_course(course_id, state.storage.as_ref())
        .await?;

    Ok(Json(MessageDto::new("Course deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/admin/activities",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "Every activity", body = ActivityListDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_activities(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let activities = AdminService::new(&state.db, &state.email_domain)
        .list_activities()
        .await?;

    Ok(Json(ActivityListDto {
        activities: activities.into_iter().map(|a| a.into_dto()).collect(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/admin/activities/{activity_id}",
    tag = ADMIN_TAG,
    params(
        ("activity_id" = i32, Path, description = "Activity ID")
    ),
    responses(
        (status = 200, description = "Activity deleted", body = MessageDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 404, description = "Activity not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_activity(
    State(state): State<AppState>,
    session: Session,
    PathParam(activity_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    AdminService::new(&state.db, &state.email_domain)
        .delete_activity(activity_id)
        .await?;

    Ok(Json(MessageDto::new("Activity deleted successfully")))
}

/// System statistics, with activity counted over the last seven days.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = ADMIN_TAG,
    responses(
        (status = 200, description = "System statistics", body = AdminStatsDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_stats(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let stats = AdminService::new(&state.db, &state.email_domain)
        .stats()
        .await?;

    Ok(Json(stats))
}

/// Import users from an Excel sheet.
///
/// Required columns are `username`, `full_name`, `email` and `role` (student or
/// teacher); `department`, `student_id` (required for students) and `course_code`
/// (students only) are optional. The whole sheet is imported in one transaction.
///
/// # Returns
/// - `200 OK` - Import summary with at most 20 row errors
/// - `400 Bad Request` - Missing file, not an Excel file, or missing columns
/// - `403 Forbidden` - Caller is not an admin
#[utoipa::path(
    post,
    path = "/api/admin/import-users-excel",
    tag = ADMIN_TAG,
    request_body(
        content_type = "multipart/form-data",
        description = "Excel file in the `file` field"
    ),
    responses(
        (status = 200, description = "Import finished", body = ImportSummaryDto),
        (status = 400, description = "Invalid spreadsheet", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn import_users_excel(
    State(state): State<AppState>,
    session: Session,
    MultipartBody(multipart): MultipartBody,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let rows = read_spreadsheet(multipart, USER_COLUMNS).await?;

    let summary = ImportService::new(&state.db, &state.email_domain, &state.default_import_password)
        .import_users(rows)
        .await?;

    Ok(Json(summary.into_dto("Excel import completed")))
}
