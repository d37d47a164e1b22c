use axum::{extract::State, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        analytics::{
            ActivityAnalyticsDto, AnalyticsHistoryDto, CourseAnalyticsDto, DashboardDto,
            LeaderboardDto,
        },
        api::ErrorDto,
    },
    server::{
        controller::extract::PathParam,
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::analytics::AnalyticsService,
        state::AppState,
    },
};

/// Tag for grouping analytics endpoints in OpenAPI documentation
pub static ANALYTICS_TAG: &str = "analytics";

/// Dashboard statistics for the caller.
///
/// The payload shape depends on the role: teachers get course participation, students
/// their recent responses, admins system totals.
///
/// # Returns
/// - `200 OK` - Role specific dashboard
/// - `401 Unauthorized` - Not logged in
#[utoipa::path(
    get,
    path = "/api/analytics/dashboard",
    tag = ANALYTICS_TAG,
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let dashboard = AnalyticsService::new(&state.db).dashboard(&user).await?;

    Ok(Json(dashboard))
}

/// Ranking of a course's students by participation and score.
#[utoipa::path(
    get,
    path = "/api/analytics/leaderboard/{course_id}",
    tag = ANALYTICS_TAG,
    params(
        ("course_id" = i32, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course leaderboard", body = LeaderboardDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot view the course", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    session: Session,
    PathParam(course_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let leaderboard = AnalyticsService::new(&state.db)
        .leaderboard(&user, course_id)
        .await?;

    Ok(Json(leaderboard))
}

#[utoipa::path(
    get,
    path = "/api/analytics/activity/{activity_id}/analytics",
    tag = ANALYTICS_TAG,
    params(
        ("activity_id" = i32, Path, description = "Activity ID")
    ),
    responses(
        (status = 200, description = "Activity statistics", body = ActivityAnalyticsDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller did not create the activity", body = ErrorDto),
        (status = 404, description = "Activity not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_activity_analytics(
    State(state): State<AppState>,
    session: Session,
    PathParam(activity_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let analytics = AnalyticsService::new(&state.db)
        .activity_analytics(&teacher, activity_id)
        .await?;

    Ok(Json(analytics))
}

#[utoipa::path(
    get,
    path = "/api/analytics/activity/{activity_id}/analytics/history",
    tag = ANALYTICS_TAG,
    params(
        ("activity_id" = i32, Path, description = "Activity ID")
    ),
    responses(
        (status = 200, description = "Stored analysis snapshots", body = AnalyticsHistoryDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller did not create the activity", body = ErrorDto),
        (status = 404, description = "Activity not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_analytics_history(
    State(state): State<AppState>,
    session: Session,
    PathParam(activity_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let history = AnalyticsService::new(&state.db)
        .analytics_history(&teacher, activity_id)
        .await?;

    Ok(Json(history))
}

/// Per activity and per student participation of a course.
#[utoipa::path(
    get,
    path = "/api/analytics/course/{course_id}/analytics",
    tag = ANALYTICS_TAG,
    params(
        ("course_id" = i32, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course statistics", body = CourseAnalyticsDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller does not own the course", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_course_analytics(
    State(state): State<AppState>,
    session: Session,
    PathParam(course_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let analytics = AnalyticsService::new(&state.db)
        .course_analytics(&teacher, course_id)
        .await?;

    Ok(Json(analytics))
}
