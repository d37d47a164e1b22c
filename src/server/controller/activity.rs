use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    model::{
        activity::{
            ActivityDetailDto, ActivityListDto, ActivitySavedDto, ActivityTypesDto,
            CreateActivityDto, UpdateActivityDto,
        },
        ai::{GenerateActivityDto, GeneratedActivityDto, RefineActivityDto, RefinedActivityDto},
        api::{ErrorDto, MessageDto},
    },
    server::{
        controller::extract::{JsonBody, PathParam, QueryParams},
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::{
            activity::{activity_types, ActivityQuery, ActivityService, Refinement},
            ai::AiOutcome,
        },
        state::AppState,
    },
};

/// Tag for grouping activity endpoints in OpenAPI documentation
pub static ACTIVITY_TAG: &str = "activity";

#[derive(Deserialize)]
pub struct ActivityListParams {
    pub course_id: Option<i32>,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub status: Option<String>,
}

/// List activities visible to the caller, newest first.
///
/// # Access Control
/// - `Teacher` - Activities they created
/// - `Student` - Activities of courses they are enrolled in
/// - `Admin` - Every activity
///
/// # Arguments
/// - `params` - Optional course, type and status filters
///
/// # Returns
/// - `200 OK` - Matching activities
/// - `400 Bad Request` - Unknown type or status filter
/// - `401 Unauthorized` - Not logged in
#[utoipa::path(
    get,
    path = "/api/activities",
    tag = ACTIVITY_TAG,
    params(
        ("course_id" = Option<i32>, Query, description = "Only activities of this course"),
        ("type" = Option<String>, Query, description = "Activity type filter"),
        ("status" = Option<String>, Query, description = "Status filter")
    ),
    responses(
        (status = 200, description = "Matching activities", body = ActivityListDto),
        (status = 400, description = "Invalid filter", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_activities(
    State(state): State<AppState>,
    session: Session,
    QueryParams(params): QueryParams<ActivityListParams>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let query = ActivityQuery {
        course_id: params.course_id,
        activity_type: params.activity_type,
        status: params.status,
    };
    let activities = ActivityService::new(&state.db).list(&user, query).await?;

    Ok(Json(ActivityListDto {
        activities: activities.into_iter().map(|a| a.into_dto()).collect(),
    }))
}

/// Catalogue of the supported activity types.
#[utoipa::path(
    get,
    path = "/api/activities/types",
    tag = ACTIVITY_TAG,
    responses(
        (status = 200, description = "Activity types", body = ActivityTypesDto)
    ),
)]
pub async fn get_activity_types() -> impl IntoResponse {
    Json(ActivityTypesDto {
        types: activity_types(),
    })
}

#[utoipa::path(
    get,
    path = "/api/activities/{activity_id}",
    tag = ACTIVITY_TAG,
    params(
        ("activity_id" = i32, Path, description = "Activity ID")
    ),
    responses(
        (status = 200, description = "Activity details", body = ActivityDetailDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot view the activity", body = ErrorDto),
        (status = 404, description = "Activity not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_activity(
    State(state): State<AppState>,
    session: Session,
    PathParam(activity_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let activity = ActivityService::new(&state.db).get(&user, activity_id).await?;

    Ok(Json(ActivityDetailDto {
        activity: activity.into_dto(),
    }))
}

/// Create a draft activity in a course the caller teaches.
///
/// # Returns
/// - `201 Created` - Activity created in draft status
/// - `400 Bad Request` - Missing title, course or invalid type
/// - `403 Forbidden` - Caller does not own the course
/// - `404 Not Found` - Course not found
#[utoipa::path(
    post,
    path = "/api/activities",
    tag = ACTIVITY_TAG,
    request_body = CreateActivityDto,
    responses(
        (status = 201, description = "Activity created", body = ActivitySavedDto),
        (status = 400, description = "Invalid activity data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller does not own the course", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_activity(
    State(state): State<AppState>,
    session: Session,
    JsonBody(payload): JsonBody<CreateActivityDto>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let activity = ActivityService::new(&state.db).create(&teacher, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ActivitySavedDto {
            message: "Activity created successfully".to_string(),
            activity: activity.into_dto(),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/activities/{activity_id}",
    tag = ACTIVITY_TAG,
    params(
        ("activity_id" = i32, Path, description = "Activity ID")
    ),
    request_body = UpdateActivityDto,
    responses(
        (status = 200, description = "Activity updated", body = ActivitySavedDto),
        (status = 400, description = "Invalid status", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller did not create the activity", body = ErrorDto),
        (status = 404, description = "Activity not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_activity(
    State(state): State<AppState>,
    session: Session,
    PathParam(activity_id): PathParam<i32>,
    JsonBody(payload): JsonBody<UpdateActivityDto>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let activity = ActivityService::new(&state.db)
        .update(&teacher, activity_id, payload)
        .await?;

    Ok(Json(ActivitySavedDto {
        message: "Activity updated successfully".to_string(),
        activity: activity.into_dto(),
    }))
}

/// Delete an activity together with its responses and analysis snapshots.
#[utoipa::path(
    delete,
    path = "/api/activities/{activity_id}",
    tag = ACTIVITY_TAG,
    params(
        ("activity_id" = i32, Path, description = "Activity ID")
    ),
    responses(
        (status = 200, description = "Activity deleted", body = MessageDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller did not create the activity", body = ErrorDto),
        (status = 404, description = "Activity not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_activity(
    State(state): State<AppState>,
    session: Session,
    PathParam(activity_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    ActivityService::new(&state.db)
        .delete(&teacher, activity_id)
        .await?;

    Ok(Json(MessageDto::new("Activity deleted successfully")))
}

/// Open an activity for responses for its configured duration.
#[utoipa::path(
    post,
    path = "/api/activities/{activity_id}/start",
    tag = ACTIVITY_TAG,
    params(
        ("activity_id" = i32, Path, description = "Activity ID")
    ),
    responses(
        (status = 200, description = "Activity started", body = ActivitySavedDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller did not create the activity", body = ErrorDto),
        (status = 404, description = "Activity not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn start_activity(
    State(state): State<AppState>,
    session: Session,
    PathParam(activity_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let activity = ActivityService::new(&state.db)
        .start(&teacher, activity_id)
        .await?;

    Ok(Json(ActivitySavedDto {
        message: "Activity started".to_string(),
        activity: activity.into_dto(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/activities/{activity_id}/stop",
    tag = ACTIVITY_TAG,
    params(
        ("activity_id" = i32, Path, description = "Activity ID")
    ),
    responses(
        (status = 200, description = "Activity completed", body = ActivitySavedDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller did not create the activity", body = ErrorDto),
        (status = 404, description = "Activity not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn stop_activity(
    State(state): State<AppState>,
    session: Session,
    PathParam(activity_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let activity = ActivityService::new(&state.db)
        .stop(&teacher, activity_id)
        .await?;

    Ok(Json(ActivitySavedDto {
        message: "Activity stopped".to_string(),
        activity: activity.into_dto(),
    }))
}

/// Generate activity content with the AI service.
///
/// Text of the selected course documents is appended to the supplied course content.
///
/// # Access Control
/// - `Teacher` - Must own `course_id` when one is given
///
/// # Returns
/// - `200 OK` - Generated activity JSON
/// - `400 Bad Request` - Missing activity type or content
/// - `403 Forbidden` - Caller does not own the course
/// - `500 Internal Server Error` - AI service unavailable; the body is the fallback object
#[utoipa::path(
    post,
    path = "/api/activities/ai/generate",
    tag = ACTIVITY_TAG,
    request_body = GenerateActivityDto,
    responses(
        (status = 200, description = "Activity generated", body = GeneratedActivityDto),
        (status = 400, description = "Invalid generation request", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller does not own the course", body = ErrorDto),
        (status = 500, description = "AI service unavailable", body = ErrorDto)
    ),
)]
pub async fn generate_activity(
    State(state): State<AppState>,
    session: Session,
    JsonBody(payload): JsonBody<GenerateActivityDto>,
) -> Result<Response, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let outcome = ActivityService::new(&state.db)
        .generate(&teacher, payload, &state.ai, state.storage.as_ref())
        .await?;

    Ok(match outcome {
        AiOutcome::Completed(generated_activity) => Json(GeneratedActivityDto {
            message: "Activity generated successfully".to_string(),
            generated_activity,
        })
        .into_response(),
        AiOutcome::Unavailable(fallback) => {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(fallback)).into_response()
        }
    })
}

#[utoipa::path(
    post,
    path = "/api/activities/{activity_id}/ai-refine",
    tag = ACTIVITY_TAG,
    params(
        ("activity_id" = i32, Path, description = "Activity ID")
    ),
    request_body = RefineActivityDto,
    responses(
        (status = 200, description = "Activity refined", body = RefinedActivityDto),
        (status = 400, description = "Missing refinement prompt", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller did not create the activity", body = ErrorDto),
        (status = 404, description = "Activity not found", body = ErrorDto),
        (status = 500, description = "AI service unavailable", body = ErrorDto)
    ),
)]
pub async fn refine_activity(
    State(state): State<AppState>,
    session: Session,
    PathParam(activity_id): PathParam<i32>,
    JsonBody(payload): JsonBody<RefineActivityDto>,
) -> Result<Response, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let refinement = ActivityService::new(&state.db)
        .refine(&teacher, activity_id, payload.refinement_prompt, &state.ai)
        .await?;

    Ok(match refinement {
        Refinement::Refined { content, activity } => Json(RefinedActivityDto {
            message: "Activity refined successfully".to_string(),
            refined_activity: content,
            activity: activity.into_dto(),
        })
        .into_response(),
        Refinement::Unavailable(fallback) => {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(fallback)).into_response()
        }
    })
}
