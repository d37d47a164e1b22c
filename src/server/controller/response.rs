use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        ai::{AiFeedbackDto, AiFeedbackRequestDto, AnalysisDto, ResponseGroupsDto},
        api::ErrorDto,
        response::{
            FeedbackDto, ResponseDetailDto, ResponseListDto, ResponseSavedDto, SubmitResponseDto,
        },
    },
    server::{
        controller::extract::{JsonBody, PathParam},
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::{ai::AiOutcome, response::ResponseService},
        state::AppState,
    },
};

/// Tag for grouping response endpoints in OpenAPI documentation
pub static RESPONSE_TAG: &str = "response";

/// Submit the calling student's answer to an active activity.
///
/// # Access Control
/// - `Student` - Must be enrolled in the activity's course
///
/// # Arguments
/// - `payload` - Activity ID, free-form response data and time spent
///
/// # Returns
/// - `201 Created` - Response stored
/// - `400 Bad Request` - Missing fields, activity not active, or already answered
/// - `403 Forbidden` - Caller is not an enrolled student
/// - `404 Not Found` - Activity not found
#[utoipa::path(
    post,
    path = "/api/responses",
    tag = RESPONSE_TAG,
    request_body = SubmitResponseDto,
    responses(
        (status = 201, description = "Response submitted", body = ResponseSavedDto),
        (status = 400, description = "Invalid submission", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot answer this activity", body = ErrorDto),
        (status = 404, description = "Activity not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn submit_response(
    State(state): State<AppState>,
    session: Session,
    JsonBody(payload): JsonBody<SubmitResponseDto>,
) -> Result<impl IntoResponse, AppError> {
    let student = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Student])
        .await?;

    let response = ResponseService::new(&state.db).submit(&student, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ResponseSavedDto {
            message: "Response submitted successfully".to_string(),
            response: response.into_dto(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/responses/{response_id}",
    tag = RESPONSE_TAG,
    params(
        ("response_id" = i32, Path, description = "Response ID")
    ),
    responses(
        (status = 200, description = "Response details", body = ResponseDetailDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot view the response", body = ErrorDto),
        (status = 404, description = "Response not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_response(
    State(state): State<AppState>,
    session: Session,
    PathParam(response_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let response = ResponseService::new(&state.db).get(&user, response_id).await?;

    Ok(Json(ResponseDetailDto {
        response: response.into_dto(),
    }))
}

/// List responses of an activity.
///
/// The creating teacher sees every response; a student sees only their own.
#[utoipa::path(
    get,
    path = "/api/responses/activity/{activity_id}",
    tag = RESPONSE_TAG,
    params(
        ("activity_id" = i32, Path, description = "Activity ID")
    ),
    responses(
        (status = 200, description = "Responses", body = ResponseListDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot view the responses", body = ErrorDto),
        (status = 404, description = "Activity or own response not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_activity_responses(
    State(state): State<AppState>,
    session: Session,
    PathParam(activity_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let responses = ResponseService::new(&state.db)
        .list_for_activity(&user, activity_id)
        .await?;

    Ok(Json(ResponseListDto {
        responses: responses.into_iter().map(|r| r.into_dto()).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/responses/{response_id}/feedback",
    tag = RESPONSE_TAG,
    params(
        ("response_id" = i32, Path, description = "Response ID")
    ),
    request_body = FeedbackDto,
    responses(
        (status = 200, description = "Feedback saved", body = ResponseSavedDto),
        (status = 400, description = "Missing feedback", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller did not create the activity", body = ErrorDto),
        (status = 404, description = "Response not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn add_feedback(
    State(state): State<AppState>,
    session: Session,
    PathParam(response_id): PathParam<i32>,
    JsonBody(payload): JsonBody<FeedbackDto>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let response = ResponseService::new(&state.db)
        .add_feedback(&teacher, response_id, payload)
        .await?;

    Ok(Json(ResponseSavedDto {
        message: "Feedback added successfully".to_string(),
        response: response.into_dto(),
    }))
}

/// Analyze every response of an activity with the AI service.
///
/// A successful analysis is also stored as an analytics snapshot of the activity.
///
/// # Returns
/// - `200 OK` - Analysis JSON
/// - `400 Bad Request` - Activity has no responses
/// - `403 Forbidden` - Caller did not create the activity
/// - `500 Internal Server Error` - AI service unavailable; the body is the fallback object
#[utoipa::path(
    post,
    path = "/api/responses/ai/analyze/{activity_id}",
    tag = RESPONSE_TAG,
    params(
        ("activity_id" = i32, Path, description = "Activity ID")
    ),
    responses(
        (status = 200, description = "Analysis result", body = AnalysisDto),
        (status = 400, description = "No responses to analyze", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller did not create the activity", body = ErrorDto),
        (status = 404, description = "Activity not found", body = ErrorDto),
        (status = 500, description = "AI service unavailable", body = ErrorDto)
    ),
)]
pub async fn analyze_responses(
    State(state): State<AppState>,
    session: Session,
    PathParam(activity_id): PathParam<i32>,
) -> Result<Response, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let outcome = ResponseService::new(&state.db)
        .analyze(&teacher, activity_id, &state.ai)
        .await?;

    Ok(match outcome {
        AiOutcome::Completed(analysis) => Json(AnalysisDto {
            message: "Analysis completed".to_string(),
            analysis,
        })
        .into_response(),
        AiOutcome::Unavailable(fallback) => {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(fallback)).into_response()
        }
    })
}

/// Cluster similar answers, falling back to word overlap when the AI cannot.
#[utoipa::path(
    post,
    path = "/api/responses/ai/group-similar/{activity_id}",
    tag = RESPONSE_TAG,
    params(
        ("activity_id" = i32, Path, description = "Activity ID")
    ),
    responses(
        (status = 200, description = "Response groups", body = ResponseGroupsDto),
        (status = 400, description = "No responses to group", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller did not create the activity", body = ErrorDto),
        (status = 404, description = "Activity not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn group_similar_responses(
    State(state): State<AppState>,
    session: Session,
    PathParam(activity_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let groups = ResponseService::new(&state.db)
        .group_similar(&teacher, activity_id, &state.ai)
        .await?;
    let total_responses = groups.iter().map(|g| g.size).sum();

    Ok(Json(ResponseGroupsDto {
        groups,
        total_responses,
    }))
}

#[utoipa::path(
    post,
    path = "/api/responses/ai/feedback/{response_id}",
    tag = RESPONSE_TAG,
    params(
        ("response_id" = i32, Path, description = "Response ID")
    ),
    request_body = AiFeedbackRequestDto,
    responses(
        (status = 200, description = "Generated feedback", body = AiFeedbackDto),
        (status = 400, description = "Missing student response", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller did not create the activity", body = ErrorDto),
        (status = 404, description = "Response not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn generate_ai_feedback(
    State(state): State<AppState>,
    session: Session,
    PathParam(response_id): PathParam<i32>,
    JsonBody(payload): JsonBody<AiFeedbackRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let feedback = ResponseService::new(&state.db)
        .ai_feedback(&teacher, response_id, payload, &state.ai)
        .await?;

    Ok(Json(AiFeedbackDto { feedback }))
}
