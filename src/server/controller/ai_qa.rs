use axum::{extract::State, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        ai::{AskQuestionDto, CourseAnswerDto, GeneralAnswerDto},
        api::ErrorDto,
    },
    server::{
        controller::extract::{JsonBody, PathParam},
        error::AppError, middleware::auth::AuthGuard, service::ai_qa::AiQaService,
        state::AppState,
    },
};

/// Tag for grouping AI assistant endpoints in OpenAPI documentation
pub static AI_QA_TAG: &str = "ai-qa";

/// Ask the assistant about one course.
///
/// The course description, its active documents and its activities are sent along as
/// context. When the AI service fails the answer is an apology rather than an error.
///
/// # Access Control
/// - `Teacher` - Must own the course
/// - `Student` - Must be enrolled
///
/// # Returns
/// - `200 OK` - Answer
/// - `400 Bad Request` - Missing question
/// - `403 Forbidden` - Caller cannot view the course
/// - `404 Not Found` - Course not found
#[utoipa::path(
    post,
    path = "/api/ai-qa/course/{course_id}/ask",
    tag = AI_QA_TAG,
    params(
        ("course_id" = i32, Path, description = "Course ID")
    ),
    request_body = AskQuestionDto,
    responses(
        (status = 200, description = "Answer", body = CourseAnswerDto),
        (status = 400, description = "Missing question", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot view the course", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn ask_course_question(
    State(state): State<AppState>,
    session: Session,
    PathParam(course_id): PathParam<i32>,
    JsonBody(payload): JsonBody<AskQuestionDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let answer = AiQaService::new(&state.db, &state.ai)
        .ask_course(&user, course_id, payload.question, state.storage.as_ref())
        .await?;

    Ok(Json(answer))
}

/// Ask the general platform assistant.
#[utoipa::path(
    post,
    path = "/api/ai-qa/general/ask",
    tag = AI_QA_TAG,
    request_body = AskQuestionDto,
    responses(
        (status = 200, description = "Answer", body = GeneralAnswerDto),
        (status = 400, description = "Missing question", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn ask_general_question(
    State(state): State<AppState>,
    session: Session,
    JsonBody(payload): JsonBody<AskQuestionDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let answer = AiQaService::new(&state.db, &state.ai)
        .ask_general(&user, payload.question)
        .await?;

    Ok(Json(answer))
}
