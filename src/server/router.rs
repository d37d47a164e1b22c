use axum::{extract::DefaultBodyLimit, Router};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    controller::{activity, admin, ai_qa, analytics, auth, course, document, forum, response},
    model::document::MAX_FILE_SIZE,
    state::AppState,
};

/// Multipart framing allowance on top of the largest accepted upload.
const BODY_LIMIT_MARGIN: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    info(title = "Smart Classroom API"),
    tags(
        (name = "auth", description = "Registration, login and profile"),
        (name = "course", description = "Courses, enrollment and roster import"),
        (name = "activity", description = "Classroom activities and AI generation"),
        (name = "response", description = "Student responses, feedback and AI analysis"),
        (name = "analytics", description = "Dashboards, leaderboards and analytics"),
        (name = "admin", description = "System administration"),
        (name = "document", description = "Course documents"),
        (name = "ai-qa", description = "AI question answering"),
        (name = "forum", description = "Course discussion forum"),
    )
)]
struct ApiDoc;

pub fn router() -> Router<AppState> {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        // Auth
        .routes(routes!(auth::register))
        .routes(routes!(auth::login))
        .routes(routes!(auth::logout))
        .routes(routes!(auth::get_profile, auth::update_profile))
        .routes(routes!(auth::change_password))
        // Courses
        .routes(routes!(course::get_courses, course::create_course))
        .routes(routes!(course::get_available_courses))
        .routes(routes!(course::get_course, course::update_course))
        .routes(routes!(course::enroll, course::unenroll))
        .routes(routes!(course::get_students))
        .routes(routes!(course::import_students))
        .routes(routes!(course::import_students_excel))
        // Activities
        .routes(routes!(activity::get_activities, activity::create_activity))
        .routes(routes!(activity::get_activity_types))
        .routes(routes!(
            activity::get_activity,
            activity::update_activity,
            activity::delete_activity
        ))
        .routes(routes!(activity::start_activity))
        .routes(routes!(activity::stop_activity))
        .routes(routes!(activity::generate_activity))
        .routes(routes!(activity::refine_activity))
        // Responses
        .routes(routes!(response::submit_response))
        .routes(routes!(response::get_response))
        .routes(routes!(response::get_activity_responses))
        .routes(routes!(response::add_feedback))
        .routes(routes!(response::analyze_responses))
        .routes(routes!(response::group_similar_responses))
        .routes(routes!(response::generate_ai_feedback))
        // Analytics
        .routes(routes!(analytics::get_dashboard))
        .routes(routes!(analytics::get_leaderboard))
        .routes(routes!(analytics::get_activity_analytics))
        .routes(routes!(analytics::get_analytics_history))
        .routes(routes!(analytics::get_course_analytics))
        // Admin
        .routes(routes!(admin::get_users, admin::create_user))
        .routes(routes!(admin::get_user, admin::update_user, admin::delete_user))
        .routes(routes!(admin::get_courses))
        .routes(routes!(
            admin::get_course,
            admin::update_course,
            admin::delete_course
        ))
        .routes(routes!(admin::get_activities))
        .routes(routes!(admin::delete_activity))
        .routes(routes!(admin::get_stats))
        .routes(routes!(admin::import_users_excel))
        // Documents
        .routes(routes!(
            document::get_course_documents,
            document::upload_document
        ))
        .routes(routes!(
            document::get_document,
            document::update_document,
            document::delete_document
        ))
        .routes(routes!(document::download_document))
        // AI question answering
        .routes(routes!(ai_qa::ask_course_question))
        .routes(routes!(ai_qa::ask_general_question))
        // Forum
        .routes(routes!(forum::get_posts, forum::create_post))
        .routes(routes!(forum::update_post, forum::delete_post))
        .routes(routes!(forum::get_replies))
        .routes(routes!(forum::create_reply))
        .routes(routes!(forum::update_reply, forum::delete_reply))
        .routes(routes!(forum::get_notifications))
        .routes(routes!(forum::mark_read))
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + BODY_LIMIT_MARGIN))
}
