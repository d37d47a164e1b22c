use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        course::{CourseDetailDto, CourseListDto, CourseSavedDto, CreateCourseDto, UpdateCourseDto},
        import::{ImportStudentsDto, ImportStudentsResultDto, ImportSummaryDto},
        user::StudentListDto,
    },
    server::{
        controller::{
            extract::{JsonBody, MultipartBody, PathParam},
            form::read_spreadsheet,
        },
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::{
            course::CourseService,
            import::{ImportService, STUDENT_COLUMNS},
        },
        state::AppState,
    },
};

/// Tag for grouping course endpoints in OpenAPI documentation
pub static COURSE_TAG: &str = "course";

/// List the caller's courses.
///
/// # Access Control
/// - `Teacher` - Courses they teach
/// - `Student` - Courses they are enrolled in
/// - `Admin` - Every course
///
/// # Returns
/// - `200 OK` - Courses with teacher name, student and activity counts
/// - `401 Unauthorized` - Not logged in
#[utoipa::path(
    get,
    path = "/api/courses",
    tag = COURSE_TAG,
    responses(
        (status = 200, description = "Caller's courses", body = CourseListDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_courses(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let courses = CourseService::new(&state.db).list_for_user(&user).await?;

    Ok(Json(CourseListDto {
        courses: courses.into_iter().map(|c| c.into_dto()).collect(),
    }))
}

/// List every active course a student can enroll in.
#[utoipa::path(
    get,
    path = "/api/courses/available",
    tag = COURSE_TAG,
    responses(
        (status = 200, description = "Active courses", body = CourseListDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not a student", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_available_courses(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Student])
        .await?;

    let courses = CourseService::new(&state.db).list_available().await?;

    Ok(Json(CourseListDto {
        courses: courses.into_iter().map(|c| c.into_dto()).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/courses/{course_id}",
    tag = COURSE_TAG,
    params(
        ("course_id" = i32, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course details", body = CourseDetailDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot view the course", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_course(
    State(state): State<AppState>,
    session: Session,
    PathParam(course_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let course = CourseService::new(&state.db).get(&user, course_id).await?;

    Ok(Json(CourseDetailDto {
        course: course.into_dto(),
    }))
}

/// Create a course taught by the caller.
///
/// # Access Control
/// - `Teacher` - Only teachers can create courses
///
/// # Arguments
/// - `payload` - Course code (unique), name, semester, academic year and description
///
/// # Returns
/// - `201 Created` - Course created
/// - `400 Bad Request` - Missing field or duplicate course code
/// - `401 Unauthorized` - Not logged in
/// - `403 Forbidden` - Caller is not a teacher
#[utoipa::path(
    post,
    path = "/api/courses",
    tag = COURSE_TAG,
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = CourseSavedDto),
        (status = 400, description = "Invalid course data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not a teacher", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_course(
    State(state): State<AppState>,
    session: Session,
    JsonBody(payload): JsonBody<CreateCourseDto>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let course = CourseService::new(&state.db).create(&teacher, payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(CourseSavedDto {
            message: "Course created successfully".to_string(),
            course: course.into_dto(),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/courses/{course_id}",
    tag = COURSE_TAG,
    params(
        ("course_id" = i32, Path, description = "Course ID")
    ),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = CourseSavedDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller does not own the course", body = ErrorDto),
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
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let course = CourseService::new(&state.db)
        .update(&teacher, course_id, payload)
        .await?;

    Ok(Json(CourseSavedDto {
        message: "Course updated successfully".to_string(),
        course: course.into_dto(),
    }))
}

/// Enroll the calling student in an active course.
///
/// # Returns
/// - `200 OK` - Enrolled
/// - `400 Bad Request` - Course inactive or already enrolled
/// - `404 Not Found` - Course not found
#[utoipa::path(
    post,
    path = "/api/courses/{course_id}/enroll",
    tag = COURSE_TAG,
    params(
        ("course_id" = i32, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Enrolled", body = MessageDto),
        (status = 400, description = "Course inactive or already enrolled", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not a student", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn enroll(
    State(state): State<AppState>,
    session: Session,
    PathParam(course_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let student = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Student])
        .await?;

    CourseService::new(&state.db).enroll(&student, course_id).await?;

    Ok(Json(MessageDto::new("Enrolled successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{course_id}/enroll",
    tag = COURSE_TAG,
    params(
        ("course_id" = i32, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Enrollment removed", body = MessageDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not a student", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn unenroll(
    State(state): State<AppState>,
    session: Session,
    PathParam(course_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let student = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Student])
        .await?;

    CourseService::new(&state.db).unenroll(&student, course_id).await?;

    Ok(Json(MessageDto::new("Unenrolled successfully")))
}

#[utoipa::path(
    get,
    path = "/api/courses/{course_id}/students",
    tag = COURSE_TAG,
    params(
        ("course_id" = i32, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Enrolled students", body = StudentListDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller does not own the course", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_students(
    State(state): State<AppState>,
    session: Session,
    PathParam(course_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let students = CourseService::new(&state.db)
        .students(&teacher, course_id)
        .await?;

    Ok(Json(StudentListDto {
        students: students.into_iter().map(|s| s.into_dto()).collect(),
    }))
}

/// Import a JSON roster into a course.
///
/// Students missing from the system get an account with their student ID as username.
/// Problems with single items are reported in `errors` without failing the import.
///
/// # Access Control
/// - `Teacher` - Must own the course
///
/// # Returns
/// - `200 OK` - Number of new enrollments and per-item errors
/// - `400 Bad Request` - Empty roster
/// - `403 Forbidden` - Caller does not own the course
#[utoipa::path(
    post,
    path = "/api/courses/{course_id}/import-students",
    tag = COURSE_TAG,
    params(
        ("course_id" = i32, Path, description = "Course ID")
    ),
    request_body = ImportStudentsDto,
    responses(
        (status = 200, description = "Import finished", body = ImportStudentsResultDto),
        (status = 400, description = "Missing student data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller does not own the course", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn import_students(
    State(state): State<AppState>,
    session: Session,
    PathParam(course_id): PathParam<i32>,
    JsonBody(payload): JsonBody<ImportStudentsDto>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let result = CourseService::new(&state.db)
        .import_students(
            &teacher,
            course_id,
            payload,
            &state.email_domain,
            &state.default_import_password,
        )
        .await?;

    Ok(Json(result))
}

/// Import students from an Excel sheet.
///
/// Required columns are `student_id`, `full_name` and `email`; `department` and
/// `course_code` are optional. Rows naming a course the caller teaches are enrolled in
/// it. The whole sheet is imported in one transaction.
///
/// # Returns
/// - `200 OK` - Import summary with at most 20 row errors
/// - `400 Bad Request` - Missing file, not an Excel file, or missing columns
/// - `403 Forbidden` - Caller is not a teacher
#[utoipa::path(
    post,
    path = "/api/courses/import-students-excel",
    tag = COURSE_TAG,
    request_body(
        content_type = "multipart/form-data",
        description = "Excel file in the `file` field"
    ),
    responses(
        (status = 200, description = "Import finished", body = ImportSummaryDto),
        (status = 400, description = "Invalid spreadsheet", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not a teacher", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn import_students_excel(
    State(state): State<AppState>,
    session: Session,
    MultipartBody(multipart): MultipartBody,
) -> Result<impl IntoResponse, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let rows = read_spreadsheet(multipart, STUDENT_COLUMNS).await?;

    let summary = ImportService::new(&state.db, &state.email_domain, &state.default_import_password)
        .import_students(&teacher, rows)
        .await?;

    Ok(Json(summary.into_dto("Excel import completed")))
}
