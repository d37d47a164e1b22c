use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        document::{DocumentDetailDto, DocumentListDto, DocumentSavedDto, UpdateDocumentDto},
    },
    server::{
        controller::{
            extract::{JsonBody, MultipartBody, PathParam},
            form::read_upload,
        },
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::document::DocumentService,
        state::AppState,
    },
};

/// Tag for grouping document endpoints in OpenAPI documentation
pub static DOCUMENT_TAG: &str = "document";

/// List the documents of a course.
///
/// # Access Control
/// - `Teacher` - Must own the course; sees inactive documents too
/// - `Student` - Must be enrolled; sees active documents only
///
/// # Returns
/// - `200 OK` - Course documents, newest first
/// - `403 Forbidden` - Caller cannot read the course documents
/// - `404 Not Found` - Course not found
#[utoipa::path(
    get,
    path = "/api/documents/course/{course_id}",
    tag = DOCUMENT_TAG,
    params(
        ("course_id" = i32, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course documents", body = DocumentListDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot read the course documents", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_course_documents(
    State(state): State<AppState>,
    session: Session,
    PathParam(course_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let documents = DocumentService::new(&state.db, state.storage.as_ref())
        .list(&user, course_id)
        .await?;

    Ok(Json(DocumentListDto {
        documents: documents.into_iter().map(|d| d.into_dto()).collect(),
    }))
}

/// Upload a document to a course.
///
/// The multipart body carries the `file` part and optional `title` and `description`
/// fields. Allowed types are pdf, doc, docx, ppt, pptx, xls, xlsx, txt, zip and rar, up
/// to 50 MiB.
///
/// # Returns
/// - `201 Created` - Document stored
/// - `400 Bad Request` - Missing file, unsupported type or file too large
/// - `403 Forbidden` - Caller does not own the course
/// - `404 Not Found` - Course not found
/// - `500 Internal Server Error` - Storage upload failed
#[utoipa::path(
    post,
    path = "/api/documents/course/{course_id}",
    tag = DOCUMENT_TAG,
    params(
        ("course_id" = i32, Path, description = "Course ID")
    ),
    request_body(
        content_type = "multipart/form-data",
        description = "`file` plus optional `title` and `description`"
    ),
    responses(
        (status = 201, description = "Document uploaded", body = DocumentSavedDto),
        (status = 400, description = "Invalid upload", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller does not own the course", body = ErrorDto),
        (status = 404, description = "Course not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn upload_document(
    State(state): State<AppState>,
    session: Session,
    PathParam(course_id): PathParam<i32>,
    MultipartBody(multipart): MultipartBody,
) -> Result<impl IntoResponse, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let mut form = read_upload(multipart).await?;
    let file = form
        .file
        .take()
        .ok_or_else(|| AppError::bad_request("No file uploaded"))?;
    let title = form.take("title");
    let description = form.take("description");

    let document = DocumentService::new(&state.db, state.storage.as_ref())
        .upload(&teacher, course_id, file, title, description)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DocumentSavedDto {
            message: "Document uploaded successfully".to_string(),
            document: document.into_dto(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/documents/{document_id}",
    tag = DOCUMENT_TAG,
    params(
        ("document_id" = i32, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document details", body = DocumentDetailDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot read the document", body = ErrorDto),
        (status = 404, description = "Document not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_document(
    State(state): State<AppState>,
    session: Session,
    PathParam(document_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let document = DocumentService::new(&state.db, state.storage.as_ref())
        .get(&user, document_id)
        .await?;

    Ok(Json(DocumentDetailDto {
        document: document.into_dto(),
    }))
}

/// Redirect to a one hour signed download URL and count the download.
#[utoipa::path(
    get,
    path = "/api/documents/{document_id}/download",
    tag = DOCUMENT_TAG,
    params(
        ("document_id" = i32, Path, description = "Document ID")
    ),
    responses(
        (status = 307, description = "Redirect to the signed download URL"),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller cannot read the document", body = ErrorDto),
        (status = 404, description = "Document or stored file not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn download_document(
    State(state): State<AppState>,
    session: Session,
    PathParam(document_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let url = DocumentService::new(&state.db, state.storage.as_ref())
        .download_url(&user, document_id)
        .await?;

    Ok(Redirect::temporary(&url))
}

#[utoipa::path(
    put,
    path = "/api/documents/{document_id}",
    tag = DOCUMENT_TAG,
    params(
        ("document_id" = i32, Path, description = "Document ID")
    ),
    request_body = UpdateDocumentDto,
    responses(
        (status = 200, description = "Document updated", body = DocumentSavedDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller does not own the course", body = ErrorDto),
        (status = 404, description = "Document not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_document(
    State(state): State<AppState>,
    session: Session,
    PathParam(document_id): PathParam<i32>,
    JsonBody(payload): JsonBody<UpdateDocumentDto>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    let document = DocumentService::new(&state.db, state.storage.as_ref())
        .update(&teacher, document_id, payload)
        .await?;

    Ok(Json(DocumentSavedDto {
        message: "Document updated successfully".to_string(),
        document: document.into_dto(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/documents/{document_id}",
    tag = DOCUMENT_TAG,
    params(
        ("document_id" = i32, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document deleted", body = MessageDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Caller does not own the course", body = ErrorDto),
        (status = 404, description = "Document not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_document(
    State(state): State<AppState>,
    session: Session,
    PathParam(document_id): PathParam<i32>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Teacher])
        .await?;

    DocumentService::new(&state.db, state.storage.as_ref())
        .delete(&teacher, document_id)
        .await?;

    Ok(Json(MessageDto::new("Document deleted successfully")))
}
