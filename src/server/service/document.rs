//! Course document uploads, listings and downloads backed by object storage.

use rand::Rng;
use sea_orm::DatabaseConnection;

use crate::{
    model::document::UpdateDocumentDto,
    server::{
        data::{document::DocumentRepository, enrollment::EnrollmentRepository},
        error::AppError,
        model::{
            course::Course,
            document::{
                CreateDocumentParams, Document, UpdateDocumentParams, ALLOWED_EXTENSIONS,
                MAX_FILE_SIZE,
            },
            user::User,
        },
        service::{
            access::{denied, ensure_course_owner, load_course},
            storage::{ObjectStorage, SIGNED_URL_TTL_SECS},
        },
        util::filename::{file_extension, secure_filename},
    },
};
use entity::user::Role;

/// A file received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

pub struct DocumentService<'a> {
    db: &'a DatabaseConnection,
    storage: &'a dyn ObjectStorage,
}

impl<'a> DocumentService<'a> {
    pub fn new(db: &'a DatabaseConnection, storage: &'a dyn ObjectStorage) -> Self {
        Self { db, storage }
    }

    /// Documents of a course. The owning teacher sees all of them, enrolled students only
    /// the active ones. Admins are not course members and are refused.
    pub async fn list(&self, user: &User, course_id: i32) -> Result<Vec<Document>, AppError> {
        let course = load_course(self.db, course_id).await?;

        let active_only = match user.role {
            Role::Teacher => {
                ensure_course_owner(user, &course)?;
                false
            }
            Role::Student => {
                self.ensure_enrolled(user, &course).await?;
                true
            }
            Role::Admin => return Err(denied(user, "admins cannot browse course documents")),
        };

        let repo = DocumentRepository::new(self.db);
        let documents = repo.get_by_course(course.id, active_only).await?;

        Ok(repo.with_details(documents).await?)
    }

    /// Stores an uploaded file as `{course_id}/{random hex}.{ext}` and records it.
    ///
    /// # Arguments
    /// - `teacher` - Uploader, must own the course
    /// - `course_id` - Target course
    /// - `file` - File name, content type and bytes
    /// - `title` - Optional display title
    /// - `description` - Optional description
    ///
    /// # Returns
    /// - `Ok(Document)` - Recorded document
    /// - `Err(AppError::BadRequest)` - Empty name, unsupported type or too large
    /// - `Err(AppError::StorageErr)` - Upload to the bucket failed
    pub async fn upload(
        &self,
        teacher: &User,
        course_id: i32,
        file: UploadedFile,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Document, AppError> {
        let course = load_course(self.db, course_id).await?;
        ensure_course_owner(teacher, &course)?;

        if file.filename.trim().is_empty() {
            return Err(AppError::bad_request("No file selected"));
        }

        let extension = file_extension(&file.filename)
            .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| {
                AppError::bad_request(format!(
                    "Unsupported file type. Allowed types: {}",
                    ALLOWED_EXTENSIONS.join(", ")
                ))
            })?;

        if file.bytes.len() > MAX_FILE_SIZE {
            return Err(AppError::bad_request(format!(
                "File exceeds the size limit ({} MB)",
                MAX_FILE_SIZE / (1024 * 1024)
            )));
        }

        let stored_filename = format!("{}.{}", random_hex(), extension);
        let file_path = format!("{}/{}", course.id, stored_filename);
        let file_size = file.bytes.len() as i64;
        let content_type = file
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string());

        self.storage
            .upload(&file_path, file.bytes, &content_type)
            .await?;

        let filename = match secure_filename(&file.filename) {
            name if name.is_empty() => stored_filename.clone(),
            name => name,
        };

        let created = DocumentRepository::new(self.db)
            .create(CreateDocumentParams {
                course_id: course.id,
                uploader_id: teacher.id,
                filename,
                stored_filename,
                file_path: file_path.clone(),
                file_size,
                file_type: extension,
                title: title.filter(|t| !t.trim().is_empty()),
                description: description.filter(|d| !d.trim().is_empty()),
            })
            .await;

        let document = match created {
            Ok(document) => document,
            Err(err) => {
                if let Err(cleanup) = self.storage.remove(&[file_path]).await {
                    tracing::warn!("Failed to remove orphaned upload: {}", cleanup);
                }
                return Err(err.into());
            }
        };

        tracing::info!(
            "Teacher {} uploaded document {} to course {}",
            teacher.id,
            document.id,
            course.id
        );

        self.detailed(document).await
    }

    pub async fn get(&self, user: &User, document_id: i32) -> Result<Document, AppError> {
        let document = self.load(document_id).await?;
        self.ensure_reader(user, &document).await?;

        self.detailed(document).await
    }

    /// Counts a download and returns a signed URL valid for one hour.
    ///
    /// # Returns
    /// - `Ok(String)` - Signed URL to redirect to
    /// - `Err(AppError::NotFound)` - Unknown document or object missing from the bucket
    pub async fn download_url(&self, user: &User, document_id: i32) -> Result<String, AppError> {
        let document = self.load(document_id).await?;
        self.ensure_reader(user, &document).await?;

        if !self.storage.exists(&document.file_path).await? {
            return Err(AppError::not_found("File not found in storage"));
        }

        DocumentRepository::new(self.db)
            .increment_download_count(document.id)
            .await?;

        Ok(self
            .storage
            .signed_url(&document.file_path, SIGNED_URL_TTL_SECS)
            .await?)
    }

    pub async fn update(
        &self,
        teacher: &User,
        document_id: i32,
        payload: UpdateDocumentDto,
    ) -> Result<Document, AppError> {
        let document = self.load(document_id).await?;
        let course = load_course(self.db, document.course_id).await?;
        ensure_course_owner(teacher, &course)?;

        let document = DocumentRepository::new(self.db)
            .update(UpdateDocumentParams {
                id: document.id,
                title: payload.title,
                description: payload.description,
                is_active: payload.is_active,
            })
            .await?
            .ok_or_else(|| AppError::not_found("Document not found"))?;

        self.detailed(document).await
    }

    /// Deletes the row; removing the stored object is best effort.
    pub async fn delete(&self, teacher: &User, document_id: i32) -> Result<(), AppError> {
        let document = self.load(document_id).await?;
        let course = load_course(self.db, document.course_id).await?;
        ensure_course_owner(teacher, &course)?;

        if let Err(err) = self.storage.remove(&[document.file_path.clone()]).await {
            tracing::warn!("Failed to remove {} from storage: {}", document.file_path, err);
        }

        DocumentRepository::new(self.db).delete(document.id).await?;

        Ok(())
    }

    async fn load(&self, document_id: i32) -> Result<Document, AppError> {
        DocumentRepository::new(self.db)
            .find_by_id(document_id)
            .await?
            .ok_or_else(|| AppError::not_found("Document not found"))
    }

    async fn ensure_reader(&self, user: &User, document: &Document) -> Result<(), AppError> {
        let course = load_course(self.db, document.course_id).await?;

        match user.role {
            Role::Teacher => ensure_course_owner(user, &course),
            Role::Student => {
                if !document.is_active {
                    return Err(denied(user, "document is no longer available"));
                }
                self.ensure_enrolled(user, &course).await
            }
            Role::Admin => Err(denied(user, "admins cannot read course documents")),
        }
    }

    async fn ensure_enrolled(&self, user: &User, course: &Course) -> Result<(), AppError> {
        if EnrollmentRepository::new(self.db)
            .is_enrolled(course.id, user.id)
            .await?
        {
            Ok(())
        } else {
            Err(denied(user, format!("not enrolled in course {}", course.id)))
        }
    }

    async fn detailed(&self, document: Document) -> Result<Document, AppError> {
        DocumentRepository::new(self.db)
            .with_details(vec![document])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found("Document not found"))
    }
}

/// Text used as AI context for a document.
///
/// Plain text files are read from storage; other formats are summarised by title and
/// description. A text file that cannot be read yields `None`.
pub async fn document_text(storage: &dyn ObjectStorage, document: &Document) -> Option<String> {
    if document.file_type.eq_ignore_ascii_case("txt") {
        return match storage.download(&document.file_path).await {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(err) => {
                tracing::warn!("Failed to read document {}: {}", document.id, err);
                None
            }
        };
    }

    Some(format!(
        "Document: {}\nDescription: {}",
        document.display_title(),
        document.description.as_deref().unwrap_or("No description")
    ))
}

/// 32 lowercase hex characters from a random 128-bit value.
fn random_hex() -> String {
    let mut rng = rand::rng();
    let value: u128 = rng.random();

    format!("{:032x}", value)
}
