//! Document metadata factory. Does not touch object storage.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating document rows for a course.
pub struct DocumentFactory<'a> {
    db: &'a DatabaseConnection,
    course_id: i32,
    uploader_id: i32,
    filename: String,
    file_type: String,
    file_size: i64,
    title: Option<String>,
    is_active: bool,
}

impl<'a> DocumentFactory<'a> {
    /// Creates a new DocumentFactory for a `notes{id}.txt` file of 1 KiB.
    pub fn new(db: &'a DatabaseConnection, course_id: i32, uploader_id: i32) -> Self {
        let id = next_id();
        Self {
            db,
            course_id,
            uploader_id,
            filename: format!("notes{}.txt", id),
            file_type: "txt".to_string(),
            file_size: 1024,
            title: None,
            is_active: true,
        }
    }

    /// Sets the original filename; the file type follows its extension.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        if let Some((_, ext)) = self.filename.rsplit_once('.') {
            self.file_type = ext.to_lowercase();
        }
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn file_size(mut self, file_size: i64) -> Self {
        self.file_size = file_size;
        self
    }

    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Builds and inserts the document entity into the database.
    pub async fn build(self) -> Result<entity::document::Model, DbErr> {
        let now = Utc::now();
        let stored_filename = format!("{:032x}.{}", next_id(), self.file_type);
        entity::document::ActiveModel {
            course_id: ActiveValue::Set(self.course_id),
            uploader_id: ActiveValue::Set(self.uploader_id),
            filename: ActiveValue::Set(self.filename),
            file_path: ActiveValue::Set(format!("{}/{}", self.course_id, stored_filename)),
            stored_filename: ActiveValue::Set(stored_filename),
            file_size: ActiveValue::Set(self.file_size),
            file_type: ActiveValue::Set(self.file_type),
            title: ActiveValue::Set(self.title),
            description: ActiveValue::Set(None),
            is_active: ActiveValue::Set(self.is_active),
            download_count: ActiveValue::Set(0),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an active text document in the course.
pub async fn create_document(
    db: &DatabaseConnection,
    course_id: i32,
    uploader_id: i32,
) -> Result<entity::document::Model, DbErr> {
    DocumentFactory::new(db, course_id, uploader_id).build().await
}
