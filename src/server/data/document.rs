//! Document metadata repository.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DbErr, EntityTrait, ExprTrait, IntoActiveModel, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::document::{CreateDocumentParams, Document, UpdateDocumentParams};

/// Repository providing database operations for course documents.
pub struct DocumentRepository<'a, C: ConnectionTrait = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DocumentRepository<'a, C> {
    /// Creates a new DocumentRepository instance.
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Records an uploaded document as active with zero downloads.
    ///
    /// # Arguments
    /// - `params` - Metadata of the stored object
    ///
    /// # Returns
    /// - `Ok(Document)` - The stored document without derived fields
    /// - `Err(DbErr)` - Database error during insert
    pub async fn create(&self, params: CreateDocumentParams) -> Result<Document, DbErr> {
        let now = Utc::now();

        let entity = entity::document::ActiveModel {
            course_id: ActiveValue::Set(params.course_id),
            uploader_id: ActiveValue::Set(params.uploader_id),
            filename: ActiveValue::Set(params.filename),
            stored_filename: ActiveValue::Set(params.stored_filename),
            file_path: ActiveValue::Set(params.file_path),
            file_size: ActiveValue::Set(params.file_size),
            file_type: ActiveValue::Set(params.file_type),
            title: ActiveValue::Set(params.title),
            description: ActiveValue::Set(params.description),
            is_active: ActiveValue::Set(true),
            download_count: ActiveValue::Set(0),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(Document::from_entity(entity))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Document>, DbErr> {
        let entity = entity::prelude::Document::find_by_id(id)
            .one(self.db)
            .await?;

        Ok(entity.map(Document::from_entity))
    }

    /// Documents of a course, newest first.
    ///
    /// # Arguments
    /// - `course_id` - Course to list
    /// - `active_only` - Hide deactivated documents
    ///
    /// # Returns
    /// - `Ok(Vec<Document>)` - Matching documents
    /// - `Err(DbErr)` - Database error during query
    pub async fn get_by_course(
        &self,
        course_id: i32,
        active_only: bool,
    ) -> Result<Vec<Document>, DbErr> {
        let mut query = entity::prelude::Document::find()
            .filter(entity::document::Column::CourseId.eq(course_id));
        if active_only {
            query = query.filter(entity::document::Column::IsActive.eq(true));
        }

        let entities = query
            .order_by_desc(entity::document::Column::CreatedAt)
            .order_by_desc(entity::document::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Document::from_entity).collect())
    }

    /// Active documents of a course restricted to the given IDs, in ID order.
    pub async fn get_active_by_ids(
        &self,
        course_id: i32,
        ids: &[i32],
    ) -> Result<Vec<Document>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let entities = entity::prelude::Document::find()
            .filter(entity::document::Column::CourseId.eq(course_id))
            .filter(entity::document::Column::IsActive.eq(true))
            .filter(entity::document::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(entity::document::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Document::from_entity).collect())
    }

    /// Object keys of every document in a course.
    pub async fn get_file_paths_by_course(&self, course_id: i32) -> Result<Vec<String>, DbErr> {
        entity::prelude::Document::find()
            .select_only()
            .column(entity::document::Column::FilePath)
            .filter(entity::document::Column::CourseId.eq(course_id))
            .into_tuple()
            .all(self.db)
            .await
    }

    /// Object keys of the documents that go away with a user: those they uploaded and
    /// those in courses they teach.
    pub async fn get_file_paths_by_owner(&self, user_id: i32) -> Result<Vec<String>, DbErr> {
        entity::prelude::Document::find()
            .select_only()
            .column(entity::document::Column::FilePath)
            .inner_join(entity::prelude::Course)
            .filter(
                Condition::any()
                    .add(entity::document::Column::UploaderId.eq(user_id))
                    .add(entity::course::Column::TeacherId.eq(user_id)),
            )
            .into_tuple()
            .all(self.db)
            .await
    }

    /// Applies a partial update and bumps `updated_at`.
    ///
    /// # Returns
    /// - `Ok(Some(Document))` - Updated document
    /// - `Ok(None)` - No document with that ID
    /// - `Err(DbErr)` - Database error during update
    pub async fn update(&self, params: UpdateDocumentParams) -> Result<Option<Document>, DbErr> {
        let Some(entity) = entity::prelude::Document::find_by_id(params.id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active = entity.into_active_model();

        if let Some(title) = params.title {
            active.title = ActiveValue::Set(Some(title));
        }
        if let Some(description) = params.description {
            active.description = ActiveValue::Set(Some(description));
        }
        if let Some(is_active) = params.is_active {
            active.is_active = ActiveValue::Set(is_active);
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let entity = active.update(self.db).await?;

        Ok(Some(Document::from_entity(entity)))
    }

    /// Adds one to the download counter.
    pub async fn increment_download_count(&self, id: i32) -> Result<(), DbErr> {
        entity::prelude::Document::update_many()
            .filter(entity::document::Column::Id.eq(id))
            .col_expr(
                entity::document::Column::DownloadCount,
                sea_orm::sea_query::Expr::col(entity::document::Column::DownloadCount).add(1),
            )
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Deletes the metadata row.
    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Document::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Fills course and uploader names for a batch of documents.
    pub async fn with_details(&self, mut documents: Vec<Document>) -> Result<Vec<Document>, DbErr> {
        if documents.is_empty() {
            return Ok(documents);
        }

        let course_ids: Vec<i32> = documents.iter().map(|d| d.course_id).collect();
        let uploader_ids: Vec<i32> = documents.iter().map(|d| d.uploader_id).collect();

        let courses: HashMap<i32, String> = entity::prelude::Course::find()
            .select_only()
            .columns([entity::course::Column::Id, entity::course::Column::CourseName])
            .filter(entity::course::Column::Id.is_in(course_ids))
            .into_tuple::<(i32, String)>()
            .all(self.db)
            .await?
            .into_iter()
            .collect();

        let uploaders: HashMap<i32, String> = entity::prelude::User::find()
            .select_only()
            .columns([entity::user::Column::Id, entity::user::Column::FullName])
            .filter(entity::user::Column::Id.is_in(uploader_ids))
            .into_tuple::<(i32, String)>()
            .all(self.db)
            .await?
            .into_iter()
            .collect();

        for document in documents.iter_mut() {
            document.course_name = courses.get(&document.course_id).cloned();
            document.uploader_name = uploaders.get(&document.uploader_id).cloned();
        }

        Ok(documents)
    }
}
