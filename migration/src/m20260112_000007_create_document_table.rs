use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260105_000001_create_user_table::User, m20260105_000002_create_course_table::Course,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Document::Table)
                    .if_not_exists()
                    .col(pk_auto(Document::Id))
                    .col(integer(Document::CourseId))
                    .col(integer(Document::UploaderId))
                    .col(string_len(Document::Filename, 255))
                    .col(string_len(Document::StoredFilename, 255))
                    .col(string_len(Document::FilePath, 500))
                    .col(big_integer(Document::FileSize))
                    .col(string_len(Document::FileType, 50))
                    .col(string_len_null(Document::Title, 200))
                    .col(text_null(Document::Description))
                    .col(boolean(Document::IsActive).default(true))
                    .col(integer(Document::DownloadCount).default(0))
                    .col(
                        timestamp_with_time_zone(Document::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Document::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_course_id")
                            .from(Document::Table, Document::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_uploader_id")
                            .from(Document::Table, Document::UploaderId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Document::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Document {
    Table,
    Id,
    CourseId,
    UploaderId,
    Filename,
    StoredFilename,
    FilePath,
    FileSize,
    FileType,
    Title,
    Description,
    IsActive,
    DownloadCount,
    CreatedAt,
    UpdatedAt,
}
