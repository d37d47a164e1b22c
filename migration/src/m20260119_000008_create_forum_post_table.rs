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
                    .table(ForumPost::Table)
                    .if_not_exists()
                    .col(pk_auto(ForumPost::Id))
                    .col(integer(ForumPost::CourseId))
                    .col(integer(ForumPost::UserId))
                    .col(string_len(ForumPost::Title, 200))
                    .col(text(ForumPost::Content))
                    .col(boolean(ForumPost::IsPinned).default(false))
                    .col(integer(ForumPost::ReplyCount).default(0))
                    .col(
                        timestamp_with_time_zone(ForumPost::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(ForumPost::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forum_post_course_id")
                            .from(ForumPost::Table, ForumPost::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forum_post_user_id")
                            .from(ForumPost::Table, ForumPost::UserId)
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
            .drop_table(Table::drop().table(ForumPost::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ForumPost {
    Table,
    Id,
    CourseId,
    UserId,
    Title,
    Content,
    IsPinned,
    ReplyCount,
    CreatedAt,
    UpdatedAt,
}
