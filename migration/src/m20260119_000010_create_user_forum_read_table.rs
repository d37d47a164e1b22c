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
                    .table(UserForumRead::Table)
                    .if_not_exists()
                    .col(integer(UserForumRead::UserId))
                    .col(integer(UserForumRead::CourseId))
                    .col(
                        timestamp_with_time_zone(UserForumRead::LastReadAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(UserForumRead::UserId)
                            .col(UserForumRead::CourseId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_forum_read_user_id")
                            .from(UserForumRead::Table, UserForumRead::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_forum_read_course_id")
                            .from(UserForumRead::Table, UserForumRead::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserForumRead::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UserForumRead {
    Table,
    UserId,
    CourseId,
    LastReadAt,
}
