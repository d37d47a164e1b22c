use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260105_000001_create_user_table::User,
    m20260119_000008_create_forum_post_table::ForumPost,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ForumReply::Table)
                    .if_not_exists()
                    .col(pk_auto(ForumReply::Id))
                    .col(integer(ForumReply::PostId))
                    .col(integer(ForumReply::UserId))
                    .col(text(ForumReply::Content))
                    .col(integer_null(ForumReply::ParentReplyId))
                    .col(
                        timestamp_with_time_zone(ForumReply::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(ForumReply::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forum_reply_post_id")
                            .from(ForumReply::Table, ForumReply::PostId)
                            .to(ForumPost::Table, ForumPost::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forum_reply_user_id")
                            .from(ForumReply::Table, ForumReply::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forum_reply_parent_reply_id")
                            .from(ForumReply::Table, ForumReply::ParentReplyId)
                            .to(ForumReply::Table, ForumReply::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ForumReply::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ForumReply {
    Table,
    Id,
    PostId,
    UserId,
    Content,
    ParentReplyId,
    CreatedAt,
    UpdatedAt,
}
