use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260105_000001_create_user_table::User, m20260105_000004_create_activity_table::Activity,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ActivityResponse::Table)
                    .if_not_exists()
                    .col(pk_auto(ActivityResponse::Id))
                    .col(integer(ActivityResponse::ActivityId))
                    .col(integer(ActivityResponse::StudentId))
                    .col(json(ActivityResponse::ResponseData))
                    .col(json_null(ActivityResponse::AiAnalysis))
                    .col(double_null(ActivityResponse::SimilarityScore))
                    .col(double_null(ActivityResponse::Score))
                    .col(text_null(ActivityResponse::Feedback))
                    .col(
                        timestamp_with_time_zone(ActivityResponse::SubmittedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(integer_null(ActivityResponse::TimeSpentSeconds))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_response_activity_id")
                            .from(ActivityResponse::Table, ActivityResponse::ActivityId)
                            .to(Activity::Table, Activity::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_response_student_id")
                            .from(ActivityResponse::Table, ActivityResponse::StudentId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One submission per student per activity
        manager
            .create_index(
                Index::create()
                    .name("idx_activity_response_activity_student")
                    .table(ActivityResponse::Table)
                    .col(ActivityResponse::ActivityId)
                    .col(ActivityResponse::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityResponse::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ActivityResponse {
    Table,
    Id,
    ActivityId,
    StudentId,
    ResponseData,
    AiAnalysis,
    SimilarityScore,
    Score,
    Feedback,
    SubmittedAt,
    TimeSpentSeconds,
}
