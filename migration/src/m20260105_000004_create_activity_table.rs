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
                    .table(Activity::Table)
                    .if_not_exists()
                    .col(pk_auto(Activity::Id))
                    .col(string_len(Activity::Title, 200))
                    .col(text_null(Activity::Description))
                    .col(string_len(Activity::ActivityType, 50))
                    .col(integer(Activity::CourseId))
                    .col(integer(Activity::CreatorId))
                    .col(json_null(Activity::Config))
                    .col(boolean(Activity::IsAiGenerated).default(false))
                    .col(text_null(Activity::AiPrompt))
                    .col(boolean(Activity::AiRefined).default(false))
                    .col(string_len(Activity::Status, 20).default("draft"))
                    .col(timestamp_with_time_zone_null(Activity::StartTime))
                    .col(timestamp_with_time_zone_null(Activity::EndTime))
                    .col(integer(Activity::DurationMinutes).default(10))
                    .col(
                        timestamp_with_time_zone(Activity::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Activity::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_course_id")
                            .from(Activity::Table, Activity::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_creator_id")
                            .from(Activity::Table, Activity::CreatorId)
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
            .drop_table(Table::drop().table(Activity::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Activity {
    Table,
    Id,
    Title,
    Description,
    ActivityType,
    CourseId,
    CreatorId,
    Config,
    IsAiGenerated,
    AiPrompt,
    AiRefined,
    Status,
    StartTime,
    EndTime,
    DurationMinutes,
    CreatedAt,
    UpdatedAt,
}
