use sea_orm_migration::{prelude::*, schema::*};

use super::m20260105_000004_create_activity_table::Activity;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ActivityAnalytics::Table)
                    .if_not_exists()
                    .col(pk_auto(ActivityAnalytics::Id))
                    .col(integer(ActivityAnalytics::ActivityId))
                    .col(json(ActivityAnalytics::AnalyticsData))
                    .col(json_null(ActivityAnalytics::AiReport))
                    .col(
                        timestamp_with_time_zone(ActivityAnalytics::AnalyzedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_analytics_activity_id")
                            .from(ActivityAnalytics::Table, ActivityAnalytics::ActivityId)
                            .to(Activity::Table, Activity::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityAnalytics::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ActivityAnalytics {
    Table,
    Id,
    ActivityId,
    AnalyticsData,
    AiReport,
    AnalyzedAt,
}
