//! Stored AI analysis snapshots.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder,
};

use crate::server::model::analytics::AnalyticsSnapshot;

/// Repository for `activity_analytics` rows.
pub struct AnalyticsRepository<'a, C: ConnectionTrait = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AnalyticsRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Stores a snapshot taken now.
    ///
    /// # Arguments
    /// - `activity_id` - Analyzed activity
    /// - `analytics_data` - Response statistics at the time of analysis
    /// - `ai_report` - Parsed AI analysis
    ///
    /// # Returns
    /// - `Ok(AnalyticsSnapshot)` - The stored snapshot
    /// - `Err(DbErr)` - Database error during insert
    pub async fn create(
        &self,
        activity_id: i32,
        analytics_data: serde_json::Value,
        ai_report: Option<serde_json::Value>,
    ) -> Result<AnalyticsSnapshot, DbErr> {
        let entity = entity::activity_analytics::ActiveModel {
            activity_id: ActiveValue::Set(activity_id),
            analytics_data: ActiveValue::Set(analytics_data),
            ai_report: ActiveValue::Set(ai_report),
            analyzed_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(AnalyticsSnapshot::from_entity(entity))
    }

    /// Snapshots of an activity, newest first.
    pub async fn get_by_activity(&self, activity_id: i32) -> Result<Vec<AnalyticsSnapshot>, DbErr> {
        let entities = entity::prelude::ActivityAnalytics::find()
            .filter(entity::activity_analytics::Column::ActivityId.eq(activity_id))
            .order_by_desc(entity::activity_analytics::Column::AnalyzedAt)
            .order_by_desc(entity::activity_analytics::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(AnalyticsSnapshot::from_entity).collect())
    }
}
