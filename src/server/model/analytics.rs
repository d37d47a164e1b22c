//! Analytics snapshot domain model.

use chrono::{DateTime, Utc};

use crate::model::analytics::AnalyticsSnapshotDto;

/// Result of one AI analysis run over an activity's responses.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsSnapshot {
    pub id: i32,
    pub activity_id: i32,
    pub analytics_data: serde_json::Value,
    pub ai_report: Option<serde_json::Value>,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalyticsSnapshot {
    pub fn from_entity(entity: entity::activity_analytics::Model) -> Self {
        Self {
            id: entity.id,
            activity_id: entity.activity_id,
            analytics_data: entity.analytics_data,
            ai_report: entity.ai_report,
            analyzed_at: entity.analyzed_at,
        }
    }

    pub fn into_dto(self) -> AnalyticsSnapshotDto {
        AnalyticsSnapshotDto {
            id: self.id,
            activity_id: self.activity_id,
            analytics_data: self.analytics_data,
            ai_report: self.ai_report,
            analyzed_at: self.analyzed_at,
        }
    }
}
