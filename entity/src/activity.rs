use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of interactive task a teacher can run in class.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    #[sea_orm(string_value = "poll")]
    Poll,
    #[sea_orm(string_value = "quiz")]
    Quiz,
    #[sea_orm(string_value = "word_cloud")]
    WordCloud,
    #[sea_orm(string_value = "short_answer")]
    ShortAnswer,
    #[sea_orm(string_value = "mini_game")]
    MiniGame,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poll => "poll",
            Self::Quiz => "quiz",
            Self::WordCloud => "word_cloud",
            Self::ShortAnswer => "short_answer",
            Self::MiniGame => "mini_game",
        }
    }
}

impl std::str::FromStr for ActivityType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "poll" => Ok(Self::Poll),
            "quiz" => Ok(Self::Quiz),
            "word_cloud" => Ok(Self::WordCloud),
            "short_answer" => Ok(Self::ShortAnswer),
            "mini_game" => Ok(Self::MiniGame),
            other => Err(format!("Invalid activity type: {}", other)),
        }
    }
}

/// Lifecycle of an activity. Only `Active` activities accept responses.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "archived")]
    Archived,
}

impl std::str::FromStr for ActivityStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            other => Err(format!("Invalid activity status: {}", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "activity")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub activity_type: ActivityType,
    pub course_id: i32,
    pub creator_id: i32,
    pub config: Option<Json>,
    pub is_ai_generated: bool,
    pub ai_prompt: Option<String>,
    pub ai_refined: bool,
    pub status: ActivityStatus,
    pub start_time: Option<DateTimeUtc>,
    pub end_time: Option<DateTimeUtc>,
    pub duration_minutes: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_delete = "Cascade"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatorId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Creator,
    #[sea_orm(has_many = "super::activity_response::Entity")]
    ActivityResponse,
    #[sea_orm(has_many = "super::activity_analytics::Entity")]
    ActivityAnalytics,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::activity_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityResponse.def()
    }
}

impl Related<super::activity_analytics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityAnalytics.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
