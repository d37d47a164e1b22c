use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{
    activity::ActivityDto, course::CourseDto, response::ResponseDto, user::UserDto,
};

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct TeacherStatsDto {
    pub total_courses: u64,
    pub total_activities: u64,
    pub active_activities: u64,
    pub completed_activities: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CourseParticipationDto {
    pub course_id: i32,
    pub course_code: String,
    pub course_name: String,
    pub total_students: u64,
    pub total_responses: u64,
    /// Responses per enrolled student, capped at 1.0.
    pub participation_rate: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct TeacherDashboardDto {
    pub stats: TeacherStatsDto,
    pub recent_activities: Vec<ActivityDto>,
    pub course_participation: Vec<CourseParticipationDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct StudentStatsDto {
    pub total_courses: u64,
    pub total_participations: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct StudentDashboardDto {
    pub stats: StudentStatsDto,
    pub recent_responses: Vec<ResponseDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct AdminDashboardStatsDto {
    pub total_users: u64,
    pub total_courses: u64,
    pub total_activities: u64,
    pub total_responses: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct AdminDashboardDto {
    pub stats: AdminDashboardStatsDto,
    pub role_stats: BTreeMap<String, u64>,
    pub recent_users: Vec<UserDto>,
}

/// Dashboard payload; the shape depends on the caller's role.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(untagged)]
pub enum DashboardDto {
    Teacher(TeacherDashboardDto),
    Student(StudentDashboardDto),
    Admin(AdminDashboardDto),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct LeaderboardEntryDto {
    pub rank: u32,
    pub student_id: i32,
    pub student_name: String,
    pub student_number: Option<String>,
    pub participation_count: u64,
    pub avg_score: f64,
    pub total_score: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct LeaderboardDto {
    pub course_id: i32,
    pub leaderboard: Vec<LeaderboardEntryDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ActivityAnalyticsDto {
    pub activity: ActivityDto,
    pub total_responses: u64,
    pub avg_score: f64,
    pub avg_time: f64,
    /// Submission count keyed by hour of day (UTC).
    pub time_distribution: BTreeMap<u32, u64>,
    /// Response count keyed by score bucket such as `"80-89"`.
    pub score_distribution: BTreeMap<String, u64>,
    pub responses: Vec<ResponseDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct AnalyticsSnapshotDto {
    pub id: i32,
    pub activity_id: i32,
    #[schema(value_type = Object)]
    pub analytics_data: serde_json::Value,
    #[schema(value_type = Option<Object>)]
    pub ai_report: Option<serde_json::Value>,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct AnalyticsHistoryDto {
    pub activity_id: i32,
    pub snapshots: Vec<AnalyticsSnapshotDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ActivityStatDto {
    pub activity_id: i32,
    pub title: String,
    pub activity_type: entity::activity::ActivityType,
    pub status: entity::activity::ActivityStatus,
    pub response_count: u64,
    pub participation_rate: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct StudentParticipationDto {
    pub student_id: i32,
    pub student_name: String,
    pub student_number: Option<String>,
    pub participation_count: u64,
    pub participation_rate: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct CourseAnalyticsDto {
    pub course: CourseDto,
    pub total_students: u64,
    pub total_activities: u64,
    pub activity_stats: Vec<ActivityStatDto>,
    pub student_participation: Vec<StudentParticipationDto>,
}
