use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::user::UserDto;

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct PaginatedUsersDto {
    pub users: Vec<UserDto>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct UpdateUserDto {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub student_id: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct AdminStatsDto {
    pub total_users: u64,
    pub total_teachers: u64,
    pub total_students: u64,
    pub total_courses: u64,
    pub total_activities: u64,
    pub total_responses: u64,
    /// Users who logged in within the last 7 days.
    pub active_users: u64,
    /// Activities created within the last 7 days.
    pub recent_activities: u64,
    pub ai_activities: u64,
}
