use chrono::{DateTime, Utc};
use entity::user::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub student_id: Option<String>,
    pub full_name: String,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct RegisterDto {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub student_id: Option<String>,
    pub department: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct LoginDto {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct UserSavedDto {
    pub message: String,
    pub user: UserDto,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct UserDetailDto {
    pub user: UserDto,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct UpdateProfileDto {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub student_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, ToSchema)]
pub struct ChangePasswordDto {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct StudentListDto {
    pub students: Vec<UserDto>,
}
