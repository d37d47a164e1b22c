//! User domain models and parameters.
//!
//! Provides the domain model for platform accounts of every role along with the
//! parameter types used for registration, profile edits and admin updates.

use chrono::{DateTime, Utc};
use entity::user::Role;

use crate::model::{admin::PaginatedUsersDto, user::UserDto};

/// Platform account.
///
/// The password hash never leaves the server; `into_dto` drops it.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub role: Role,
    /// Institutional student number, present for students.
    pub student_id: Option<String>,
    pub full_name: String,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Converts the user domain model to a DTO for API responses.
    ///
    /// # Returns
    /// - `UserDto` - The converted user DTO without the password hash
    pub fn into_dto(self) -> UserDto {
        UserDto {
            id: self.id,
            username: self.username,
            email: self.email,
            role: self.role,
            student_id: self.student_id,
            full_name: self.full_name,
            department: self.department,
            created_at: self.created_at,
            last_login: self.last_login,
        }
    }

    /// Converts an entity model to a user domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `User` - The converted user domain model
    pub fn from_entity(entity: entity::user::Model) -> Self {
        Self {
            id: entity.id,
            username: entity.username,
            email: entity.email,
            password_hash: entity.password_hash,
            role: entity.role,
            student_id: entity.student_id,
            full_name: entity.full_name,
            department: entity.department,
            created_at: entity.created_at,
            last_login: entity.last_login,
        }
    }

    pub fn is_teacher(&self) -> bool {
        self.role == Role::Teacher
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Parameters for inserting a new account.
#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub student_id: Option<String>,
    pub full_name: String,
    pub department: Option<String>,
}

/// Partial update of an account.
///
/// `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserParams {
    pub id: i32,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub student_id: Option<String>,
    pub full_name: Option<String>,
    pub department: Option<String>,
    pub password_hash: Option<String>,
}

/// Page of users for the admin listing.
#[derive(Debug, Clone)]
pub struct PaginatedUsers {
    pub users: Vec<User>,
    pub total: u64,
    pub pages: u64,
    /// 1-based page number.
    pub current_page: u64,
}

impl PaginatedUsers {
    pub fn into_dto(self) -> PaginatedUsersDto {
        PaginatedUsersDto {
            users: self.users.into_iter().map(User::into_dto).collect(),
            total: self.total,
            pages: self.pages,
            current_page: self.current_page,
        }
    }
}
