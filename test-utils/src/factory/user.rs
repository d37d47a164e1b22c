//! User factory for creating test user entities.

use crate::factory::helpers::next_id;
use chrono::Utc;
use entity::user::Role;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test users with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let teacher = UserFactory::new(&db)
///     .username("chan")
///     .role(Role::Teacher)
///     .build()
///     .await?;
/// ```
pub struct UserFactory<'a> {
    db: &'a DatabaseConnection,
    username: String,
    email: String,
    password_hash: String,
    role: Role,
    student_id: Option<String>,
    full_name: String,
    department: Option<String>,
}

impl<'a> UserFactory<'a> {
    /// Creates a new UserFactory with default values.
    ///
    /// Defaults:
    /// - username: `"user{id}"`
    /// - email: `"user{id}@connect.polyu.hk"`
    /// - role: `Role::Student` with student_id `"S{id}"`
    /// - full_name: `"User {id}"`
    /// - password_hash: a placeholder that never verifies
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            username: format!("user{}", id),
            email: format!("user{}@connect.polyu.hk", id),
            password_hash: "unusable".to_string(),
            role: Role::Student,
            student_id: Some(format!("S{}", id)),
            full_name: format!("User {}", id),
            department: None,
        }
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the stored password hash. Tests that log in pass a real argon2 hash here.
    pub fn password_hash(mut self, password_hash: impl Into<String>) -> Self {
        self.password_hash = password_hash.into();
        self
    }

    /// Sets the role. Non-student roles drop the default student number.
    pub fn role(mut self, role: Role) -> Self {
        if role != Role::Student {
            self.student_id = None;
        }
        self.role = role;
        self
    }

    pub fn student_id(mut self, student_id: Option<&str>) -> Self {
        self.student_id = student_id.map(str::to_string);
        self
    }

    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Builds and inserts the user entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::user::Model)` - Created user entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::user::Model, DbErr> {
        entity::user::ActiveModel {
            username: ActiveValue::Set(self.username),
            email: ActiveValue::Set(self.email),
            password_hash: ActiveValue::Set(self.password_hash),
            role: ActiveValue::Set(self.role),
            student_id: ActiveValue::Set(self.student_id),
            full_name: ActiveValue::Set(self.full_name),
            department: ActiveValue::Set(self.department),
            created_at: ActiveValue::Set(Utc::now()),
            last_login: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a student with default values.
pub async fn create_user(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).build().await
}

/// Creates a student with default values.
pub async fn create_student(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).role(Role::Student).build().await
}

/// Creates a teacher with default values.
pub async fn create_teacher(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).role(Role::Teacher).build().await
}

/// Creates an admin with default values.
pub async fn create_admin(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).role(Role::Admin).build().await
}
