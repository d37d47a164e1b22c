//! User data repository for database operations.
//!
//! This module provides the `UserRepository` for managing account records. It handles
//! creation, lookups by the unique columns, partial updates, pagination for the admin
//! listing and the counters used by dashboards.

use chrono::{DateTime, Utc};
use entity::user::Role;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::user::{CreateUserParams, UpdateUserParams, User};

/// Repository providing database operations for user management.
///
/// Generic over the connection so it can run inside a transaction during bulk imports.
pub struct UserRepository<'a, C: ConnectionTrait = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection or transaction
    ///
    /// # Returns
    /// - `UserRepository` - New repository instance
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a new user.
    ///
    /// # Arguments
    /// - `params` - Account fields with an already hashed password
    ///
    /// # Returns
    /// - `Ok(User)` - The created user
    /// - `Err(DbErr)` - Insert failed, including unique constraint violations
    pub async fn create(&self, params: CreateUserParams) -> Result<User, DbErr> {
        let entity = entity::user::ActiveModel {
            username: ActiveValue::Set(params.username),
            email: ActiveValue::Set(params.email),
            password_hash: ActiveValue::Set(params.password_hash),
            role: ActiveValue::Set(params.role),
            student_id: ActiveValue::Set(params.student_id),
            full_name: ActiveValue::Set(params.full_name),
            department: ActiveValue::Set(params.department),
            created_at: ActiveValue::Set(Utc::now()),
            last_login: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(User::from_entity(entity))
    }

    /// Finds a user by primary key.
    ///
    /// # Arguments
    /// - `id` - User ID
    ///
    /// # Returns
    /// - `Ok(Some(User))` - User found
    /// - `Ok(None)` - No user with that ID
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find_by_id(id).one(self.db).await?;

        Ok(entity.map(User::from_entity))
    }

    /// Finds a user by login name.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::Username.eq(username))
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    /// Finds a user by email. Emails are stored lowercased.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email))
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    /// Finds a user by institutional student number.
    pub async fn find_by_student_id(&self, student_id: &str) -> Result<Option<User>, DbErr> {
        let entity = entity::prelude::User::find()
            .filter(entity::user::Column::StudentId.eq(student_id))
            .one(self.db)
            .await?;

        Ok(entity.map(User::from_entity))
    }

    /// Applies a partial update.
    ///
    /// Only fields set to `Some` are written.
    ///
    /// # Arguments
    /// - `params` - Target user ID and the fields to change
    ///
    /// # Returns
    /// - `Ok(Some(User))` - Updated user
    /// - `Ok(None)` - No user with that ID
    /// - `Err(DbErr)` - Database error, including unique constraint violations
    pub async fn update(&self, params: UpdateUserParams) -> Result<Option<User>, DbErr> {
        let Some(entity) = entity::prelude::User::find_by_id(params.id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active = entity.into_active_model();

        if let Some(email) = params.email {
            active.email = ActiveValue::Set(email);
        }
        if let Some(role) = params.role {
            active.role = ActiveValue::Set(role);
        }
        if let Some(student_id) = params.student_id {
            active.student_id = ActiveValue::Set(Some(student_id));
        }
        if let Some(full_name) = params.full_name {
            active.full_name = ActiveValue::Set(full_name);
        }
        if let Some(department) = params.department {
            active.department = ActiveValue::Set(Some(department));
        }
        if let Some(password_hash) = params.password_hash {
            active.password_hash = ActiveValue::Set(password_hash);
        }

        let entity = active.update(self.db).await?;

        Ok(Some(User::from_entity(entity)))
    }

    /// Sets `last_login` to the current time.
    pub async fn touch_last_login(&self, id: i32) -> Result<(), DbErr> {
        entity::prelude::User::update_many()
            .filter(entity::user::Column::Id.eq(id))
            .col_expr(
                entity::user::Column::LastLogin,
                sea_orm::sea_query::Expr::value(Utc::now()),
            )
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Deletes a user. Owned courses, enrollments and responses cascade.
    ///
    /// # Returns
    /// - `Ok(true)` - User deleted
    /// - `Ok(false)` - No user with that ID
    /// - `Err(DbErr)` - Database error during delete
    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::User::delete_by_id(id).exec(self.db).await?;

        Ok(result.rows_affected > 0)
    }

    /// Gets users with pagination, newest first.
    ///
    /// # Arguments
    /// - `role` - Optional role filter
    /// - `page` - 1-based page number
    /// - `per_page` - Number of users per page
    ///
    /// # Returns
    /// - `Ok((users, total))` - Users for the requested page and the total matching count
    /// - `Err(DbErr)` - Database error during pagination query
    pub async fn get_paginated(
        &self,
        role: Option<Role>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<User>, u64), DbErr> {
        let mut query = entity::prelude::User::find();
        if let Some(role) = role {
            query = query.filter(entity::user::Column::Role.eq(role));
        }

        let paginator = query
            .order_by_desc(entity::user::Column::CreatedAt)
            .order_by_desc(entity::user::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let entities = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((entities.into_iter().map(User::from_entity).collect(), total))
    }

    /// Most recently registered users.
    pub async fn get_recent(&self, limit: u64) -> Result<Vec<User>, DbErr> {
        let entities = entity::prelude::User::find()
            .order_by_desc(entity::user::Column::CreatedAt)
            .order_by_desc(entity::user::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(User::from_entity).collect())
    }

    /// Counts all users, or only those with `role` when given.
    pub async fn count(&self, role: Option<Role>) -> Result<u64, DbErr> {
        let mut query = entity::prelude::User::find();
        if let Some(role) = role {
            query = query.filter(entity::user::Column::Role.eq(role));
        }

        query.count(self.db).await
    }

    /// Counts users who logged in at or after `since`.
    pub async fn count_logged_in_since(&self, since: DateTime<Utc>) -> Result<u64, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::LastLogin.gte(since))
            .count(self.db)
            .await
    }
}
