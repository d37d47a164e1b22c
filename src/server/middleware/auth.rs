use sea_orm::DatabaseConnection;
use tower_sessions::Session;

use crate::server::{
    data::user::UserRepository,
    error::{auth::AuthError, AppError},
    middleware::session::AuthSession,
    model::user::User,
};
use entity::user::Role;

/// Role a user must hold to pass the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Teacher,
    Student,
    Admin,
}

impl Permission {
    fn role(self) -> Role {
        match self {
            Permission::Teacher => Role::Teacher,
            Permission::Student => Role::Student,
            Permission::Admin => Role::Admin,
        }
    }
}

/// Resolves the session user and checks their role.
pub struct AuthGuard<'a> {
    db: &'a DatabaseConnection,
    session: &'a Session,
}

impl<'a> AuthGuard<'a> {
    pub fn new(db: &'a DatabaseConnection, session: &'a Session) -> Self {
        Self { db, session }
    }

    /// Loads the authenticated user and verifies their role.
    ///
    /// An empty permission list only requires a logged-in user. Otherwise the user's
    /// role must match any one of the listed permissions.
    ///
    /// # Arguments
    /// - `permissions` - Roles allowed to access the endpoint
    ///
    /// # Returns
    /// - `Ok(User)` - Authenticated user with an allowed role
    /// - `Err(AuthError::UserNotInSession)` - No user logged in
    /// - `Err(AuthError::UserNotInDatabase)` - Session references a deleted user
    /// - `Err(AuthError::AccessDenied)` - User's role is not allowed
    pub async fn require(&self, permissions: &[Permission]) -> Result<User, AppError> {
        let user_repo = UserRepository::new(self.db);

        let Some(user_id) = AuthSession::new(self.session).get_user_id().await? else {
            return Err(AuthError::UserNotInSession.into());
        };

        let Some(user) = user_repo.find_by_id(user_id).await? else {
            return Err(AuthError::UserNotInDatabase(user_id).into());
        };

        if !permissions.is_empty() && !permissions.iter().any(|p| p.role() == user.role) {
            return Err(AuthError::AccessDenied(
                user_id,
                format!(
                    "User with role {} does not hold any of the required roles {:?}",
                    user.role.as_str(),
                    permissions
                ),
            )
            .into());
        }

        Ok(user)
    }
}
