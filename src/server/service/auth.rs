//! Account registration, login and self-service profile management.

use entity::user::Role;
use sea_orm::DatabaseConnection;

use crate::{
    model::user::{ChangePasswordDto, LoginDto, RegisterDto, UpdateProfileDto},
    server::{
        data::user::UserRepository,
        error::{auth::AuthError, AppError},
        model::user::{CreateUserParams, UpdateUserParams, User},
        util::{
            email::validate_email,
            password::{hash_password, verify_password},
            validate::{optional_text, required_text},
        },
    },
};

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
    email_domain: &'a str,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a DatabaseConnection, email_domain: &'a str) -> Self {
        Self { db, email_domain }
    }

    /// Registers a new account.
    ///
    /// # Arguments
    /// - `payload` - Username, email, password, full name and role are required
    ///
    /// # Returns
    /// - `Ok(User)` - Created account
    /// - `Err(AppError::BadRequest)` - Missing field, invalid email, taken username or email,
    ///   or unknown role
    pub async fn register(&self, payload: RegisterDto) -> Result<User, AppError> {
        let username = required_text(payload.username, "username")?;
        let email = required_text(payload.email, "email")?;
        let password = required_text(payload.password, "password")?;
        let full_name = required_text(payload.full_name, "full_name")?;
        let role = required_text(payload.role, "role")?;

        let email = validate_email(&email, self.email_domain).map_err(AppError::BadRequest)?;

        let repo = UserRepository::new(self.db);
        if repo.find_by_username(&username).await?.is_some() {
            return Err(AppError::bad_request("Username already exists"));
        }
        if repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::bad_request("Email already exists"));
        }

        let role: Role = role
            .parse()
            .map_err(|_| AppError::bad_request("Invalid user role"))?;

        let student_id = optional_text(payload.student_id);
        if let Some(student_id) = &student_id {
            if repo.find_by_student_id(student_id).await?.is_some() {
                return Err(AppError::bad_request("Student ID already exists"));
            }
        }

        let user = repo
            .create(CreateUserParams {
                username,
                email,
                password_hash: hash_password(&password)?,
                role,
                student_id,
                full_name,
                department: optional_text(payload.department),
            })
            .await?;

        tracing::info!("Registered {} account {}", user.role.as_str(), user.username);

        Ok(user)
    }

    /// Verifies credentials and records the login time.
    ///
    /// # Returns
    /// - `Ok(User)` - Authenticated user with `last_login` updated
    /// - `Err(AuthError::InvalidCredentials)` - Unknown username or wrong password
    pub async fn login(&self, payload: LoginDto) -> Result<User, AppError> {
        let (Some(username), Some(password)) = (optional_text(payload.username), payload.password)
        else {
            return Err(AppError::bad_request("Username and password are required"));
        };

        let repo = UserRepository::new(self.db);
        let Some(user) = repo.find_by_username(&username).await? else {
            return Err(AuthError::InvalidCredentials.into());
        };

        if !verify_password(&password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }

        repo.touch_last_login(user.id).await?;

        repo.find_by_id(user.id)
            .await?
            .ok_or_else(|| AuthError::UserNotInDatabase(user.id).into())
    }

    /// Updates the caller's own name, email, department and student ID.
    pub async fn update_profile(
        &self,
        user: &User,
        payload: UpdateProfileDto,
    ) -> Result<User, AppError> {
        let repo = UserRepository::new(self.db);

        let email = match payload.email {
            Some(email) => {
                let email =
                    validate_email(&email, self.email_domain).map_err(AppError::BadRequest)?;
                if email != user.email && repo.find_by_email(&email).await?.is_some() {
                    return Err(AppError::bad_request("Email already exists"));
                }
                Some(email)
            }
            None => None,
        };

        let student_id = optional_text(payload.student_id);
        if let Some(student_id) = &student_id {
            if let Some(holder) = repo.find_by_student_id(student_id).await? {
                if holder.id != user.id {
                    return Err(AppError::bad_request("Student ID already exists"));
                }
            }
        }

        repo.update(UpdateUserParams {
            id: user.id,
            email,
            full_name: optional_text(payload.full_name),
            department: payload.department,
            student_id,
            ..Default::default()
        })
        .await?
        .ok_or_else(|| AuthError::UserNotInDatabase(user.id).into())
    }

    /// Replaces the password after verifying the current one.
    ///
    /// # Returns
    /// - `Ok(())` - Password changed
    /// - `Err(AuthError::IncorrectPassword)` - `old_password` did not verify
    pub async fn change_password(
        &self,
        user: &User,
        payload: ChangePasswordDto,
    ) -> Result<(), AppError> {
        let (Some(old_password), Some(new_password)) = (payload.old_password, payload.new_password)
        else {
            return Err(AppError::bad_request("old_password and new_password are required"));
        };
        if new_password.trim().is_empty() {
            return Err(AppError::bad_request("new_password is required"));
        }

        if !verify_password(&old_password, &user.password_hash) {
            return Err(AuthError::IncorrectPassword.into());
        }

        UserRepository::new(self.db)
            .update(UpdateUserParams {
                id: user.id,
                password_hash: Some(hash_password(&new_password)?),
                ..Default::default()
            })
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::builder::TestBuilder;

    const DOMAIN: &str = "@connect.polyu.hk";

    fn registration(username: &str, email: &str) -> RegisterDto {
        RegisterDto {
            username: Some(username.to_string()),
            email: Some(email.to_string()),
            password: Some("secret".to_string()),
            full_name: Some("Chan Tai Man".to_string()),
            role: Some("student".to_string()),
            student_id: None,
            department: None,
        }
    }

    #[tokio::test]
    async fn registers_and_logs_in() -> Result<(), AppError> {
        let test = TestBuilder::new().with_user_tables().build().await.unwrap();
        let service = AuthService::new(&test.db, DOMAIN);

        let user = service
            .register(registration("chan", " Chan@Connect.PolyU.hk "))
            .await?;
        assert_eq!(user.email, "chan@connect.polyu.hk");
        assert_eq!(user.role, Role::Student);

        let logged_in = service
            .login(LoginDto {
                username: Some("chan".to_string()),
                password: Some("secret".to_string()),
            })
            .await?;
        assert!(logged_in.last_login.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn rejects_wrong_password() -> Result<(), AppError> {
        let test = TestBuilder::new().with_user_tables().build().await.unwrap();
        let service = AuthService::new(&test.db, DOMAIN);
        service.register(registration("chan", "chan@connect.polyu.hk")).await?;

        let result = service
            .login(LoginDto {
                username: Some("chan".to_string()),
                password: Some("wrong".to_string()),
            })
            .await;

        assert!(matches!(
            result,
            Err(AppError::AuthErr(AuthError::InvalidCredentials))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn rejects_duplicate_username_and_bad_role() -> Result<(), AppError> {
        let test = TestBuilder::new().with_user_tables().build().await.unwrap();
        let service = AuthService::new(&test.db, DOMAIN);
        service.register(registration("chan", "chan@connect.polyu.hk")).await?;

        let duplicate = service.register(registration("chan", "other@connect.polyu.hk")).await;
        assert!(matches!(
            duplicate,
            Err(AppError::BadRequest(msg)) if msg == "Username already exists"
        ));

        let mut bad_role = registration("lee", "lee@connect.polyu.hk");
        bad_role.role = Some("janitor".to_string());
        let result = service.register(bad_role).await;
        assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg == "Invalid user role"));

        Ok(())
    }

    #[tokio::test]
    async fn rejects_foreign_email_domain() -> Result<(), AppError> {
        let test = TestBuilder::new().with_user_tables().build().await.unwrap();
        let service = AuthService::new(&test.db, DOMAIN);

        let result = service.register(registration("chan", "chan@gmail.com")).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));

        Ok(())
    }

    #[tokio::test]
    async fn changes_password_after_verification() -> Result<(), AppError> {
        let test = TestBuilder::new().with_user_tables().build().await.unwrap();
        let service = AuthService::new(&test.db, DOMAIN);
        let user = service.register(registration("chan", "chan@connect.polyu.hk")).await?;

        let wrong = service
            .change_password(
                &user,
                ChangePasswordDto {
                    old_password: Some("nope".to_string()),
                    new_password: Some("next".to_string()),
                },
            )
            .await;
        assert!(matches!(wrong, Err(AppError::AuthErr(AuthError::IncorrectPassword))));

        service
            .change_password(
                &user,
                ChangePasswordDto {
                    old_password: Some("secret".to_string()),
                    new_password: Some("next".to_string()),
                },
            )
            .await?;

        let relogged = service
            .login(LoginDto {
                username: Some("chan".to_string()),
                password: Some("next".to_string()),
            })
            .await?;
        assert_eq!(relogged.id, user.id);

        Ok(())
    }
}
