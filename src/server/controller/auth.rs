use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        user::{
            ChangePasswordDto, LoginDto, RegisterDto, UpdateProfileDto, UserDetailDto,
            UserSavedDto,
        },
    },
    server::{
        controller::extract::JsonBody,
        error::AppError,
        middleware::{auth::AuthGuard, session::AuthSession},
        service::auth::AuthService,
        state::AppState,
    },
};

/// Tag for grouping auth endpoints in OpenAPI documentation
pub static AUTH_TAG: &str = "auth";

/// Register a new account.
///
/// Validates the email against the configured domain and rejects duplicate usernames
/// and emails. Does not log the new user in.
///
/// # Arguments
/// - `state` - Application state containing the database connection
/// - `payload` - Username, email, password, full name, role and optional student ID
///
/// # Returns
/// - `201 Created` - Account created
/// - `400 Bad Request` - Missing field, invalid email or role, or duplicate account
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = AUTH_TAG,
    request_body = RegisterDto,
    responses(
        (status = 201, description = "Account created", body = UserSavedDto),
        (status = 400, description = "Invalid registration data", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthService::new(&state.db, &state.email_domain)
        .register(payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UserSavedDto {
            message: "Registration successful".to_string(),
            user: user.into_dto(),
        }),
    ))
}

/// Log in with username and password.
///
/// On success the session ID is cycled and the user ID stored in the session.
///
/// # Returns
/// - `200 OK` - Logged in
/// - `400 Bad Request` - Missing credentials
/// - `401 Unauthorized` - Wrong username or password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in", body = UserSavedDto),
        (status = 400, description = "Missing credentials", body = ErrorDto),
        (status = 401, description = "Invalid credentials", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    JsonBody(payload): JsonBody<LoginDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthService::new(&state.db, &state.email_domain)
        .login(payload)
        .await?;

    AuthSession::new(&session).login(user.id).await?;

    Ok(Json(UserSavedDto {
        message: "Login successful".to_string(),
        user: user.into_dto(),
    }))
}

/// Log out by clearing the session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Logged out", body = MessageDto)
    ),
)]
pub async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    AuthSession::new(&session).clear().await;

    Ok(Json(MessageDto::new("Logout successful")))
}

/// Get the logged-in user's profile.
///
/// # Returns
/// - `200 OK` - Current user
/// - `401 Unauthorized` - Not logged in
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Current user", body = UserDetailDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_profile(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    Ok(Json(UserDetailDto {
        user: user.into_dto(),
    }))
}

/// Update the logged-in user's profile.
///
/// # Arguments
/// - `payload` - Optional full name, email, department and student ID
///
/// # Returns
/// - `200 OK` - Updated profile
/// - `400 Bad Request` - Invalid or already used email or student ID
/// - `401 Unauthorized` - Not logged in
#[utoipa::path(
    put,
    path = "/api/auth/profile",
    tag = AUTH_TAG,
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = UserSavedDto),
        (status = 400, description = "Invalid profile data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    JsonBody(payload): JsonBody<UpdateProfileDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let user = AuthService::new(&state.db, &state.email_domain)
        .update_profile(&user, payload)
        .await?;

    Ok(Json(UserSavedDto {
        message: "Profile updated successfully".to_string(),
        user: user.into_dto(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    tag = AUTH_TAG,
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageDto),
        (status = 400, description = "Missing password fields", body = ErrorDto),
        (status = 401, description = "Not authenticated or wrong old password", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn change_password(
    State(state): State<AppState>,
    session: Session,
    JsonBody(payload): JsonBody<ChangePasswordDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session).require(&[]).await?;

    AuthService::new(&state.db, &state.email_domain)
        .change_password(&user, payload)
        .await?;

    Ok(Json(MessageDto::new("Password changed successfully")))
}
