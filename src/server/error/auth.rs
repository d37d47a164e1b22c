use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No user ID is stored in the session.
    ///
    /// Results in a 401 Unauthorized response.
    #[error("No user in session")]
    UserNotInSession,

    /// The session references a user that no longer exists.
    ///
    /// Results in a 401 Unauthorized response so the client logs in again.
    #[error("User {0} in session not found in database")]
    UserNotInDatabase(i32),

    /// Username unknown or password mismatch during login.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Current password did not verify during a password change.
    #[error("Current password is incorrect")]
    IncorrectPassword,

    /// Authenticated user lacks the role or ownership required by the endpoint.
    ///
    /// # Fields
    /// - ID of the user that was denied
    /// - Server-side description of the check that failed
    #[error("Access denied for user {0}: {1}")]
    AccessDenied(i32, String),
}

/// Converts authentication errors into HTTP responses.
///
/// - `UserNotInSession` / `UserNotInDatabase` → 401 with "Authentication required"
/// - `InvalidCredentials` / `IncorrectPassword` → 401 with the error message
/// - `AccessDenied` → 403 with "Permission denied"; the detail is logged at debug level
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::UserNotInSession | Self::UserNotInDatabase(_) => {
                tracing::debug!("{}", self);
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorDto {
                        error: "Authentication required".to_string(),
                    }),
                )
                    .into_response()
            }
            Self::InvalidCredentials | Self::IncorrectPassword => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorDto {
                    error: self.to_string(),
                }),
            )
                .into_response(),
            Self::AccessDenied(_, _) => {
                tracing::debug!("{}", self);
                (
                    StatusCode::FORBIDDEN,
                    Json(ErrorDto {
                        error: "Permission denied".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
