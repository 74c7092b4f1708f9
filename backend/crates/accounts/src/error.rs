//! Accounts Error Types
//!
//! Account-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Not-found conditions are reported as
//! 400 with a message, which is what clients of this service expect.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::cloudinary::CloudinaryError;
use platform::password::PasswordHashError;
use platform::token::TokenError;
use thiserror::Error;

/// Accounts result type alias
pub type AccountResult<T> = Result<T, AccountError>;

#[derive(Debug, Error)]
pub enum AccountError {
    /// Request field validation failed
    #[error("{0}")]
    Validation(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Role not found")]
    RoleNotFound,

    /// Email or phone number already registered
    #[error("User with email or phone number already exists")]
    DuplicateUser,

    /// Unknown user, wrong password or missing credential headers
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session not found or expired")]
    SessionInvalid,

    /// Malformed multipart or JSON body
    #[error("{0}")]
    BadPayload(String),

    /// Asset store failure (disk or remote)
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountError {
    /// Shorthand for [`AccountError::Validation`]
    pub fn validation(message: impl Into<String>) -> Self {
        AccountError::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::Validation(_)
            | AccountError::UserNotFound
            | AccountError::RoleNotFound
            | AccountError::BadPayload(_) => ErrorKind::BadRequest,
            AccountError::DuplicateUser => ErrorKind::Conflict,
            AccountError::InvalidCredentials | AccountError::SessionInvalid => {
                ErrorKind::Unauthorized
            }
            AccountError::Database(e) if is_unique_violation(e) => ErrorKind::Conflict,
            AccountError::Storage(_) | AccountError::Database(_) | AccountError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        match self {
            AccountError::Database(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AccountError::Database(e) if is_unique_violation(e) => {
                tracing::debug!(error = %e, "Unique constraint rejected account write");
            }
            AccountError::Database(e) => {
                tracing::error!(error = %e, "Accounts database error");
            }
            AccountError::Storage(msg) => {
                tracing::error!(message = %msg, "Asset storage error");
            }
            AccountError::Internal(msg) => {
                tracing::error!(message = %msg, "Accounts internal error");
            }
            AccountError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Accounts error");
            }
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<PasswordHashError> for AccountError {
    fn from(err: PasswordHashError) -> Self {
        AccountError::Internal(err.to_string())
    }
}

impl From<TokenError> for AccountError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid(_) | TokenError::Expired => AccountError::SessionInvalid,
            TokenError::Creation(_) | TokenError::InvalidTtl(_) => {
                AccountError::Internal(err.to_string())
            }
        }
    }
}

impl From<CloudinaryError> for AccountError {
    fn from(err: CloudinaryError) -> Self {
        AccountError::Storage(err.to_string())
    }
}

impl From<JsonRejection> for AccountError {
    fn from(rejection: JsonRejection) -> Self {
        AccountError::BadPayload(rejection.body_text())
    }
}

impl From<QueryRejection> for AccountError {
    fn from(rejection: QueryRejection) -> Self {
        AccountError::BadPayload(rejection.body_text())
    }
}

impl From<MultipartRejection> for AccountError {
    fn from(rejection: MultipartRejection) -> Self {
        AccountError::BadPayload(rejection.body_text())
    }
}

impl From<MultipartError> for AccountError {
    fn from(err: MultipartError) -> Self {
        AccountError::BadPayload(err.body_text())
    }
}

impl From<std::io::Error> for AccountError {
    fn from(err: std::io::Error) -> Self {
        AccountError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AccountError::validation("x").status_code(), 400);
        assert_eq!(AccountError::UserNotFound.status_code(), 400);
        assert_eq!(AccountError::RoleNotFound.status_code(), 400);
        assert_eq!(AccountError::DuplicateUser.status_code(), 409);
        assert_eq!(AccountError::InvalidCredentials.status_code(), 401);
        assert_eq!(AccountError::Storage("disk".into()).status_code(), 500);
        assert_eq!(AccountError::Database(sqlx::Error::PoolClosed).status_code(), 500);
    }

    #[test]
    fn test_messages_reach_the_client() {
        let app_err = AccountError::UserNotFound.into_app_error();
        assert_eq!(app_err.message(), "User not found");

        let app_err = AccountError::validation("Invalid email format").into_app_error();
        assert_eq!(app_err.message(), "Invalid email format");
        assert_eq!(app_err.status_code(), 400);
    }

    #[test]
    fn test_exhausted_pool_is_unavailable() {
        let app_err = AccountError::Database(sqlx::Error::PoolTimedOut).into_app_error();
        assert_eq!(app_err.status_code(), 503);
        assert_eq!(app_err.message(), "Database connection pool exhausted");
    }

    #[test]
    fn test_token_errors_map_to_session_invalid() {
        assert!(matches!(
            AccountError::from(TokenError::Expired),
            AccountError::SessionInvalid
        ));
        assert!(matches!(
            AccountError::from(TokenError::Creation("x".into())),
            AccountError::Internal(_)
        ));
    }
}
