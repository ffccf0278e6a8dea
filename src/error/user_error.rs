use crate::error::error_code;
use crate::response::api_response::ApiErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("User not found")]
    UserNotFound,
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("Invalid phone number or password")]
    InvalidPassword,
    #[error("Verification code is wrong or expired")]
    InvalidVerificationCode,
    #[error("Invalid phone number")]
    InvalidPhone,
    #[error("Permission denied")]
    PermissionDenied,
    #[error("Failed to send verification code")]
    SmsSendFailed(String),
    #[error("Failed to process password")]
    PasswordHashError(String),
}

impl UserError {
    fn get_code(&self) -> u32 {
        match self {
            UserError::UserNotFound => error_code::USER_NOT_FOUND,
            UserError::UserAlreadyExists => error_code::USER_ALREADY_EXISTS,
            UserError::InvalidPassword => error_code::INVALID_PASSWORD,
            UserError::InvalidVerificationCode => error_code::INVALID_VERIFICATION_CODE,
            UserError::InvalidPhone => error_code::INVALID_PHONE,
            UserError::PermissionDenied => error_code::PERMISSION_DENIED,
            UserError::SmsSendFailed(_) => error_code::SMS_SEND_FAILED,
            UserError::PasswordHashError(_) => error_code::PASSWORD_HASH_ERROR,
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let status_code = match self {
            UserError::UserNotFound => StatusCode::NOT_FOUND,
            UserError::UserAlreadyExists => StatusCode::CONFLICT,
            UserError::InvalidPassword => StatusCode::UNAUTHORIZED,
            UserError::InvalidVerificationCode => StatusCode::BAD_REQUEST,
            UserError::InvalidPhone => StatusCode::BAD_REQUEST,
            UserError::PermissionDenied => StatusCode::FORBIDDEN,
            UserError::SmsSendFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            UserError::PasswordHashError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        ApiErrorResponse::send(
            status_code.as_u16(),
            self.get_code(),
            Some(self.to_string()),
        )
    }
}
