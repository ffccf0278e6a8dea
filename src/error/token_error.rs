use super::error_code;
use crate::response::api_response::ApiErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    // 签名或格式不对
    #[error("Invalid token")]
    InvalidToken(String),
    #[error("Token has expired")]
    TokenExpired,
    /// 签名有效但库里已没有这条记录：已登出、重置密码或被新登录顶掉
    #[error("Token has been revoked")]
    TokenRevoked,
    #[error("Missing Bearer token")]
    MissingToken,
    #[error("Token error: {0}")]
    TokenCreationError(String),
}

impl TokenError {
    fn get_code(&self) -> u32 {
        match self {
            TokenError::InvalidToken(_) => error_code::INVALID_TOKEN,
            TokenError::TokenExpired => error_code::TOKEN_EXPIRED,
            TokenError::TokenRevoked => error_code::TOKEN_REVOKED,
            TokenError::MissingToken => error_code::MISSING_TOKEN,
            TokenError::TokenCreationError(_) => error_code::TOKEN_CREATION_ERROR,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            TokenError::TokenCreationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        if let TokenError::InvalidToken(reason) | TokenError::TokenCreationError(reason) = &self {
            tracing::debug!("token error - {}", reason);
        }
        ApiErrorResponse::send(
            self.status_code().as_u16(),
            self.get_code(),
            Some(self.to_string()),
        )
    }
}
