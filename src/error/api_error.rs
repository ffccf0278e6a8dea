use crate::error::{
    db_error::DbError, diet_error::DietError, token_error::TokenError, user_error::UserError,
    video_error::VideoError,
};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::request_error::RequestError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    TokenError(#[from] TokenError),
    #[error(transparent)]
    UserError(#[from] UserError),
    #[error(transparent)]
    DbError(#[from] DbError),
    #[error(transparent)]
    RequestError(#[from] RequestError),
    #[error(transparent)]
    VideoError(#[from] VideoError),
    #[error(transparent)]
    DietError(#[from] DietError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::TokenError(error) => error.into_response(),
            ApiError::UserError(error) => error.into_response(),
            ApiError::DbError(error) => error.into_response(),
            ApiError::RequestError(error) => error.into_response(),
            ApiError::VideoError(error) => error.into_response(),
            ApiError::DietError(error) => error.into_response(),
        }
    }
}
