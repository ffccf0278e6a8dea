use crate::error::error_code;
use crate::response::api_response::ApiErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VideoError {
    #[error("Video not found")]
    VideoNotFound(i64),
    #[error("Video already liked")]
    AlreadyLiked,
    #[error("Video already in favorites")]
    AlreadyFavorited,
    #[error("Unsupported video type: {0}")]
    UnsupportedVideoType(String),
}

impl VideoError {
    fn get_code(&self) -> u32 {
        match self {
            VideoError::VideoNotFound(_) => error_code::VIDEO_NOT_FOUND,
            VideoError::AlreadyLiked => error_code::ALREADY_LIKED,
            VideoError::AlreadyFavorited => error_code::ALREADY_FAVORITED,
            VideoError::UnsupportedVideoType(_) => error_code::UNSUPPORTED_VIDEO_TYPE,
        }
    }
}

impl IntoResponse for VideoError {
    fn into_response(self) -> Response {
        let status_code = match self {
            VideoError::VideoNotFound(_) => StatusCode::NOT_FOUND,
            VideoError::AlreadyLiked => StatusCode::CONFLICT,
            VideoError::AlreadyFavorited => StatusCode::CONFLICT,
            VideoError::UnsupportedVideoType(_) => StatusCode::BAD_REQUEST,
        };

        ApiErrorResponse::send(
            status_code.as_u16(),
            self.get_code(),
            Some(self.to_string()),
        )
    }
}
