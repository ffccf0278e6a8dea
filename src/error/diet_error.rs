use crate::error::error_code;
use crate::response::api_response::ApiErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DietError {
    #[error("Invalid meal type: {0}")]
    InvalidMealType(String),
    #[error("At least one food item is required")]
    EmptyItems,
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid date range")]
    InvalidDateRange,
}

impl DietError {
    fn get_code(&self) -> u32 {
        match self {
            DietError::InvalidMealType(_) => error_code::INVALID_MEAL_TYPE,
            DietError::EmptyItems => error_code::EMPTY_DIET_ITEMS,
            DietError::InvalidDate(_) => error_code::INVALID_DATE,
            DietError::InvalidDateRange => error_code::INVALID_DATE_RANGE,
        }
    }
}

impl IntoResponse for DietError {
    fn into_response(self) -> Response {
        // 都是参数错误
        ApiErrorResponse::send(
            StatusCode::BAD_REQUEST.as_u16(),
            self.get_code(),
            Some(self.to_string()),
        )
    }
}
