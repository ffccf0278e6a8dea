use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiSuccessResponse<T: Serialize> {
    success: bool,
    code: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ApiErrorResponse {
    success: bool,
    code: u32,
    message: Option<String>,
    #[serde(skip)]
    status: u16,
}

impl<T> ApiSuccessResponse<T>
where
    T: Serialize,
{
    pub(crate) fn send(data: T) -> Self {
        Self::send_with_message("success", data)
    }

    pub(crate) fn send_with_message(message: &str, data: T) -> Self {
        ApiSuccessResponse {
            success: true,
            code: 0,
            message: message.to_string(),
            data: Some(data),
        }
    }

    pub fn from_with_nodata() -> Self {
        Self::message_only("success")
    }

    pub fn message_only(message: &str) -> Self {
        ApiSuccessResponse {
            success: true,
            code: 0,
            message: message.to_string(),
            data: None,
        }
    }
}

impl ApiErrorResponse {
    pub(crate) fn send(status: u16, code: u32, message: Option<String>) -> Response {
        ApiErrorResponse {
            success: false,
            code,
            message,
            status,
        }
        .into_response()
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
