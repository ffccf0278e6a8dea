use axum_macros::debug_handler;
use crate::dto::auth_dto::{PhoneQuery, RegisterReq, RegisterRes, SendCodeRes};
use crate::error::api_error::ApiError;
use crate::error::request_error::{ValidatedQuery, ValidatedRequest};
use crate::response::api_response::ApiSuccessResponse;
use crate::state::auth_state::AuthState;
use axum::{extract::State, http::StatusCode, Json};

pub async fn send_register_code(
    State(state): State<AuthState>,
    ValidatedQuery(query): ValidatedQuery<PhoneQuery>,
) -> Result<Json<ApiSuccessResponse<SendCodeRes>>, ApiError> {
    let code = state
        .user_service
        .send_register_code(&query.phone_number)
        .await?;
    Ok(Json(ApiSuccessResponse::send_with_message(
        "verification code sent",
        SendCodeRes { code },
    )))
}

#[debug_handler]
pub async fn register(
    State(state): State<AuthState>,
    ValidatedRequest(payload): ValidatedRequest<RegisterReq>,
) -> Result<(StatusCode, Json<ApiSuccessResponse<RegisterRes>>), ApiError> {
    let res = state.user_service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiSuccessResponse::send(res))))
}
