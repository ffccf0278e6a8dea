use crate::dto::auth_dto::{
    CheckUserRes, LoginReq, LoginRes, LogoutReq, PhoneQuery, ResetPasswordReq, SendCodeRes,
    VerifyReq, VerifyRes,
};
use crate::error::api_error::ApiError;
use crate::error::request_error::{ValidatedQuery, ValidatedRequest};
use crate::response::api_response::ApiSuccessResponse;
use crate::state::auth_state::AuthState;
use axum::{extract::State, Json};

pub async fn login(
    State(state): State<AuthState>,
    ValidatedRequest(payload): ValidatedRequest<LoginReq>,
) -> Result<Json<ApiSuccessResponse<LoginRes>>, ApiError> {
    let res = state.user_service.login(payload).await?;
    Ok(Json(ApiSuccessResponse::send(res)))
}

pub async fn verify(
    State(state): State<AuthState>,
    ValidatedRequest(payload): ValidatedRequest<VerifyReq>,
) -> Result<Json<ApiSuccessResponse<VerifyRes>>, ApiError> {
    let res = state.user_service.verify(&payload.token).await?;
    Ok(Json(ApiSuccessResponse::send(res)))
}

pub async fn logout(
    State(state): State<AuthState>,
    ValidatedRequest(payload): ValidatedRequest<LogoutReq>,
) -> Result<Json<ApiSuccessResponse<()>>, ApiError> {
    state.user_service.logout(payload.user_id).await?;
    Ok(Json(ApiSuccessResponse::message_only("logged out")))
}

pub async fn check_user(
    State(state): State<AuthState>,
    ValidatedQuery(query): ValidatedQuery<PhoneQuery>,
) -> Result<Json<ApiSuccessResponse<CheckUserRes>>, ApiError> {
    let exists = state.user_service.check_user(&query.phone_number).await?;
    Ok(Json(ApiSuccessResponse::send(CheckUserRes { exists })))
}

pub async fn send_reset_code(
    State(state): State<AuthState>,
    ValidatedQuery(query): ValidatedQuery<PhoneQuery>,
) -> Result<Json<ApiSuccessResponse<SendCodeRes>>, ApiError> {
    let code = state
        .user_service
        .send_reset_code(&query.phone_number)
        .await?;
    Ok(Json(ApiSuccessResponse::send_with_message(
        "verification code sent",
        SendCodeRes { code },
    )))
}

pub async fn reset_password(
    State(state): State<AuthState>,
    ValidatedRequest(payload): ValidatedRequest<ResetPasswordReq>,
) -> Result<Json<ApiSuccessResponse<()>>, ApiError> {
    state.user_service.reset_password(payload).await?;
    Ok(Json(ApiSuccessResponse::message_only("password reset")))
}
