use crate::dto::user_dto::{ProfileRes, UpdateProfileReq};
use crate::error::{api_error::ApiError, request_error::ValidatedRequest};
use crate::middleware::auth::CurrentUser;
use crate::model::user::{User, WorkoutPlan};
use crate::response::api_response::ApiSuccessResponse;
use crate::state::profile_state::ProfileState;
use axum::{extract::State, Json};

pub async fn get_profile(
    State(state): State<ProfileState>,
    current_user: CurrentUser,
) -> Result<Json<ApiSuccessResponse<ProfileRes>>, ApiError> {
    let profile = state
        .user_service
        .get_profile(current_user.user_id)
        .await?;
    Ok(Json(ApiSuccessResponse::send(profile)))
}

/// 没有计划时 data 为 null
pub async fn get_workout_plan(
    State(state): State<ProfileState>,
    current_user: CurrentUser,
) -> Result<Json<ApiSuccessResponse<Option<WorkoutPlan>>>, ApiError> {
    let plan = state
        .user_service
        .get_workout_plan(current_user.user_id)
        .await?;
    let message = if plan.is_some() {
        "success"
    } else {
        "workout plan not generated yet"
    };
    Ok(Json(ApiSuccessResponse::send_with_message(message, plan)))
}

// 只能修改自己的资料
pub async fn update_profile(
    State(state): State<ProfileState>,
    current_user: CurrentUser,
    ValidatedRequest(payload): ValidatedRequest<UpdateProfileReq>,
) -> Result<Json<ApiSuccessResponse<User>>, ApiError> {
    let user = state
        .user_service
        .update_profile(current_user.user_id, payload)
        .await?;
    Ok(Json(ApiSuccessResponse::send(user)))
}
