use axum_macros::debug_handler;
use super::parse_date_param;
use crate::dto::diet_dto::{
    DailyCaloriesPoint, DietDayQuery, DietDayRes, UpsertMealReq, UpsertMealRes, WeeklyQuery,
};
use crate::error::api_error::ApiError;
use crate::error::request_error::{ValidatedQuery, ValidatedRequest};
use crate::middleware::auth::CurrentUser;
use crate::response::api_response::ApiSuccessResponse;
use crate::state::diet_state::DietState;
use crate::utils::date;
use axum::{extract::State, Json};

pub async fn get_day(
    State(state): State<DietState>,
    current_user: CurrentUser,
    ValidatedQuery(query): ValidatedQuery<DietDayQuery>,
) -> Result<Json<ApiSuccessResponse<DietDayRes>>, ApiError> {
    let entry_date = parse_date_param(query.date.as_deref())?;
    let res = state
        .diet_service
        .get_day(current_user.user_id, entry_date)
        .await?;
    Ok(Json(ApiSuccessResponse::send(res)))
}

#[debug_handler]
pub async fn upsert_meal(
    State(state): State<DietState>,
    current_user: CurrentUser,
    ValidatedRequest(payload): ValidatedRequest<UpsertMealReq>,
) -> Result<Json<ApiSuccessResponse<UpsertMealRes>>, ApiError> {
    let entry_date = parse_date_param(payload.date.as_deref())?.unwrap_or_else(date::local_today);
    let res = state
        .diet_service
        .upsert_meal(
            current_user.user_id,
            &payload.meal_type,
            entry_date,
            &payload.items,
        )
        .await?;
    let message = if res.created {
        "diet entry created"
    } else {
        "diet entry updated"
    };
    Ok(Json(ApiSuccessResponse::send_with_message(message, res)))
}

pub async fn weekly(
    State(state): State<DietState>,
    current_user: CurrentUser,
    ValidatedQuery(query): ValidatedQuery<WeeklyQuery>,
) -> Result<Json<ApiSuccessResponse<Vec<DailyCaloriesPoint>>>, ApiError> {
    let start = parse_date_param(query.start_date.as_deref())?;
    let end = parse_date_param(query.end_date.as_deref())?;
    let res = state
        .diet_service
        .weekly(current_user.user_id, start, end)
        .await?;
    Ok(Json(ApiSuccessResponse::send(res)))
}
