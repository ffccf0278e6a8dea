use crate::dto::diet_dto::{AddFoodReq, FoodListQuery, FoodListRes};
use crate::error::api_error::ApiError;
use crate::error::request_error::{ValidatedQuery, ValidatedRequest};
use crate::model::diet::Food;
use crate::response::api_response::ApiSuccessResponse;
use crate::state::diet_state::DietState;
use axum::{extract::State, http::StatusCode, Json};

pub async fn list_foods(
    State(state): State<DietState>,
    ValidatedQuery(query): ValidatedQuery<FoodListQuery>,
) -> Result<Json<ApiSuccessResponse<FoodListRes>>, ApiError> {
    let res = state.diet_service.list_foods(query).await?;
    Ok(Json(ApiSuccessResponse::send(res)))
}

/// 路由上挂了 require_admin
pub async fn add_food(
    State(state): State<DietState>,
    ValidatedRequest(payload): ValidatedRequest<AddFoodReq>,
) -> Result<(StatusCode, Json<ApiSuccessResponse<Food>>), ApiError> {
    let food = state.diet_service.add_food(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiSuccessResponse::send(food))))
}
