//! 饮食记录和食物的请求/响应

use crate::dto::page_dto::Pagination;
use crate::model::diet::{DietEntry, DietItemDetail, Food};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// 单个条目不做整体校验，无效条目进入 skipped
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietItemReq {
    pub food_id: Option<i64>,
    pub quantity: Option<f64>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertMealReq {
    #[validate(length(min = 1, message = "mealType is required"))]
    pub meal_type: String,
    #[serde(default)]
    pub items: Vec<DietItemReq>,
    pub date: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedItem {
    pub index: usize,
    pub food_id: i64,
    pub quantity: f64,
    pub calories: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedItem {
    pub index: usize,
    pub food_id: Option<i64>,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertMealRes {
    pub entry_id: i64,
    pub created: bool,
    pub total_calories: i64,
    pub applied: Vec<AppliedItem>,
    pub skipped: Vec<SkippedItem>,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct DietDayQuery {
    pub date: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DietFoodRes {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub calories: f64,
    pub image: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DietItemRes {
    pub id: i64,
    pub food_id: i64,
    pub quantity: f64,
    pub calories: i64,
    pub food: DietFoodRes,
}

impl From<DietItemDetail> for DietItemRes {
    fn from(detail: DietItemDetail) -> Self {
        Self {
            id: detail.id,
            food_id: detail.food_id,
            quantity: detail.quantity,
            calories: detail.calories,
            food: DietFoodRes {
                id: detail.food_id,
                name: detail.food_name,
                category: detail.food_category,
                unit: detail.food_unit,
                calories: detail.food_calories,
                image: detail.food_image,
            },
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DietEntryRes {
    #[serde(flatten)]
    pub entry: DietEntry,
    pub items: Vec<DietItemRes>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MealTypeCalories {
    pub breakfast: i64,
    pub lunch: i64,
    pub dinner: i64,
    pub snack: i64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DietSummary {
    pub date: NaiveDate,
    pub total_calories: i64,
    pub meal_type_calories: MealTypeCalories,
}

#[derive(Clone, Debug, Serialize)]
pub struct DietDayRes {
    pub entries: Vec<DietEntryRes>,
    pub summary: DietSummary,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DailyCaloriesPoint {
    pub date: NaiveDate,
    pub day: &'static str,
    pub value: i64,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FoodListQuery {
    #[validate(length(min = 1, max = 32))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub search: Option<String>,
    #[validate(range(min = 1, message = "page must be positive"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    #[serde(default)]
    pub group_by_category: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct FoodPageRes {
    pub foods: Vec<Food>,
    pub pagination: Pagination,
}

/// 分页列表或按类别分组
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum FoodListRes {
    Page(FoodPageRes),
    Grouped(BTreeMap<String, Vec<Food>>),
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AddFoodReq {
    #[validate(length(min = 1, max = 64, message = "name must be between 1 and 64 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 32, message = "category is required"))]
    pub category: String,
    #[validate(length(min = 1, max = 16, message = "unit is required"))]
    pub unit: String,
    #[validate(range(min = 0.0, max = 10000.0, message = "calories must be between 0 and 10000"))]
    pub calories: f64,
    #[validate(length(max = 512, message = "image url is too long"))]
    pub image: Option<String>,
}
