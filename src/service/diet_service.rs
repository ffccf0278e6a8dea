use crate::dto::diet_dto::{
    AddFoodReq, AppliedItem, DailyCaloriesPoint, DietDayRes, DietEntryRes, DietItemReq,
    DietItemRes, DietSummary, FoodListQuery, FoodListRes, FoodPageRes, MealTypeCalories,
    SkippedItem, UpsertMealRes,
};
use crate::dto::page_dto::{PageParams, Pagination};
use crate::error::api_error::ApiError;
use crate::error::db_error::DbError;
use crate::error::diet_error::DietError;
use crate::model::diet::{
    Food, MealType, NewDietItem, NewFood, FOOD_CATEGORIES, OTHER_FOOD_CATEGORY,
};
use crate::utils::date;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::repository::diet_repository::DietRepositoryTrait;

/// 周统计最多覆盖的天数
pub const MAX_RANGE_DAYS: i64 = 366;
const DEFAULT_FOOD_PAGE_LIMIT: i64 = 100;
const DAY_LABELS: [&str; 7] = ["周一", "周二", "周三", "周四", "周五", "周六", "周日"];

const SKIP_MISSING_FOOD_ID: &str = "missing foodId";
const SKIP_INVALID_QUANTITY: &str = "quantity must be a positive number";
const SKIP_UNKNOWN_FOOD: &str = "food not found";
const SKIP_QUANTITY_TOO_LARGE: &str = "quantity is too large";

/// 单个条目允许的最大份数
pub const MAX_ITEM_QUANTITY: f64 = 10_000.0;

fn item_calories(food: &Food, quantity: f64) -> i64 {
    (food.calories * quantity).round() as i64
}

#[derive(Clone)]
pub struct DietService {
    diet_repo: Arc<dyn DietRepositoryTrait>,
}

impl DietService {
    pub fn new(diet_repo: Arc<dyn DietRepositoryTrait>) -> Self {
        Self { diet_repo }
    }

    /// 用这次提交的条目整体替换 (用户, 餐次, 日期) 的饮食记录
    ///
    /// 无法解析的条目不会中断整个请求，逐条记录在 skipped 里。
    pub async fn upsert_meal(
        &self,
        user_id: i64,
        meal_type: &str,
        entry_date: NaiveDate,
        items: &[DietItemReq],
    ) -> Result<UpsertMealRes, ApiError> {
        let meal_type: MealType = meal_type
            .parse()
            .map_err(DietError::InvalidMealType)?;
        if items.is_empty() {
            return Err(DietError::EmptyItems.into());
        }

        let mut food_ids: Vec<i64> = items.iter().filter_map(|item| item.food_id).collect();
        food_ids.sort_unstable();
        food_ids.dedup();
        let foods: HashMap<i64, Food> = if food_ids.is_empty() {
            HashMap::new()
        } else {
            self.diet_repo
                .find_foods_by_ids(&food_ids)
                .await
                .map_err(DbError::from)?
                .into_iter()
                .map(|food| (food.id, food))
                .collect()
        };

        let mut applied = Vec::new();
        let mut skipped = Vec::new();
        let mut new_items = Vec::new();
        for (index, item) in items.iter().enumerate() {
            let skip = |reason: &str| SkippedItem {
                index,
                food_id: item.food_id,
                reason: reason.to_string(),
            };
            let Some(food_id) = item.food_id else {
                skipped.push(skip(SKIP_MISSING_FOOD_ID));
                continue;
            };
            let quantity = match item.quantity {
                Some(quantity) if quantity.is_finite() && quantity > MAX_ITEM_QUANTITY => {
                    skipped.push(skip(SKIP_QUANTITY_TOO_LARGE));
                    continue;
                }
                Some(quantity) if quantity.is_finite() && quantity > 0.0 => quantity,
                _ => {
                    skipped.push(skip(SKIP_INVALID_QUANTITY));
                    continue;
                }
            };
            let Some(food) = foods.get(&food_id) else {
                skipped.push(skip(SKIP_UNKNOWN_FOOD));
                continue;
            };
            let calories = item_calories(food, quantity);
            new_items.push(NewDietItem {
                food_id,
                quantity,
                calories,
            });
            applied.push(AppliedItem {
                index,
                food_id,
                quantity,
                calories,
            });
        }
        let total_calories = new_items
            .iter()
            .fold(0i64, |acc, item| acc.saturating_add(item.calories));

        let write = self
            .diet_repo
            .replace_diet_entry(
                user_id,
                meal_type,
                entry_date,
                &new_items,
                total_calories,
                Utc::now(),
            )
            .await
            .map_err(|err| {
                tracing::error!(
                    "upsert_meal - user_id:{} | meal_type:{} | err:{}",
                    user_id,
                    meal_type,
                    err
                );
                DbError::from(err)
            })?;
        if !skipped.is_empty() {
            tracing::warn!(
                "upsert_meal - user_id:{} | entry_id:{} | skipped:{}",
                user_id,
                write.entry_id,
                skipped.len()
            );
        }

        Ok(UpsertMealRes {
            entry_id: write.entry_id,
            created: write.created,
            total_calories,
            applied,
            skipped,
        })
    }

    pub async fn get_day(
        &self,
        user_id: i64,
        entry_date: Option<NaiveDate>,
    ) -> Result<DietDayRes, ApiError> {
        let entry_date = entry_date.unwrap_or_else(date::local_today);
        let entries = self
            .diet_repo
            .list_diet_entries(user_id, entry_date)
            .await
            .map_err(DbError::from)?;
        let entry_ids: Vec<i64> = entries.iter().map(|entry| entry.id).collect();
        let mut items_by_entry: HashMap<i64, Vec<DietItemRes>> = HashMap::new();
        if !entry_ids.is_empty() {
            for detail in self
                .diet_repo
                .list_diet_items(&entry_ids)
                .await
                .map_err(DbError::from)?
            {
                items_by_entry
                    .entry(detail.diet_entry_id)
                    .or_default()
                    .push(DietItemRes::from(detail));
            }
        }

        let mut meal_type_calories = MealTypeCalories::default();
        let mut total_calories: i64 = 0;
        for entry in &entries {
            total_calories = total_calories.saturating_add(entry.total_calories);
            let slot = match entry.meal_type.parse::<MealType>() {
                Ok(MealType::Breakfast) => &mut meal_type_calories.breakfast,
                Ok(MealType::Lunch) => &mut meal_type_calories.lunch,
                Ok(MealType::Dinner) => &mut meal_type_calories.dinner,
                Ok(MealType::Snack) => &mut meal_type_calories.snack,
                Err(other) => {
                    tracing::warn!("get_day - unknown meal_type:{}", other);
                    continue;
                }
            };
            *slot = slot.saturating_add(entry.total_calories);
        }

        Ok(DietDayRes {
            entries: entries
                .into_iter()
                .map(|entry| DietEntryRes {
                    items: items_by_entry.remove(&entry.id).unwrap_or_default(),
                    entry,
                })
                .collect(),
            summary: DietSummary {
                date: entry_date,
                total_calories,
                meal_type_calories,
            },
        })
    }

    /// 默认是截止到今天的 7 天，没有记录的日期 value 为 0
    pub async fn weekly(
        &self,
        user_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<DailyCaloriesPoint>, ApiError> {
        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            (Some(start), None) => (start, start + Duration::days(6)),
            (None, Some(end)) => (end - Duration::days(6), end),
            (None, None) => {
                let today = date::local_today();
                (today - Duration::days(6), today)
            }
        };
        if start > end {
            return Err(DietError::InvalidDateRange.into());
        }
        if (end - start).num_days() >= MAX_RANGE_DAYS {
            return Err(DietError::InvalidDateRange.into());
        }

        let per_day: HashMap<NaiveDate, i64> = self
            .diet_repo
            .daily_calories(user_id, start, end)
            .await
            .map_err(DbError::from)?
            .into_iter()
            .map(|day| (day.entry_date, day.total_calories))
            .collect();

        Ok(start
            .iter_days()
            .take_while(|day| *day <= end)
            .map(|day| DailyCaloriesPoint {
                date: day,
                day: DAY_LABELS[day.weekday().num_days_from_monday() as usize],
                value: per_day.get(&day).copied().unwrap_or(0),
            })
            .collect())
    }

    pub async fn list_foods(&self, query: FoodListQuery) -> Result<FoodListRes, ApiError> {
        if query.group_by_category {
            let foods = self.diet_repo.all_foods().await.map_err(DbError::from)?;
            return Ok(FoodListRes::Grouped(group_foods(foods)));
        }

        let params =
            PageParams::with_default_limit(query.page, query.limit, DEFAULT_FOOD_PAGE_LIMIT);
        let foods = self
            .diet_repo
            .list_foods(
                query.category.clone(),
                query.search.clone(),
                params.offset(),
                params.limit,
            )
            .await
            .map_err(DbError::from)?;
        let total = self
            .diet_repo
            .count_foods(query.category, query.search)
            .await
            .map_err(DbError::from)?;
        Ok(FoodListRes::Page(FoodPageRes {
            foods,
            pagination: Pagination::new(params, total),
        }))
    }

    pub async fn add_food(&self, payload: AddFoodReq) -> Result<Food, ApiError> {
        let new_food = NewFood {
            name: payload.name,
            category: payload.category,
            unit: payload.unit,
            calories: payload.calories,
            image: payload.image,
        };
        let food = self
            .diet_repo
            .create_food(&new_food, Utc::now())
            .await
            .map_err(|err| {
                tracing::error!("add_food - name:{} | err:{}", new_food.name, err);
                DbError::from(err)
            })?;
        tracing::info!("add_food - id:{} | name:{}", food.id, food.name);
        Ok(food)
    }
}

/// 已知类别即使为空也返回，未知类别归入 other
fn group_foods(foods: Vec<Food>) -> BTreeMap<String, Vec<Food>> {
    let mut grouped: BTreeMap<String, Vec<Food>> = FOOD_CATEGORIES
        .iter()
        .map(|category| (category.to_string(), Vec::new()))
        .collect();
    for food in foods {
        let key = if FOOD_CATEGORIES.contains(&food.category.as_str()) {
            food.category.clone()
        } else {
            OTHER_FOOD_CATEGORY.to_string()
        };
        grouped.entry(key).or_default().push(food);
    }
    grouped
}
