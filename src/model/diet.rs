//! 食物与饮食记录
//!
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub unit: String,
    /// 每单位热量
    pub calories: f64,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewFood {
    pub name: String,
    pub category: String,
    pub unit: String,
    pub calories: f64,
    pub image: Option<String>,
}

pub const FOOD_CATEGORIES: [&str; 9] = [
    "cereal",
    "meat",
    "vegetable",
    "fruit",
    "dairyProducts",
    "beanProducts",
    "oilsAndFats",
    "snack",
    "drink",
];

/// 不在 FOOD_CATEGORIES 里的食物归到这一组
pub const OTHER_FOOD_CATEGORY: &str = "other";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealType::ALL
            .into_iter()
            .find(|meal| meal.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// (user_id, meal_type, entry_date) 唯一
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DietEntry {
    pub id: i64,
    pub user_id: i64,
    pub meal_type: String,
    #[serde(rename = "date")]
    pub entry_date: NaiveDate,
    pub total_calories: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 饮食条目连表食物信息，calories 是写入时的快照
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct DietItemDetail {
    pub id: i64,
    pub diet_entry_id: i64,
    pub food_id: i64,
    pub quantity: f64,
    pub calories: i64,
    pub food_name: String,
    pub food_category: String,
    pub food_unit: String,
    pub food_calories: f64,
    pub food_image: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewDietItem {
    pub food_id: i64,
    pub quantity: f64,
    pub calories: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DietEntryWrite {
    pub entry_id: i64,
    /// false 表示覆盖了已有记录
    pub created: bool,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct DailyCalories {
    pub entry_date: NaiveDate,
    pub total_calories: i64,
}
