//! 用户、token、验证码的数据模型
//!
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub birthday: Option<NaiveDate>,
    /// 厘米
    pub height: Option<f64>,
    /// 公斤
    pub weight: Option<f64>,
    pub bmi: Option<f64>,
    pub avatar: Option<String>,
    pub permission_code: String,
    pub is_first_login: bool,
    pub total_exercise_seconds: i64,
    /// 每天零点由定时任务清零
    pub today_exercise_seconds: i64,
    pub last_exercise_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub phone: String,
    pub password_hash: String,
    pub name: String,
    pub permission_code: String,
}

/// 只更新 Some 的字段
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub bmi: Option<f64>,
    pub is_first_login: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseTotals {
    pub total_exercise_seconds: i64,
    pub today_exercise_seconds: i64,
}

/// 生成的计划文本只读
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub id: i64,
    pub user_id: i64,
    pub plan: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 每个用户最多一条
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct TokenRecord {
    pub id: i64,
    pub token: String,
    pub user_id: i64,
    pub expires: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// 每个手机号只保留最新的一条
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct VerificationCode {
    pub id: i64,
    pub phone: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
