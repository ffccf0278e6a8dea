use crate::model::user::User;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileReq {
    #[validate(length(min = 1, max = 32, message = "name must be between 1 and 32 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 16, message = "gender is too long"))]
    pub gender: Option<String>,
    pub birthday: Option<NaiveDate>,
    /// 厘米
    #[validate(range(min = 50.0, max = 300.0, message = "height must be between 50 and 300"))]
    pub height: Option<f64>,
    /// 公斤
    #[validate(range(min = 10.0, max = 500.0, message = "weight must be between 10 and 500"))]
    pub weight: Option<f64>,
    pub is_first_login: Option<bool>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRes {
    #[serde(flatten)]
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi_category: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_plan: Option<String>,
}
