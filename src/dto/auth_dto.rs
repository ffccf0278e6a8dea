//! 注册、登录、验证码相关的请求和响应

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PhoneQuery {
    #[validate(custom(function = "crate::utils::validate::validate_phone"))]
    pub phone_number: String,
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterReq {
    #[validate(custom(function = "crate::utils::validate::validate_phone"))]
    pub phone_number: String,
    #[validate(length(
        min = 6,
        max = 64,
        message = "password must be between 6 and 64 characters"
    ))]
    pub password: String,
    #[validate(length(equal = 6, message = "verification code must be 6 digits"))]
    pub verification_code: String,
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginReq {
    #[validate(length(min = 1, message = "phone number is required"))]
    pub phone_number: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordReq {
    #[validate(custom(function = "crate::utils::validate::validate_phone"))]
    pub phone_number: String,
    #[validate(length(equal = 6, message = "verification code must be 6 digits"))]
    pub verification_code: String,
    #[validate(length(
        min = 6,
        max = 64,
        message = "password must be between 6 and 64 characters"
    ))]
    pub password: String,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct VerifyReq {
    #[validate(length(min = 1, message = "token is required"))]
    pub token: String,
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LogoutReq {
    #[validate(range(min = 1, message = "userId is required"))]
    pub user_id: i64,
}

/// 仅开发环境返回验证码
#[derive(Clone, Debug, Default, Serialize)]
pub struct SendCodeRes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub id: i64,
    pub name: Option<String>,
    pub permission_code: String,
    pub is_first_login: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct RegisterRes {
    pub token: String,
    pub user: RegisteredUser,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRes {
    pub token: String,
    pub user_id: i64,
    pub role: String,
    pub is_first_login: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRes {
    pub user_id: i64,
    pub permission_code: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct CheckUserRes {
    pub exists: bool,
}
