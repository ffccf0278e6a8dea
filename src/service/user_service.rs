use crate::dto::auth_dto::{
    LoginReq, LoginRes, RegisterReq, RegisterRes, RegisteredUser, ResetPasswordReq, VerifyRes,
};
use crate::dto::user_dto::{ProfileRes, UpdateProfileReq};
use crate::error::api_error::ApiError;
use crate::error::db_error::DbError;
use crate::error::user_error::UserError;
use crate::model::user::{
    NewUser, ProfileUpdate, User, VerificationCode, WorkoutPlan, ROLE_USER,
};
use crate::repository::user_repository::UserRepositoryTrait;
use crate::repository::verification_code_repository::VerificationCodeRepositoryTrait;
use crate::service::sms_service::SmsSenderTrait;
use crate::service::token_service::TokenService;
use crate::utils::{encrypt, health, validate};
use chrono::{Duration, Utc};
use std::sync::Arc;

/// 账号、验证码和个人资料
#[derive(Clone)]
pub struct UserService {
    user_repo: Arc<dyn UserRepositoryTrait>,
    code_repo: Arc<dyn VerificationCodeRepositoryTrait>,
    token_service: Arc<TokenService>,
    sms_sender: Arc<dyn SmsSenderTrait>,
    code_ttl: Duration,
    /// 开发环境把验证码放进响应里
    expose_code: bool,
}

fn default_user_name(phone: &str) -> String {
    format!("用户{}", phone.get(7..).unwrap_or_default())
}

impl UserService {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryTrait>,
        code_repo: Arc<dyn VerificationCodeRepositoryTrait>,
        token_service: Arc<TokenService>,
        sms_sender: Arc<dyn SmsSenderTrait>,
        code_ttl: Duration,
        expose_code: bool,
    ) -> Self {
        Self {
            user_repo,
            code_repo,
            token_service,
            sms_sender,
            code_ttl,
            expose_code,
        }
    }

    pub async fn send_register_code(&self, phone: &str) -> Result<Option<String>, ApiError> {
        if !validate::is_valid_phone(phone) {
            return Err(UserError::InvalidPhone.into());
        }
        if self.find_by_phone(phone).await?.is_some() {
            return Err(UserError::UserAlreadyExists.into());
        }
        self.issue_code(phone).await
    }

    pub async fn send_reset_code(&self, phone: &str) -> Result<Option<String>, ApiError> {
        if !validate::is_valid_phone(phone) {
            return Err(UserError::InvalidPhone.into());
        }
        if self.find_by_phone(phone).await?.is_none() {
            return Err(UserError::UserNotFound.into());
        }
        self.issue_code(phone).await
    }

    pub async fn register(&self, payload: RegisterReq) -> Result<RegisterRes, ApiError> {
        let phone = payload.phone_number.as_str();
        if !validate::is_valid_phone(phone) {
            return Err(UserError::InvalidPhone.into());
        }
        let code = self
            .check_code(phone, &payload.verification_code)
            .await?;
        if self.find_by_phone(phone).await?.is_some() {
            return Err(UserError::UserAlreadyExists.into());
        }

        let password_hash = encrypt::hash_password(&payload.password)
            .map_err(|err| UserError::PasswordHashError(err.to_string()))?;
        let new_user = NewUser {
            phone: phone.to_string(),
            password_hash,
            name: default_user_name(phone),
            permission_code: ROLE_USER.to_string(),
        };
        let user = self
            .user_repo
            .create_user(&new_user, Utc::now())
            .await
            .map_err(|err| match DbError::from(err) {
                DbError::UniqueConstraintViolation(_) => ApiError::from(UserError::UserAlreadyExists),
                other => {
                    tracing::error!("register - phone:{} | err:{}", phone, other);
                    ApiError::from(other)
                }
            })?;

        let token = self
            .token_service
            .issue_and_persist(user.id, &user.permission_code)
            .await?;
        self.discard_code(&code).await;
        tracing::info!("register - user_id:{}", user.id);

        Ok(RegisterRes {
            token,
            user: RegisteredUser {
                id: user.id,
                name: user.name,
                permission_code: user.permission_code,
                is_first_login: user.is_first_login,
            },
        })
    }

    pub async fn login(&self, payload: LoginReq) -> Result<LoginRes, ApiError> {
        let user = self
            .find_by_phone(&payload.phone_number)
            .await?
            .ok_or(UserError::InvalidPassword)?;
        if !encrypt::verify_password(&payload.password, &user.password) {
            return Err(UserError::InvalidPassword.into());
        }
        let token = self
            .token_service
            .issue_and_persist(user.id, &user.permission_code)
            .await?;
        tracing::info!("login - user_id:{}", user.id);
        Ok(LoginRes {
            token,
            user_id: user.id,
            role: user.permission_code,
            is_first_login: user.is_first_login,
        })
    }

    pub async fn verify(&self, token: &str) -> Result<VerifyRes, ApiError> {
        let claims = self.token_service.validate(token).await?;
        Ok(VerifyRes {
            user_id: claims.sub,
            permission_code: claims.permission_code,
        })
    }

    pub async fn logout(&self, user_id: i64) -> Result<(), ApiError> {
        self.token_service.invalidate(user_id).await
    }

    pub async fn check_user(&self, phone: &str) -> Result<bool, ApiError> {
        if !validate::is_valid_phone(phone) {
            return Err(UserError::InvalidPhone.into());
        }
        Ok(self.find_by_phone(phone).await?.is_some())
    }

    /// 重置成功后旧 token 全部失效
    pub async fn reset_password(&self, payload: ResetPasswordReq) -> Result<(), ApiError> {
        let phone = payload.phone_number.as_str();
        let code = self
            .check_code(phone, &payload.verification_code)
            .await?;
        let user = self
            .find_by_phone(phone)
            .await?
            .ok_or(UserError::UserNotFound)?;

        let password_hash = encrypt::hash_password(&payload.password)
            .map_err(|err| UserError::PasswordHashError(err.to_string()))?;
        let updated = self
            .user_repo
            .update_password(user.id, &password_hash, Utc::now())
            .await
            .map_err(|err| {
                tracing::error!("reset_password - user_id:{} | err:{}", user.id, err);
                DbError::from(err)
            })?;
        if !updated {
            return Err(UserError::UserNotFound.into());
        }
        self.discard_code(&code).await;
        self.token_service.invalidate(user.id).await?;
        tracing::info!("reset_password - user_id:{}", user.id);
        Ok(())
    }

    pub async fn get_profile(&self, user_id: i64) -> Result<ProfileRes, ApiError> {
        let user = self
            .user_repo
            .find_user_by_id(user_id)
            .await
            .map_err(DbError::from)?
            .ok_or(UserError::UserNotFound)?;
        let workout_plan = self
            .user_repo
            .find_workout_plan(user_id)
            .await
            .map_err(DbError::from)?
            .map(|plan| plan.plan);
        Ok(ProfileRes {
            bmi_category: user.bmi.map(health::bmi_category),
            user,
            workout_plan,
        })
    }

    /// 还没有生成过计划时返回 None
    pub async fn get_workout_plan(&self, user_id: i64) -> Result<Option<WorkoutPlan>, ApiError> {
        Ok(self
            .user_repo
            .find_workout_plan(user_id)
            .await
            .map_err(DbError::from)?)
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        payload: UpdateProfileReq,
    ) -> Result<User, ApiError> {
        let bmi = match (payload.height, payload.weight) {
            (Some(height), Some(weight)) => health::calculate_bmi(weight, height),
            _ => None,
        };
        let update = ProfileUpdate {
            name: payload.name,
            gender: payload.gender,
            birthday: payload.birthday,
            height: payload.height,
            weight: payload.weight,
            bmi,
            is_first_login: payload.is_first_login,
        };
        let user = self
            .user_repo
            .update_profile(user_id, &update, Utc::now())
            .await
            .map_err(|err| {
                tracing::error!("update_profile - user_id:{} | err:{}", user_id, err);
                DbError::from(err)
            })?
            .ok_or(UserError::UserNotFound)?;
        Ok(user)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, ApiError> {
        self.user_repo
            .find_user_by_phone(phone)
            .await
            .map_err(|err| {
                tracing::error!("find_by_phone - err:{}", err);
                DbError::from(err).into()
            })
    }

    async fn issue_code(&self, phone: &str) -> Result<Option<String>, ApiError> {
        let code = encrypt::generate_verification_code();
        let now = Utc::now();
        self.code_repo
            .upsert_code(phone, &code, now + self.code_ttl, now)
            .await
            .map_err(|err| {
                tracing::error!("issue_code - err:{}", err);
                DbError::from(err)
            })?;
        self.sms_sender
            .send_code(phone, &code)
            .await
            .map_err(|err| UserError::SmsSendFailed(err.to_string()))?;
        Ok(self.expose_code.then_some(code))
    }

    async fn check_code(&self, phone: &str, code: &str) -> Result<VerificationCode, ApiError> {
        let stored = self
            .code_repo
            .find_code(phone)
            .await
            .map_err(DbError::from)?
            .ok_or(UserError::InvalidVerificationCode)?;
        if stored.code != code || stored.expires_at <= Utc::now() {
            return Err(UserError::InvalidVerificationCode.into());
        }
        Ok(stored)
    }

    async fn discard_code(&self, code: &VerificationCode) {
        if let Err(err) = self.code_repo.delete_code(code.id).await {
            tracing::warn!("discard_code - id:{} | err:{}", code.id, err);
        }
    }
}
