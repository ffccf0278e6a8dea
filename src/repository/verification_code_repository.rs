use crate::db::database::{Database, DatabaseTrait};
use crate::model::user::VerificationCode;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationCodeRepositoryTrait: Send + Sync {
    /// 每个手机号只保留最新的验证码
    async fn upsert_code(
        &self,
        phone: &str,
        code: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), sqlx::Error>;

    async fn find_code(&self, phone: &str) -> Result<Option<VerificationCode>, sqlx::Error>;

    async fn delete_code(&self, id: i64) -> Result<(), sqlx::Error>;
}

#[derive(Clone)]
pub struct VerificationCodeRepository {
    pub(crate) db_conn: Arc<Database>,
}

impl VerificationCodeRepository {
    pub fn new(db_conn: &Arc<Database>) -> Self {
        Self {
            db_conn: Arc::clone(db_conn),
        }
    }
}

#[async_trait]
impl VerificationCodeRepositoryTrait for VerificationCodeRepository {
    async fn upsert_code(
        &self,
        phone: &str,
        code: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO verification_codes (phone, code, expires_at, created_at)
            VALUES (?, ?, ?, ?)
            ON DUPLICATE KEY
            UPDATE code = VALUES(code), expires_at = VALUES(expires_at), created_at = VALUES(created_at)",
        )
        .bind(phone)
        .bind(code)
        .bind(expires_at)
        .bind(now)
        .execute(self.db_conn.get_master_pool())
        .await?;
        Ok(())
    }

    async fn find_code(&self, phone: &str) -> Result<Option<VerificationCode>, sqlx::Error> {
        sqlx::query_as::<_, VerificationCode>(
            "SELECT id, phone, code, expires_at, created_at FROM verification_codes WHERE phone = ?",
        )
        .bind(phone)
        .fetch_optional(self.db_conn.get_master_pool())
        .await
    }

    async fn delete_code(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM verification_codes WHERE id = ?")
            .bind(id)
            .execute(self.db_conn.get_master_pool())
            .await?;
        Ok(())
    }
}
