use crate::db::database::{Database, DatabaseTrait};
use crate::model::user::TokenRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepositoryTrait: Send + Sync {
    /// 按 user_id 写入或替换 token，返回被替换掉的旧 token
    async fn upsert_token(
        &self,
        user_id: i64,
        token: &str,
        expires: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Option<String>, sqlx::Error>;

    async fn find_token(&self, token: &str) -> Result<Option<TokenRecord>, sqlx::Error>;

    async fn find_token_by_user(&self, user_id: i64) -> Result<Option<TokenRecord>, sqlx::Error>;

    /// 返回删除的行数
    async fn delete_tokens_by_user(&self, user_id: i64) -> Result<u64, sqlx::Error>;
}

#[derive(Clone)]
pub struct TokenRepository {
    pub(crate) db_conn: Arc<Database>,
}

impl TokenRepository {
    pub fn new(db_conn: &Arc<Database>) -> Self {
        Self {
            db_conn: Arc::clone(db_conn),
        }
    }
}

#[async_trait]
impl TokenRepositoryTrait for TokenRepository {
    async fn upsert_token(
        &self,
        user_id: i64,
        token: &str,
        expires: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Option<String>, sqlx::Error> {
        let mut tx = self.db_conn.get_master_pool().begin().await?;
        let previous = sqlx::query_scalar::<_, String>(
            "SELECT token FROM tokens WHERE user_id = ? FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        // user_id 上有唯一索引，并发登录时后写入的覆盖先写入的
        sqlx::query(
            "INSERT INTO tokens (token, user_id, expires, created_at)
            VALUES (?, ?, ?, ?)
            ON DUPLICATE KEY
            UPDATE token = VALUES(token), expires = VALUES(expires), created_at = VALUES(created_at)",
        )
        .bind(token)
        .bind(user_id)
        .bind(expires)
        .bind(now)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(previous)
    }

    async fn find_token(&self, token: &str) -> Result<Option<TokenRecord>, sqlx::Error> {
        sqlx::query_as::<_, TokenRecord>(
            "SELECT id, token, user_id, expires, created_at FROM tokens WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(self.db_conn.get_master_pool())
        .await
    }

    async fn find_token_by_user(&self, user_id: i64) -> Result<Option<TokenRecord>, sqlx::Error> {
        sqlx::query_as::<_, TokenRecord>(
            "SELECT id, token, user_id, expires, created_at FROM tokens WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.db_conn.get_master_pool())
        .await
    }

    async fn delete_tokens_by_user(&self, user_id: i64) -> Result<u64, sqlx::Error> {
        let sql_ret = sqlx::query("DELETE FROM tokens WHERE user_id = ?")
            .bind(user_id)
            .execute(self.db_conn.get_master_pool())
            .await?;
        tracing::debug!(
            "delete_tokens_by_user - user_id:{} | rows_affected:{}",
            user_id,
            sql_ret.rows_affected()
        );
        Ok(sql_ret.rows_affected())
    }
}
