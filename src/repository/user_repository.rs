use crate::db::database::{Database, DatabaseTrait};
use crate::model::user::{ExerciseTotals, NewUser, ProfileUpdate, User, WorkoutPlan};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

const USER_COLUMNS: &str = "id, phone, password, name, gender, birthday, height, weight, bmi, \
     avatar, permission_code, is_first_login, total_exercise_seconds, today_exercise_seconds, \
     last_exercise_date, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    async fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>, sqlx::Error>;

    async fn find_user_by_phone(&self, phone: &str) -> Result<Option<User>, sqlx::Error>;

    /// 手机号重复时返回唯一键冲突
    async fn create_user(&self, new_user: &NewUser, now: DateTime<Utc>)
        -> Result<User, sqlx::Error>;

    async fn update_password(
        &self,
        user_id: i64,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error>;

    /// 用户不存在时返回 None
    async fn update_profile(
        &self,
        user_id: i64,
        update: &ProfileUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, sqlx::Error>;

    /// 在数据库端原子累加总运动时长和今日运动时长，返回累加后的值
    async fn add_exercise_seconds(
        &self,
        user_id: i64,
        seconds: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<ExerciseTotals>, sqlx::Error>;

    /// 清零所有用户的今日运动时长，返回受影响行数
    async fn reset_today_exercise_seconds(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error>;

    /// 同一用户有多条时取最近更新的
    async fn find_workout_plan(&self, user_id: i64) -> Result<Option<WorkoutPlan>, sqlx::Error>;
}

#[derive(Clone)]
pub struct UserRepository {
    pub(crate) db_conn: Arc<Database>,
}

impl UserRepository {
    pub fn new(db_conn: &Arc<Database>) -> Self {
        Self {
            db_conn: Arc::clone(db_conn),
        }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(self.db_conn.get_master_pool())
            .await
    }

    async fn find_user_by_phone(&self, phone: &str) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE phone = ?");
        sqlx::query_as::<_, User>(&sql)
            .bind(phone)
            .fetch_optional(self.db_conn.get_master_pool())
            .await
    }

    async fn create_user(
        &self,
        new_user: &NewUser,
        now: DateTime<Utc>,
    ) -> Result<User, sqlx::Error> {
        let sql_ret = sqlx::query(
            "INSERT INTO users (
                phone,
                password,
                name,
                permission_code,
                is_first_login,
                total_exercise_seconds,
                today_exercise_seconds,
                created_at,
                updated_at
            )
            VALUES (?, ?, ?, ?, TRUE, 0, 0, ?, ?)",
        )
        .bind(&new_user.phone)
        .bind(&new_user.password_hash)
        .bind(&new_user.name)
        .bind(&new_user.permission_code)
        .bind(now)
        .bind(now)
        .execute(self.db_conn.get_master_pool())
        .await?;

        let user_id = sql_ret.last_insert_id() as i64;
        tracing::debug!("create_user - user_id:{}", user_id);
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_one(self.db_conn.get_master_pool())
            .await
    }

    async fn update_password(
        &self,
        user_id: i64,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let sql_ret = sqlx::query("UPDATE users SET password = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(now)
            .bind(user_id)
            .execute(self.db_conn.get_master_pool())
            .await?;
        Ok(sql_ret.rows_affected() > 0)
    }

    async fn update_profile(
        &self,
        user_id: i64,
        update: &ProfileUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query(
            "UPDATE users SET
                name = COALESCE(?, name),
                gender = COALESCE(?, gender),
                birthday = COALESCE(?, birthday),
                height = COALESCE(?, height),
                weight = COALESCE(?, weight),
                bmi = COALESCE(?, bmi),
                is_first_login = COALESCE(?, is_first_login),
                updated_at = ?
            WHERE id = ?",
        )
        .bind(&update.name)
        .bind(&update.gender)
        .bind(update.birthday)
        .bind(update.height)
        .bind(update.weight)
        .bind(update.bmi)
        .bind(update.is_first_login)
        .bind(now)
        .bind(user_id)
        .execute(self.db_conn.get_master_pool())
        .await?;

        self.find_user_by_id(user_id).await
    }

    async fn add_exercise_seconds(
        &self,
        user_id: i64,
        seconds: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<ExerciseTotals>, sqlx::Error> {
        let mut tx = self.db_conn.get_master_pool().begin().await?;
        sqlx::query(
            "UPDATE users SET
                total_exercise_seconds = total_exercise_seconds + ?,
                today_exercise_seconds = today_exercise_seconds + ?,
                last_exercise_date = ?,
                updated_at = ?
            WHERE id = ?",
        )
        .bind(seconds)
        .bind(seconds)
        .bind(now)
        .bind(now)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        // 行锁在事务提交前一直持有，这里读到的就是本次累加后的值
        let totals = sqlx::query_as::<_, ExerciseTotals>(
            "SELECT total_exercise_seconds, today_exercise_seconds FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(totals)
    }

    async fn reset_today_exercise_seconds(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let sql_ret = sqlx::query(
            "UPDATE users SET today_exercise_seconds = 0, updated_at = ? WHERE today_exercise_seconds <> 0",
        )
        .bind(now)
        .execute(self.db_conn.get_master_pool())
        .await?;
        Ok(sql_ret.rows_affected())
    }

    async fn find_workout_plan(&self, user_id: i64) -> Result<Option<WorkoutPlan>, sqlx::Error> {
        sqlx::query_as::<_, WorkoutPlan>(
            "SELECT id, user_id, plan, created_at, updated_at FROM workout_plans
            WHERE user_id = ? ORDER BY updated_at DESC, id DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(self.db_conn.get_master_pool())
        .await
    }
}
