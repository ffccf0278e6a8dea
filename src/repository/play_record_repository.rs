use crate::db::database::{Database, DatabaseTrait};
use crate::model::video::{PlayRecord, PlayRecordDetail};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayRecordRepositoryTrait: Send + Sync {
    /// 当天没有记录时创建，有记录时在数据库端原子累加 watched_time
    async fn accumulate_play_record(
        &self,
        user_id: i64,
        video_id: i64,
        play_date: NaiveDate,
        watched_seconds: i64,
        now: DateTime<Utc>,
    ) -> Result<PlayRecord, sqlx::Error>;

    /// 某一天的播放记录，按创建时间倒序分页
    async fn list_play_records(
        &self,
        user_id: i64,
        play_date: NaiveDate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<PlayRecordDetail>, sqlx::Error>;

    async fn count_play_records(
        &self,
        user_id: i64,
        play_date: NaiveDate,
    ) -> Result<i64, sqlx::Error>;
}

#[derive(Clone)]
pub struct PlayRecordRepository {
    pub(crate) db_conn: Arc<Database>,
}

impl PlayRecordRepository {
    pub fn new(db_conn: &Arc<Database>) -> Self {
        Self {
            db_conn: Arc::clone(db_conn),
        }
    }
}

#[async_trait]
impl PlayRecordRepositoryTrait for PlayRecordRepository {
    async fn accumulate_play_record(
        &self,
        user_id: i64,
        video_id: i64,
        play_date: NaiveDate,
        watched_seconds: i64,
        now: DateTime<Utc>,
    ) -> Result<PlayRecord, sqlx::Error> {
        let mut tx = self.db_conn.get_master_pool().begin().await?;
        // (user_id, video_id, play_date) 唯一，并发上报不会丢失增量
        sqlx::query(
            "INSERT INTO play_records (
                user_id,
                video_id,
                play_date,
                watched_time,
                created_at,
                updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY
            UPDATE watched_time = watched_time + VALUES(watched_time), updated_at = VALUES(updated_at)",
        )
        .bind(user_id)
        .bind(video_id)
        .bind(play_date)
        .bind(watched_seconds)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let record = sqlx::query_as::<_, PlayRecord>(
            "SELECT id, user_id, video_id, play_date, watched_time, created_at, updated_at
            FROM play_records
            WHERE user_id = ? AND video_id = ? AND play_date = ?",
        )
        .bind(user_id)
        .bind(video_id)
        .bind(play_date)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(record)
    }

    async fn list_play_records(
        &self,
        user_id: i64,
        play_date: NaiveDate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<PlayRecordDetail>, sqlx::Error> {
        sqlx::query_as::<_, PlayRecordDetail>(
            "SELECT
                p.id,
                p.video_id,
                p.play_date,
                p.watched_time,
                p.created_at,
                p.updated_at,
                v.title AS video_title,
                v.cover_image AS video_cover_image,
                v.video_type AS video_type
            FROM play_records p
            JOIN videos v ON v.id = p.video_id
            WHERE p.user_id = ? AND p.play_date = ?
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT ?, ?",
        )
        .bind(user_id)
        .bind(play_date)
        .bind(offset)
        .bind(limit)
        .fetch_all(self.db_conn.get_master_pool())
        .await
    }

    async fn count_play_records(
        &self,
        user_id: i64,
        play_date: NaiveDate,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM play_records WHERE user_id = ? AND play_date = ?",
        )
        .bind(user_id)
        .bind(play_date)
        .fetch_one(self.db_conn.get_master_pool())
        .await
    }
}
