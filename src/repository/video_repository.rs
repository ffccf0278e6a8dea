use crate::db::database::{is_duplicate_entry, Database, DatabaseTrait};
use crate::model::video::{NewVideo, Video};
use crate::repository::placeholders;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

const VIDEO_COLUMNS: &str = "v.id, v.title, v.description, v.video_type, v.cover_image, \
     v.video_url, v.duration, v.like_count, v.uploaded_at, v.updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoRepositoryTrait: Send + Sync {
    async fn find_video(&self, video_id: i64) -> Result<Option<Video>, sqlx::Error>;

    /// 按上传时间倒序分页
    async fn list_videos(
        &self,
        video_type: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Video>, sqlx::Error>;

    async fn count_videos(&self, video_type: &str) -> Result<i64, sqlx::Error>;

    async fn create_video(
        &self,
        new_video: &NewVideo,
        now: DateTime<Utc>,
    ) -> Result<Video, sqlx::Error>;

    /// 返回 video_ids 中被该用户点赞过的
    async fn liked_video_ids(
        &self,
        user_id: i64,
        video_ids: &[i64],
    ) -> Result<Vec<i64>, sqlx::Error>;

    /// 返回 video_ids 中被该用户收藏过的
    async fn favorite_video_ids(
        &self,
        user_id: i64,
        video_ids: &[i64],
    ) -> Result<Vec<i64>, sqlx::Error>;

    /// 已经点过赞时返回 false
    async fn insert_like(
        &self,
        user_id: i64,
        video_id: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error>;

    /// 没有点赞记录时返回 false
    async fn delete_like(&self, user_id: i64, video_id: i64) -> Result<bool, sqlx::Error>;

    async fn count_likes(&self, video_id: i64) -> Result<i64, sqlx::Error>;

    /// 已经收藏过时返回 false
    async fn insert_favorite(
        &self,
        user_id: i64,
        video_id: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error>;

    async fn delete_favorite(&self, user_id: i64, video_id: i64) -> Result<bool, sqlx::Error>;

    /// 按收藏时间倒序分页
    async fn list_favorite_videos(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Video>, sqlx::Error>;

    async fn count_favorites(&self, user_id: i64) -> Result<i64, sqlx::Error>;
}

#[derive(Clone)]
pub struct VideoRepository {
    pub(crate) db_conn: Arc<Database>,
}

impl VideoRepository {
    pub fn new(db_conn: &Arc<Database>) -> Self {
        Self {
            db_conn: Arc::clone(db_conn),
        }
    }

    async fn relation_video_ids(
        &self,
        table_name: &str,
        user_id: i64,
        video_ids: &[i64],
    ) -> Result<Vec<i64>, sqlx::Error> {
        if video_ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!(
            "SELECT video_id FROM {table_name} WHERE user_id = ? AND video_id IN ({})",
            placeholders(video_ids.len())
        );
        let mut query = sqlx::query_scalar::<_, i64>(&sql).bind(user_id);
        for video_id in video_ids {
            query = query.bind(*video_id);
        }
        query.fetch_all(self.db_conn.get_master_pool()).await
    }
}

#[async_trait]
impl VideoRepositoryTrait for VideoRepository {
    async fn find_video(&self, video_id: i64) -> Result<Option<Video>, sqlx::Error> {
        let sql = format!("SELECT {VIDEO_COLUMNS} FROM videos v WHERE v.id = ?");
        sqlx::query_as::<_, Video>(&sql)
            .bind(video_id)
            .fetch_optional(self.db_conn.get_master_pool())
            .await
    }

    async fn list_videos(
        &self,
        video_type: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Video>, sqlx::Error> {
        let sql = format!(
            "SELECT {VIDEO_COLUMNS} FROM videos v WHERE v.video_type = ? ORDER BY v.uploaded_at DESC, v.id DESC LIMIT ?, ?"
        );
        sqlx::query_as::<_, Video>(&sql)
            .bind(video_type)
            .bind(offset)
            .bind(limit)
            .fetch_all(self.db_conn.get_slave_pool())
            .await
    }

    async fn count_videos(&self, video_type: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM videos WHERE video_type = ?")
            .bind(video_type)
            .fetch_one(self.db_conn.get_slave_pool())
            .await
    }

    async fn create_video(
        &self,
        new_video: &NewVideo,
        now: DateTime<Utc>,
    ) -> Result<Video, sqlx::Error> {
        let sql_ret = sqlx::query(
            "INSERT INTO videos (title, description, video_type, cover_image, video_url, duration, like_count, uploaded_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?)",
        )
        .bind(&new_video.title)
        .bind(&new_video.description)
        .bind(&new_video.video_type)
        .bind(&new_video.cover_image)
        .bind(&new_video.video_url)
        .bind(new_video.duration)
        .bind(now)
        .bind(now)
        .execute(self.db_conn.get_master_pool())
        .await?;

        let sql = format!("SELECT {VIDEO_COLUMNS} FROM videos v WHERE v.id = ?");
        sqlx::query_as::<_, Video>(&sql)
            .bind(sql_ret.last_insert_id() as i64)
            .fetch_one(self.db_conn.get_master_pool())
            .await
    }

    async fn liked_video_ids(
        &self,
        user_id: i64,
        video_ids: &[i64],
    ) -> Result<Vec<i64>, sqlx::Error> {
        self.relation_video_ids("video_likes", user_id, video_ids)
            .await
    }

    async fn favorite_video_ids(
        &self,
        user_id: i64,
        video_ids: &[i64],
    ) -> Result<Vec<i64>, sqlx::Error> {
        self.relation_video_ids("favorites", user_id, video_ids)
            .await
    }

    async fn insert_like(
        &self,
        user_id: i64,
        video_id: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.db_conn.get_master_pool().begin().await?;
        let inserted = sqlx::query(
            "INSERT INTO video_likes (user_id, video_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(video_id)
        .bind(now)
        .execute(&mut *tx)
        .await;
        match inserted {
            Ok(_) => {}
            // (user_id, video_id) 唯一
            Err(err) if is_duplicate_entry(&err) => return Ok(false),
            Err(err) => return Err(err),
        }
        sqlx::query("UPDATE videos SET like_count = like_count + 1 WHERE id = ?")
            .bind(video_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn delete_like(&self, user_id: i64, video_id: i64) -> Result<bool, sqlx::Error> {
        let mut tx = self.db_conn.get_master_pool().begin().await?;
        let sql_ret = sqlx::query("DELETE FROM video_likes WHERE user_id = ? AND video_id = ?")
            .bind(user_id)
            .bind(video_id)
            .execute(&mut *tx)
            .await?;
        if sql_ret.rows_affected() == 0 {
            return Ok(false);
        }
        sqlx::query("UPDATE videos SET like_count = GREATEST(like_count - 1, 0) WHERE id = ?")
            .bind(video_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn count_likes(&self, video_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM video_likes WHERE video_id = ?")
            .bind(video_id)
            .fetch_one(self.db_conn.get_master_pool())
            .await
    }

    async fn insert_favorite(
        &self,
        user_id: i64,
        video_id: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let inserted = sqlx::query(
            "INSERT INTO favorites (user_id, video_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(video_id)
        .bind(now)
        .execute(self.db_conn.get_master_pool())
        .await;
        match inserted {
            Ok(_) => Ok(true),
            Err(err) if is_duplicate_entry(&err) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn delete_favorite(&self, user_id: i64, video_id: i64) -> Result<bool, sqlx::Error> {
        let sql_ret = sqlx::query("DELETE FROM favorites WHERE user_id = ? AND video_id = ?")
            .bind(user_id)
            .bind(video_id)
            .execute(self.db_conn.get_master_pool())
            .await?;
        Ok(sql_ret.rows_affected() > 0)
    }

    async fn list_favorite_videos(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Video>, sqlx::Error> {
        let sql = format!(
            "SELECT {VIDEO_COLUMNS} FROM favorites f
            JOIN videos v ON v.id = f.video_id
            WHERE f.user_id = ?
            ORDER BY f.created_at DESC, f.id DESC
            LIMIT ?, ?"
        );
        sqlx::query_as::<_, Video>(&sql)
            .bind(user_id)
            .bind(offset)
            .bind(limit)
            .fetch_all(self.db_conn.get_master_pool())
            .await
    }

    async fn count_favorites(&self, user_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM favorites f JOIN videos v ON v.id = f.video_id WHERE f.user_id = ?",
        )
        .bind(user_id)
        .fetch_one(self.db_conn.get_master_pool())
        .await
    }
}
