//! 视频与播放记录
//!
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub video_type: String,
    pub cover_image: String,
    pub video_url: String,
    /// 秒
    pub duration: i32,
    pub like_count: i64,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 上传时允许的视频类型
pub const VIDEO_TYPES: [&str; 2] = ["workout", "yoga"];

#[derive(Clone, Debug)]
pub struct NewVideo {
    pub title: String,
    pub description: Option<String>,
    pub video_type: String,
    pub cover_image: String,
    pub video_url: String,
    pub duration: i32,
}

/// (user_id, video_id, play_date) 唯一
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlayRecord {
    pub id: i64,
    pub user_id: i64,
    pub video_id: i64,
    pub play_date: NaiveDate,
    pub watched_time: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 播放记录连表视频基础信息
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct PlayRecordDetail {
    pub id: i64,
    pub video_id: i64,
    pub play_date: NaiveDate,
    pub watched_time: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub video_title: String,
    pub video_cover_image: String,
    pub video_type: String,
}
