use crate::dto::page_dto::Pagination;
use crate::model::video::PlayRecordDetail;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportPlaybackReq {
    #[validate(range(min = 1, message = "videoId is required"))]
    pub video_id: i64,
    /// 本次新增的观看秒数
    #[validate(range(min = 0, message = "watchedTime must not be negative"))]
    pub watched_time: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackReportRes {
    pub id: i64,
    /// 该视频今天累计观看秒数
    pub watched_time: i64,
    pub total_exercise_seconds: i64,
    pub today_exercise_seconds: i64,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct PlayRecordQuery {
    pub date: Option<String>,
    #[validate(range(min = 1, message = "page must be positive"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayRecordVideo {
    pub id: i64,
    pub title: String,
    pub cover_image: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayRecordRes {
    pub id: i64,
    pub play_date: NaiveDate,
    pub watched_time: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub video: PlayRecordVideo,
}

impl From<PlayRecordDetail> for PlayRecordRes {
    fn from(detail: PlayRecordDetail) -> Self {
        Self {
            id: detail.id,
            play_date: detail.play_date,
            watched_time: detail.watched_time,
            created_at: detail.created_at,
            updated_at: detail.updated_at,
            video: PlayRecordVideo {
                id: detail.video_id,
                title: detail.video_title,
                cover_image: detail.video_cover_image,
                video_type: detail.video_type,
            },
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayRecordPageRes {
    pub records: Vec<PlayRecordRes>,
    pub pagination: Pagination,
}
