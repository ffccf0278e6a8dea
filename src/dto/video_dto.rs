use crate::dto::page_dto::Pagination;
use crate::model::video::Video;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct VideoListQuery {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 32, message = "type is required"))]
    pub video_type: String,
    #[validate(range(min = 1, message = "page must be positive"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct FavoriteListQuery {
    #[validate(range(min = 1, message = "page must be positive"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VideoActionReq {
    #[validate(range(min = 1, message = "videoId is required"))]
    pub video_id: i64,
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadVideoReq {
    #[validate(length(min = 1, max = 128, message = "title must be between 1 and 128 characters"))]
    pub title: String,
    #[validate(length(max = 1024, message = "description is too long"))]
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 32, message = "type is required"))]
    pub video_type: String,
    #[validate(length(min = 1, max = 512, message = "coverImage is required"))]
    pub cover_image: String,
    #[validate(length(min = 1, max = 512, message = "videoUrl is required"))]
    pub video_url: String,
    /// 秒
    #[validate(range(min = 1, max = 86400, message = "duration must be between 1 and 86400 seconds"))]
    pub duration: i32,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRes {
    #[serde(flatten)]
    pub video: Video,
    pub is_liked: bool,
    pub is_favorite: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct VideoPageRes {
    pub videos: Vec<VideoRes>,
    pub pagination: Pagination,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRes {
    pub is_liked: bool,
    pub like_count: i64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRes {
    pub is_favorite: bool,
}
