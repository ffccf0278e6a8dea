use crate::dto::page_dto::{PageParams, Pagination};
use crate::dto::video_dto::{FavoriteRes, LikeRes, UploadVideoReq, VideoPageRes, VideoRes};
use crate::error::api_error::ApiError;
use crate::error::db_error::DbError;
use crate::error::video_error::VideoError;
use crate::model::video::{NewVideo, Video, VIDEO_TYPES};
use crate::repository::video_repository::VideoRepositoryTrait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Clone)]
pub struct VideoService {
    video_repo: Arc<dyn VideoRepositoryTrait>,
}

impl VideoService {
    pub fn new(video_repo: Arc<dyn VideoRepositoryTrait>) -> Self {
        Self { video_repo }
    }

    pub async fn list_videos(
        &self,
        user_id: Option<i64>,
        video_type: &str,
        params: PageParams,
    ) -> Result<VideoPageRes, ApiError> {
        let videos = self
            .video_repo
            .list_videos(video_type, params.offset(), params.limit)
            .await
            .map_err(DbError::from)?;
        let total = self
            .video_repo
            .count_videos(video_type)
            .await
            .map_err(DbError::from)?;
        Ok(VideoPageRes {
            videos: self.with_user_flags(user_id, videos).await?,
            pagination: Pagination::new(params, total),
        })
    }

    pub async fn get_video(&self, user_id: Option<i64>, video_id: i64) -> Result<VideoRes, ApiError> {
        let video = self.find_video(video_id).await?;
        let mut videos = self.with_user_flags(user_id, vec![video]).await?;
        videos.pop().ok_or_else(|| VideoError::VideoNotFound(video_id).into())
    }

    /// 只登记已经上传到对象存储的视频地址
    pub async fn create_video(&self, payload: UploadVideoReq) -> Result<Video, ApiError> {
        if !VIDEO_TYPES.contains(&payload.video_type.as_str()) {
            return Err(VideoError::UnsupportedVideoType(payload.video_type).into());
        }
        let new_video = NewVideo {
            title: payload.title,
            description: payload.description.filter(|text| !text.is_empty()),
            video_type: payload.video_type,
            cover_image: payload.cover_image,
            video_url: payload.video_url,
            duration: payload.duration,
        };
        let video = self
            .video_repo
            .create_video(&new_video, Utc::now())
            .await
            .map_err(|err| {
                tracing::error!("create_video - title:{} | err:{}", new_video.title, err);
                DbError::from(err)
            })?;
        tracing::info!("create_video - id:{} | type:{}", video.id, video.video_type);
        Ok(video)
    }

    pub async fn like(&self, user_id: i64, video_id: i64) -> Result<LikeRes, ApiError> {
        self.find_video(video_id).await?;
        let inserted = self
            .video_repo
            .insert_like(user_id, video_id, Utc::now())
            .await
            .map_err(DbError::from)?;
        if !inserted {
            return Err(VideoError::AlreadyLiked.into());
        }
        Ok(LikeRes {
            is_liked: true,
            like_count: self.like_count(video_id).await?,
        })
    }

    /// 没点过赞时也返回成功
    pub async fn unlike(&self, user_id: i64, video_id: i64) -> Result<LikeRes, ApiError> {
        self.find_video(video_id).await?;
        let removed = self
            .video_repo
            .delete_like(user_id, video_id)
            .await
            .map_err(DbError::from)?;
        tracing::debug!(
            "unlike - user_id:{} | video_id:{} | removed:{}",
            user_id,
            video_id,
            removed
        );
        Ok(LikeRes {
            is_liked: false,
            like_count: self.like_count(video_id).await?,
        })
    }

    pub async fn favorite(&self, user_id: i64, video_id: i64) -> Result<FavoriteRes, ApiError> {
        self.find_video(video_id).await?;
        let inserted = self
            .video_repo
            .insert_favorite(user_id, video_id, Utc::now())
            .await
            .map_err(DbError::from)?;
        if !inserted {
            return Err(VideoError::AlreadyFavorited.into());
        }
        Ok(FavoriteRes { is_favorite: true })
    }

    pub async fn unfavorite(&self, user_id: i64, video_id: i64) -> Result<FavoriteRes, ApiError> {
        self.video_repo
            .delete_favorite(user_id, video_id)
            .await
            .map_err(DbError::from)?;
        Ok(FavoriteRes { is_favorite: false })
    }

    pub async fn list_favorites(
        &self,
        user_id: i64,
        params: PageParams,
    ) -> Result<VideoPageRes, ApiError> {
        let videos = self
            .video_repo
            .list_favorite_videos(user_id, params.offset(), params.limit)
            .await
            .map_err(DbError::from)?;
        let total = self
            .video_repo
            .count_favorites(user_id)
            .await
            .map_err(DbError::from)?;
        Ok(VideoPageRes {
            videos: self.with_user_flags(Some(user_id), videos).await?,
            pagination: Pagination::new(params, total),
        })
    }

    async fn find_video(&self, video_id: i64) -> Result<Video, ApiError> {
        self.video_repo
            .find_video(video_id)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| VideoError::VideoNotFound(video_id).into())
    }

    async fn like_count(&self, video_id: i64) -> Result<i64, ApiError> {
        Ok(self
            .video_repo
            .count_likes(video_id)
            .await
            .map_err(DbError::from)?)
    }

    // 未登录时 isLiked / isFavorite 都是 false
    async fn with_user_flags(
        &self,
        user_id: Option<i64>,
        videos: Vec<Video>,
    ) -> Result<Vec<VideoRes>, ApiError> {
        let (liked, favorite) = match user_id {
            Some(user_id) if !videos.is_empty() => {
                let ids: Vec<i64> = videos.iter().map(|video| video.id).collect();
                let liked: HashSet<i64> = self
                    .video_repo
                    .liked_video_ids(user_id, &ids)
                    .await
                    .map_err(DbError::from)?
                    .into_iter()
                    .collect();
                let favorite: HashSet<i64> = self
                    .video_repo
                    .favorite_video_ids(user_id, &ids)
                    .await
                    .map_err(DbError::from)?
                    .into_iter()
                    .collect();
                (liked, favorite)
            }
            _ => Default::default(),
        };
        Ok(videos
            .into_iter()
            .map(|video| VideoRes {
                is_liked: liked.contains(&video.id),
                is_favorite: favorite.contains(&video.id),
                video,
            })
            .collect())
    }
}
