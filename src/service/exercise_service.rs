use crate::dto::page_dto::{PageParams, Pagination};
use crate::dto::play_record_dto::{PlayRecordPageRes, PlayRecordRes, PlaybackReportRes};
use crate::error::api_error::ApiError;
use crate::error::db_error::DbError;
use crate::error::request_error::RequestError;
use crate::error::user_error::UserError;
use crate::error::video_error::VideoError;
use crate::repository::play_record_repository::PlayRecordRepositoryTrait;
use crate::repository::user_repository::UserRepositoryTrait;
use crate::repository::video_repository::VideoRepositoryTrait;
use crate::utils::date;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

/// 播放记录和用户运动时长
///
/// 播放记录的累加和用户两个计数器的累加都在数据库端完成，并发上报
/// 不会丢失增量。
#[derive(Clone)]
pub struct ExerciseService {
    video_repo: Arc<dyn VideoRepositoryTrait>,
    play_record_repo: Arc<dyn PlayRecordRepositoryTrait>,
    user_repo: Arc<dyn UserRepositoryTrait>,
}

impl ExerciseService {
    pub fn new(
        video_repo: Arc<dyn VideoRepositoryTrait>,
        play_record_repo: Arc<dyn PlayRecordRepositoryTrait>,
        user_repo: Arc<dyn UserRepositoryTrait>,
    ) -> Self {
        Self {
            video_repo,
            play_record_repo,
            user_repo,
        }
    }

    /// 上报本次新增的观看秒数，记到本地时区的今天
    pub async fn report_playback(
        &self,
        user_id: i64,
        video_id: i64,
        watched_seconds: i64,
    ) -> Result<PlaybackReportRes, ApiError> {
        self.report_playback_on(user_id, video_id, watched_seconds, date::local_today())
            .await
    }

    pub async fn report_playback_on(
        &self,
        user_id: i64,
        video_id: i64,
        watched_seconds: i64,
        play_date: NaiveDate,
    ) -> Result<PlaybackReportRes, ApiError> {
        if watched_seconds < 0 {
            return Err(RequestError::CommonError(
                "watchedTime must not be negative".to_string(),
            )
            .into());
        }
        self.video_repo
            .find_video(video_id)
            .await
            .map_err(DbError::from)?
            .ok_or(VideoError::VideoNotFound(video_id))?;

        let now = Utc::now();
        let record = self
            .play_record_repo
            .accumulate_play_record(user_id, video_id, play_date, watched_seconds, now)
            .await
            .map_err(|err| {
                tracing::error!(
                    "report_playback - user_id:{} | video_id:{} | err:{}",
                    user_id,
                    video_id,
                    err
                );
                DbError::from(err)
            })?;
        let totals = self
            .user_repo
            .add_exercise_seconds(user_id, watched_seconds, now)
            .await
            .map_err(|err| {
                tracing::error!("report_playback - user_id:{} | err:{}", user_id, err);
                DbError::from(err)
            })?
            .ok_or(UserError::UserNotFound)?;

        tracing::debug!(
            "report_playback - user_id:{} | video_id:{} | seconds:{} | today:{}",
            user_id,
            video_id,
            watched_seconds,
            totals.today_exercise_seconds
        );
        Ok(PlaybackReportRes {
            id: record.id,
            watched_time: record.watched_time,
            total_exercise_seconds: totals.total_exercise_seconds,
            today_exercise_seconds: totals.today_exercise_seconds,
        })
    }

    pub async fn list_play_records(
        &self,
        user_id: i64,
        play_date: Option<NaiveDate>,
        params: PageParams,
    ) -> Result<PlayRecordPageRes, ApiError> {
        let play_date = play_date.unwrap_or_else(date::local_today);
        let records = self
            .play_record_repo
            .list_play_records(user_id, play_date, params.offset(), params.limit)
            .await
            .map_err(DbError::from)?;
        let total = self
            .play_record_repo
            .count_play_records(user_id, play_date)
            .await
            .map_err(DbError::from)?;
        Ok(PlayRecordPageRes {
            records: records.into_iter().map(PlayRecordRes::from).collect(),
            pagination: Pagination::new(params, total),
        })
    }

    /// 每天零点清零所有用户的今日运动时长
    pub async fn reset_today_exercise(&self) -> Result<u64, ApiError> {
        let affected = self
            .user_repo
            .reset_today_exercise_seconds(Utc::now())
            .await
            .map_err(|err| {
                tracing::error!("reset_today_exercise - err:{}", err);
                DbError::from(err)
            })?;
        tracing::info!("reset_today_exercise - affected:{}", affected);
        Ok(affected)
    }
}
