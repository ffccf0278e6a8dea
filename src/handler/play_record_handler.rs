use axum_macros::debug_handler;
use super::parse_date_param;
use crate::dto::page_dto::PageParams;
use crate::dto::play_record_dto::{
    PlayRecordPageRes, PlayRecordQuery, PlaybackReportRes, ReportPlaybackReq,
};
use crate::error::api_error::ApiError;
use crate::error::request_error::{ValidatedQuery, ValidatedRequest};
use crate::middleware::auth::CurrentUser;
use crate::response::api_response::ApiSuccessResponse;
use crate::state::video_state::VideoState;
use axum::{extract::State, Json};

#[debug_handler]
pub async fn report_playback(
    State(state): State<VideoState>,
    current_user: CurrentUser,
    ValidatedRequest(payload): ValidatedRequest<ReportPlaybackReq>,
) -> Result<Json<ApiSuccessResponse<PlaybackReportRes>>, ApiError> {
    let res = state
        .exercise_service
        .report_playback(current_user.user_id, payload.video_id, payload.watched_time)
        .await?;
    Ok(Json(ApiSuccessResponse::send(res)))
}

pub async fn list_play_records(
    State(state): State<VideoState>,
    current_user: CurrentUser,
    ValidatedQuery(query): ValidatedQuery<PlayRecordQuery>,
) -> Result<Json<ApiSuccessResponse<PlayRecordPageRes>>, ApiError> {
    let play_date = parse_date_param(query.date.as_deref())?;
    let res = state
        .exercise_service
        .list_play_records(
            current_user.user_id,
            play_date,
            PageParams::new(query.page, query.limit),
        )
        .await?;
    Ok(Json(ApiSuccessResponse::send(res)))
}
