use axum_macros::debug_handler;
use crate::dto::page_dto::PageParams;
use crate::dto::video_dto::{
    FavoriteListQuery, FavoriteRes, LikeRes, UploadVideoReq, VideoActionReq, VideoListQuery,
    VideoPageRes, VideoRes,
};
use crate::error::api_error::ApiError;
use crate::error::request_error::{ValidatedQuery, ValidatedRequest};
use crate::middleware::auth::CurrentUser;
use crate::model::video::Video;
use crate::response::api_response::ApiSuccessResponse;
use crate::state::video_state::VideoState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

pub async fn list_videos(
    State(state): State<VideoState>,
    current_user: CurrentUser,
    ValidatedQuery(query): ValidatedQuery<VideoListQuery>,
) -> Result<Json<ApiSuccessResponse<VideoPageRes>>, ApiError> {
    let res = state
        .video_service
        .list_videos(
            Some(current_user.user_id),
            &query.video_type,
            PageParams::new(query.page, query.limit),
        )
        .await?;
    Ok(Json(ApiSuccessResponse::send(res)))
}

pub async fn get_video(
    State(state): State<VideoState>,
    current_user: CurrentUser,
    Path(video_id): Path<i64>,
) -> Result<Json<ApiSuccessResponse<VideoRes>>, ApiError> {
    let res = state
        .video_service
        .get_video(Some(current_user.user_id), video_id)
        .await?;
    Ok(Json(ApiSuccessResponse::send(res)))
}

/// 路由上挂了 require_admin
pub async fn upload_video(
    State(state): State<VideoState>,
    ValidatedRequest(payload): ValidatedRequest<UploadVideoReq>,
) -> Result<(StatusCode, Json<ApiSuccessResponse<Video>>), ApiError> {
    let video = state.video_service.create_video(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiSuccessResponse::send_with_message("video uploaded", video)),
    ))
}

#[debug_handler]
pub async fn like(
    State(state): State<VideoState>,
    current_user: CurrentUser,
    ValidatedRequest(payload): ValidatedRequest<VideoActionReq>,
) -> Result<Json<ApiSuccessResponse<LikeRes>>, ApiError> {
    let res = state
        .video_service
        .like(current_user.user_id, payload.video_id)
        .await?;
    Ok(Json(ApiSuccessResponse::send(res)))
}

pub async fn unlike(
    State(state): State<VideoState>,
    current_user: CurrentUser,
    ValidatedRequest(payload): ValidatedRequest<VideoActionReq>,
) -> Result<Json<ApiSuccessResponse<LikeRes>>, ApiError> {
    let res = state
        .video_service
        .unlike(current_user.user_id, payload.video_id)
        .await?;
    Ok(Json(ApiSuccessResponse::send(res)))
}

#[debug_handler]
pub async fn favorite(
    State(state): State<VideoState>,
    current_user: CurrentUser,
    ValidatedRequest(payload): ValidatedRequest<VideoActionReq>,
) -> Result<Json<ApiSuccessResponse<FavoriteRes>>, ApiError> {
    let res = state
        .video_service
        .favorite(current_user.user_id, payload.video_id)
        .await?;
    Ok(Json(ApiSuccessResponse::send(res)))
}

pub async fn unfavorite(
    State(state): State<VideoState>,
    current_user: CurrentUser,
    ValidatedRequest(payload): ValidatedRequest<VideoActionReq>,
) -> Result<Json<ApiSuccessResponse<FavoriteRes>>, ApiError> {
    let res = state
        .video_service
        .unfavorite(current_user.user_id, payload.video_id)
        .await?;
    Ok(Json(ApiSuccessResponse::send(res)))
}

pub async fn list_favorites(
    State(state): State<VideoState>,
    current_user: CurrentUser,
    ValidatedQuery(query): ValidatedQuery<FavoriteListQuery>,
) -> Result<Json<ApiSuccessResponse<VideoPageRes>>, ApiError> {
    let res = state
        .video_service
        .list_favorites(
            current_user.user_id,
            PageParams::new(query.page, query.limit),
        )
        .await?;
    Ok(Json(ApiSuccessResponse::send(res)))
}
