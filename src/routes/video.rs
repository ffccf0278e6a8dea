use crate::handler::{play_record_handler, video_handler};
use crate::middleware::auth as auth_middleware;
use crate::state::video_state::VideoState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub fn routes() -> Router<VideoState> {
    Router::new()
        .route("/videos", get(video_handler::list_videos))
        // 静态路径优先于 /videos/:id 匹配
        .route(
            "/videos/like",
            post(video_handler::like).delete(video_handler::unlike),
        )
        .route(
            "/videos/favorite",
            post(video_handler::favorite).delete(video_handler::unfavorite),
        )
        .route(
            "/videos/upload",
            post(video_handler::upload_video)
                .layer(middleware::from_fn(auth_middleware::require_admin)),
        )
        .route("/videos/:id", get(video_handler::get_video))
        .route("/favorites", get(video_handler::list_favorites))
        .route(
            "/playrecords",
            get(play_record_handler::list_play_records)
                .post(play_record_handler::report_playback),
        )
}
