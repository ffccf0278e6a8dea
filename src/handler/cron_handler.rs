use crate::error::{api_error::ApiError, user_error::UserError};
use crate::response::api_response::ApiSuccessResponse;
use crate::state::cron_state::CronState;
use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;

pub const CRON_SECRET_HEADER: &str = "x-cron-secret";

#[derive(Clone, Debug, Serialize)]
pub struct ResetExerciseRes {
    pub affected: u64,
}

/// 给外部调度器用的手动触发入口
pub async fn reset_exercise(
    State(state): State<CronState>,
    headers: HeaderMap,
) -> Result<Json<ApiSuccessResponse<ResetExerciseRes>>, ApiError> {
    if let Some(secret) = &state.cron_secret {
        let provided = headers
            .get(CRON_SECRET_HEADER)
            .and_then(|value| value.to_str().ok());
        if provided != Some(secret.as_str()) {
            tracing::warn!("reset_exercise - bad cron secret");
            return Err(UserError::PermissionDenied.into());
        }
    }
    let affected = state.exercise_service.reset_today_exercise().await?;
    Ok(Json(ApiSuccessResponse::send_with_message(
        "today exercise reset",
        ResetExerciseRes { affected },
    )))
}
