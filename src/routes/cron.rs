use crate::handler::cron_handler;
use crate::state::cron_state::CronState;
use axum::{routing::get, Router};

pub fn routes() -> Router<CronState> {
    Router::new().route(
        "/cron/reset-exercise",
        get(cron_handler::reset_exercise),
    )
}
