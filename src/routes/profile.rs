use crate::handler::user_handler;
use crate::state::profile_state::ProfileState;
use axum::{routing::get, Router};

pub fn routes() -> Router<ProfileState> {
    Router::new()
        .route(
            "/user/profile",
            get(user_handler::get_profile).put(user_handler::update_profile),
        )
        .route("/workout/plan", get(user_handler::get_workout_plan))
}
