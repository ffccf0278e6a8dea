use crate::handler::{diet_handler, food_handler};
use crate::middleware::auth as auth_middleware;
use crate::state::diet_state::DietState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub fn routes() -> Router<DietState> {
    Router::new()
        .route(
            "/diet",
            get(diet_handler::get_day).post(diet_handler::upsert_meal),
        )
        .route("/diet/weekly", get(diet_handler::weekly))
        .route(
            "/foods",
            get(food_handler::list_foods).merge(
                post(food_handler::add_food)
                    .layer(middleware::from_fn(auth_middleware::require_admin)),
            ),
        )
}
