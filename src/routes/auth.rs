use crate::handler::{auth_handler, register_handler};
use crate::state::auth_state::AuthState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn routes() -> Router<AuthState> {
    Router::new().nest(
        "/auth",
        Router::new()
            .route(
                "/register",
                get(register_handler::send_register_code).post(register_handler::register),
            )
            .route("/login", post(auth_handler::login))
            .route("/verify", post(auth_handler::verify))
            .route("/logout", post(auth_handler::logout))
            .route("/check-user", get(auth_handler::check_user))
            .route(
                "/reset-password",
                get(auth_handler::send_reset_code).post(auth_handler::reset_password),
            ),
    )
}
