use crate::service::user_service::UserService;
use crate::state::AppServices;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthState {
    pub user_service: Arc<UserService>,
}

impl AuthState {
    pub fn new(services: &AppServices) -> Self {
        Self {
            user_service: Arc::clone(&services.user_service),
        }
    }
}
