use crate::service::token_service::TokenService;
use crate::state::AppServices;
use std::sync::Arc;

#[derive(Clone)]
pub struct TokenState {
    pub token_service: Arc<TokenService>,
    pub trust_upstream_headers: bool,
}

impl TokenState {
    pub fn new(services: &AppServices) -> Self {
        Self {
            token_service: Arc::clone(&services.token_service),
            trust_upstream_headers: services.trust_upstream_headers,
        }
    }
}
