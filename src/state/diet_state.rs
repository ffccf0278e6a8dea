use crate::service::diet_service::DietService;
use crate::state::AppServices;
use std::sync::Arc;

#[derive(Clone)]
pub struct DietState {
    pub diet_service: Arc<DietService>,
}

impl DietState {
    pub fn new(services: &AppServices) -> Self {
        Self {
            diet_service: Arc::clone(&services.diet_service),
        }
    }
}
