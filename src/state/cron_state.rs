use crate::service::exercise_service::ExerciseService;
use crate::state::AppServices;
use std::sync::Arc;

#[derive(Clone)]
pub struct CronState {
    pub exercise_service: Arc<ExerciseService>,
    /// 配置后手动触发需要带 x-cron-secret
    pub cron_secret: Option<String>,
}

impl CronState {
    pub fn new(services: &AppServices) -> Self {
        Self {
            exercise_service: Arc::clone(&services.exercise_service),
            cron_secret: services.cron_secret.clone(),
        }
    }
}
