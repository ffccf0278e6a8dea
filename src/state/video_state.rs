use crate::service::exercise_service::ExerciseService;
use crate::service::video_service::VideoService;
use crate::state::AppServices;
use std::sync::Arc;

#[derive(Clone)]
pub struct VideoState {
    pub video_service: Arc<VideoService>,
    pub exercise_service: Arc<ExerciseService>,
}

impl VideoState {
    pub fn new(services: &AppServices) -> Self {
        Self {
            video_service: Arc::clone(&services.video_service),
            exercise_service: Arc::clone(&services.exercise_service),
        }
    }
}
