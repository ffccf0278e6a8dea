pub mod auth_state;
pub mod cron_state;
pub mod diet_state;
pub mod profile_state;
pub mod token_state;
pub mod video_state;

use crate::config::app_config::AppConfig;
use crate::db::cache::CacheTrait;
use crate::repository::Repositories;
use crate::service::diet_service::DietService;
use crate::service::exercise_service::ExerciseService;
use crate::service::sms_service::SmsSenderTrait;
use crate::service::token_service::TokenService;
use crate::service::user_service::UserService;
use crate::service::video_service::VideoService;
use std::sync::Arc;

/// 进程内共享的服务，各个路由的 State 从这里取
#[derive(Clone)]
pub struct AppServices {
    pub token_service: Arc<TokenService>,
    pub user_service: Arc<UserService>,
    pub video_service: Arc<VideoService>,
    pub exercise_service: Arc<ExerciseService>,
    pub diet_service: Arc<DietService>,
    pub trust_upstream_headers: bool,
    pub cron_secret: Option<String>,
}

impl AppServices {
    pub fn new(
        repos: Repositories,
        cache: Arc<dyn CacheTrait>,
        sms_sender: Arc<dyn SmsSenderTrait>,
        config: &AppConfig,
    ) -> Self {
        let token_service = Arc::new(TokenService::new(
            repos.token_repo.clone(),
            cache,
            &config.jwt_secret,
            config.token_validity,
        ));
        let user_service = Arc::new(UserService::new(
            repos.user_repo.clone(),
            repos.code_repo.clone(),
            token_service.clone(),
            sms_sender,
            config.verification_code_ttl,
            config.development,
        ));
        let exercise_service = Arc::new(ExerciseService::new(
            repos.video_repo.clone(),
            repos.play_record_repo.clone(),
            repos.user_repo.clone(),
        ));
        Self {
            token_service,
            user_service,
            video_service: Arc::new(VideoService::new(repos.video_repo.clone())),
            exercise_service,
            diet_service: Arc::new(DietService::new(repos.diet_repo)),
            trust_upstream_headers: config.trust_upstream_headers,
            cron_secret: config.cron_secret.clone(),
        }
    }
}
