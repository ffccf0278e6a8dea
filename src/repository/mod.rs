pub mod diet_repository;
pub mod play_record_repository;
pub mod token_repository;
pub mod user_repository;
pub mod verification_code_repository;
pub mod video_repository;

use crate::db::database::Database;
use std::sync::Arc;

use diet_repository::{DietRepository, DietRepositoryTrait};
use play_record_repository::{PlayRecordRepository, PlayRecordRepositoryTrait};
use token_repository::{TokenRepository, TokenRepositoryTrait};
use user_repository::{UserRepository, UserRepositoryTrait};
use verification_code_repository::{VerificationCodeRepository, VerificationCodeRepositoryTrait};
use video_repository::{VideoRepository, VideoRepositoryTrait};

/// 所有 repository 的集合，服务层只依赖 trait
#[derive(Clone)]
pub struct Repositories {
    pub user_repo: Arc<dyn UserRepositoryTrait>,
    pub token_repo: Arc<dyn TokenRepositoryTrait>,
    pub code_repo: Arc<dyn VerificationCodeRepositoryTrait>,
    pub video_repo: Arc<dyn VideoRepositoryTrait>,
    pub play_record_repo: Arc<dyn PlayRecordRepositoryTrait>,
    pub diet_repo: Arc<dyn DietRepositoryTrait>,
}

impl Repositories {
    pub fn mysql(db_conn: &Arc<Database>) -> Self {
        Self {
            user_repo: Arc::new(UserRepository::new(db_conn)),
            token_repo: Arc::new(TokenRepository::new(db_conn)),
            code_repo: Arc::new(VerificationCodeRepository::new(db_conn)),
            video_repo: Arc::new(VideoRepository::new(db_conn)),
            play_record_repo: Arc::new(PlayRecordRepository::new(db_conn)),
            diet_repo: Arc::new(DietRepository::new(db_conn)),
        }
    }
}

/// 生成 `?, ?, ?` 形式的 IN 占位符
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
