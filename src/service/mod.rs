pub mod cron_service;
pub mod diet_service;
pub mod exercise_service;
pub mod sms_service;
pub mod token_service;
pub mod user_service;
pub mod video_service;
