pub mod auth_dto;
pub mod diet_dto;
pub mod page_dto;
pub mod play_record_dto;
pub mod user_dto;
pub mod video_dto;
