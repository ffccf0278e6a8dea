pub mod auth;
pub mod cron;
pub mod diet;
pub mod profile;
pub mod root;
pub mod video;
