pub mod axredis;
pub mod cache;
pub mod database;
