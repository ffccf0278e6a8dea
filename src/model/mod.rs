pub mod diet;
pub mod user;
pub mod video;
