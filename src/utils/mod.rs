pub mod date;
pub mod encrypt;
pub mod health;
pub mod validate;
