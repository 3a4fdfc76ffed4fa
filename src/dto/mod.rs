pub mod appointments;
pub mod auth;
pub mod cart;
pub mod password_reset;
pub mod profile;
