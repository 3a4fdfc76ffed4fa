pub mod appointment_service;
pub mod auth_service;
pub mod cart_service;
pub mod otp_service;
pub mod password_reset_service;
pub mod profile_service;
