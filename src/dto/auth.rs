use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::UserProfile;

#[derive(Deserialize, Debug, ToSchema)]
pub struct SignupRequest {
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SigninResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct SendCodeRequest {
    pub email: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}
