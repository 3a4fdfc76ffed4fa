use serde::Deserialize;
use utoipa::ToSchema;

/// Every field is optional; only supplied fields are validated and written.
#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct UpdateProfileRequest {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub password: Option<String>,
}
