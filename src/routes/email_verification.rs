use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::auth::{SendCodeRequest, VerifyEmailRequest},
    error::AppResult,
    models::{OtpHandle, UserProfile},
    response::ApiResponse,
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(send_code))
        .route("/verify", post(verify))
}

#[utoipa::path(
    post,
    path = "/api/v1/email_verification",
    request_body = SendCodeRequest,
    responses(
        (status = 200, description = "Verification code sent", body = ApiResponse<OtpHandle>),
        (status = 404, description = "No account for this email")
    ),
    tag = "Email verification"
)]
pub async fn send_code(
    State(state): State<AppState>,
    Json(payload): Json<SendCodeRequest>,
) -> AppResult<Json<ApiResponse<OtpHandle>>> {
    let resp = auth_service::send_verification(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/email_verification/verify",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified", body = ApiResponse<UserProfile>),
        (status = 400, description = "Invalid or expired code")
    ),
    tag = "Email verification"
)]
pub async fn verify(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailRequest>,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let resp = auth_service::verify_email(&state, payload).await?;
    Ok(Json(resp))
}
