use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::password_reset::{CompleteResetRequest, RequestResetRequest, ResetCompleted},
    error::AppResult,
    models::OtpHandle,
    response::ApiResponse,
    services::password_reset_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(request_reset))
        .route("/reset", post(complete_reset))
}

#[utoipa::path(
    post,
    path = "/api/v1/forgot_password",
    request_body = RequestResetRequest,
    responses(
        (status = 200, description = "Reset code sent", body = ApiResponse<OtpHandle>),
        (status = 403, description = "Email not verified"),
        (status = 404, description = "No account for this email")
    ),
    tag = "Password reset"
)]
pub async fn request_reset(
    State(state): State<AppState>,
    Json(payload): Json<RequestResetRequest>,
) -> AppResult<Json<ApiResponse<OtpHandle>>> {
    let resp = password_reset_service::request_reset(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/forgot_password/reset",
    request_body = CompleteResetRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<ResetCompleted>),
        (status = 400, description = "Invalid code or weak password")
    ),
    tag = "Password reset"
)]
pub async fn complete_reset(
    State(state): State<AppState>,
    Json(payload): Json<CompleteResetRequest>,
) -> AppResult<Json<ApiResponse<ResetCompleted>>> {
    let resp = password_reset_service::complete_reset(&state, payload).await?;
    Ok(Json(resp))
}
