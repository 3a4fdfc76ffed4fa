use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, TransactionTrait};

use crate::{
    audit,
    crypto::hash_secret,
    dto::password_reset::{CompleteResetRequest, RequestResetRequest, ResetCompleted},
    entity::{otps::OtpPurpose, users::ActiveModel as UserActive},
    error::{AppError, AppResult},
    models::OtpHandle,
    response::{ApiResponse, Meta},
    services::{auth_service::find_user_by_email, otp_service},
    state::AppState,
    validation::{Email, Password},
};

/// Sends a password-reset code to a verified account.
pub async fn request_reset(
    state: &AppState,
    payload: RequestResetRequest,
) -> AppResult<ApiResponse<OtpHandle>> {
    let email = Email::parse(&payload.email)?;
    let user = find_user_by_email(&state.orm, email.as_str())
        .await?
        .ok_or(AppError::NotFound)?;

    if !user.verified {
        return Err(AppError::Unverified);
    }

    let handle = otp_service::issue(
        state,
        &user.email,
        OtpPurpose::PasswordReset,
        state.auth.otp_ttl(),
    )
    .await?;

    audit::record(
        &state.orm,
        Some(user.id),
        "password_reset_requested",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success("Password reset code sent", handle, None))
}

/// Spends a reset code. Nothing is retried here; a failed call leaves the
/// password untouched and only an expired code is dropped.
pub async fn complete_reset(
    state: &AppState,
    payload: CompleteResetRequest,
) -> AppResult<ApiResponse<ResetCompleted>> {
    let email = Email::parse(&payload.email)?;

    let txn = state.orm.begin().await?;

    let valid =
        otp_service::verify(&txn, email.as_str(), OtpPurpose::PasswordReset, &payload.otp).await?;
    if !valid {
        txn.commit().await?;
        return Err(AppError::InvalidCode);
    }

    let password = Password::parse(&payload.new_password)?;

    let user = find_user_by_email(&txn, email.as_str())
        .await?
        .ok_or(AppError::NotFound)?;

    let reset_at = Utc::now();
    let mut active: UserActive = user.into();
    active.password_hash = Set(hash_secret(password.expose())?);
    active.updated_at = Set(reset_at.into());
    let user = active.update(&txn).await?;

    otp_service::revoke(&txn, email.as_str()).await?;
    txn.commit().await?;

    tracing::info!(user_id = %user.id, "password reset");
    audit::record(
        &state.orm,
        Some(user.id),
        "password_reset",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Password reset successfully",
        ResetCompleted {
            email: user.email,
            reset_at,
        },
        Some(Meta::empty()),
    ))
}
