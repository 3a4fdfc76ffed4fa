use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    crypto::{hash_secret, verify_secret},
    dto::auth::{SendCodeRequest, SigninRequest, SigninResponse, SignupRequest, VerifyEmailRequest},
    entity::{
        otps::OtpPurpose,
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{ROLE_USER, issue_token},
    models::{OtpHandle, UserProfile},
    response::{ApiResponse, Meta},
    services::otp_service,
    state::AppState,
    validation::{Email, FullName, Password, Phone},
};

pub async fn find_user_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> AppResult<Option<UserModel>> {
    Ok(Users::find()
        .filter(UserCol::Email.eq(email))
        .one(db)
        .await?)
}

/// Maps a unique-index violation on `users.email` to `Conflict`.
pub(crate) fn email_conflict(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("Email is already taken".to_string())
        }
        _ => AppError::OrmError(err),
    }
}

pub async fn signup(state: &AppState, payload: SignupRequest) -> AppResult<ApiResponse<UserProfile>> {
    let fullname = FullName::parse(&payload.fullname)?;
    let email = Email::parse(&payload.email)?;
    let phone = Phone::parse(&payload.phone)?;
    let password = Password::parse(payload.password.trim())?;

    if find_user_by_email(&state.orm, email.as_str()).await?.is_some() {
        return Err(AppError::Conflict("Email is already taken".to_string()));
    }

    let now = Utc::now();
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        fullname: Set(fullname.into_inner()),
        email: Set(email.as_str().to_string()),
        phone: Set(phone.into_inner()),
        address: Set(None),
        password_hash: Set(hash_secret(password.expose())?),
        verified: Set(false),
        role: Set(ROLE_USER.to_string()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await
    .map_err(email_conflict)?;

    tracing::info!(user_id = %user.id, "user signed up");
    audit::record(
        &state.orm,
        Some(user.id),
        "user_signup",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    otp_service::issue(
        state,
        &user.email,
        OtpPurpose::EmailVerification,
        state.auth.otp_ttl(),
    )
    .await?;

    Ok(ApiResponse::success("User created", user.into(), None))
}

pub async fn signin(state: &AppState, payload: SigninRequest) -> AppResult<ApiResponse<SigninResponse>> {
    let email = payload.email.trim();
    let password = payload.password.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest("Empty credentials supplied!".into()));
    }

    let user = find_user_by_email(&state.orm, email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_secret(password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    if !user.verified {
        return Err(AppError::Unverified);
    }

    let token = issue_token(&state.auth, user.id, &user.role)?;

    audit::record(
        &state.orm,
        Some(user.id),
        "user_signin",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Logged in",
        SigninResponse {
            token: format!("Bearer {}", token),
            user: user.into(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn send_verification(
    state: &AppState,
    payload: SendCodeRequest,
) -> AppResult<ApiResponse<OtpHandle>> {
    let email = Email::parse(&payload.email)?;
    let user = find_user_by_email(&state.orm, email.as_str())
        .await?
        .ok_or(AppError::NotFound)?;

    if user.verified {
        return Err(AppError::BadRequest("Email is already verified".into()));
    }

    let handle = otp_service::issue(
        state,
        &user.email,
        OtpPurpose::EmailVerification,
        state.auth.otp_ttl(),
    )
    .await?;

    Ok(ApiResponse::success("Verification code sent", handle, None))
}

pub async fn verify_email(
    state: &AppState,
    payload: VerifyEmailRequest,
) -> AppResult<ApiResponse<UserProfile>> {
    let email = Email::parse(&payload.email)?;

    let txn = state.orm.begin().await?;

    if !otp_service::verify(&txn, email.as_str(), OtpPurpose::EmailVerification, &payload.otp).await? {
        txn.commit().await?;
        return Err(AppError::InvalidCode);
    }

    let user = find_user_by_email(&txn, email.as_str())
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: UserActive = user.into();
    active.verified = Set(true);
    active.updated_at = Set(Utc::now().into());
    let user = active.update(&txn).await?;

    otp_service::revoke(&txn, email.as_str()).await?;
    txn.commit().await?;

    tracing::info!(user_id = %user.id, "email verified");
    audit::record(
        &state.orm,
        Some(user.id),
        "email_verified",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success("Email verified", user.into(), Some(Meta::empty())))
}
