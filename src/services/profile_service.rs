use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};

use crate::{
    audit,
    crypto::hash_secret,
    dto::profile::UpdateProfileRequest,
    entity::users::{ActiveModel as UserActive, Entity as Users},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::UserProfile,
    response::{ApiResponse, Meta},
    services::auth_service::{email_conflict, find_user_by_email},
    state::AppState,
    validation::{Email, FullName, Password, Phone},
};

pub async fn get_profile(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<UserProfile>> {
    let model = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("OK", model.into(), Some(Meta::empty())))
}

pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<UserProfile>> {
    let model = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: UserActive = model.clone().into();
    let mut changed: Vec<&str> = Vec::new();

    if let Some(fullname) = payload.fullname.as_deref() {
        active.fullname = Set(FullName::parse(fullname)?.into_inner());
        changed.push("fullname");
    }
    if let Some(phone) = payload.phone.as_deref() {
        active.phone = Set(Phone::parse(phone)?.into_inner());
        changed.push("phone");
    }
    if let Some(address) = payload.address.as_deref() {
        let address = address.trim();
        active.address = Set((!address.is_empty()).then(|| address.to_string()));
        changed.push("address");
    }
    if let Some(email) = payload.email.as_deref() {
        let email = Email::parse(email)?;
        if email.as_str() != model.email {
            if let Some(other) = find_user_by_email(&state.orm, email.as_str()).await? {
                if other.id != model.id {
                    return Err(AppError::Conflict("Email is already taken".to_string()));
                }
            }
            active.email = Set(email.into_inner());
            changed.push("email");
        }
    }
    if let Some(password) = payload.password.as_deref() {
        let password = Password::parse(password)?;
        active.password_hash = Set(hash_secret(password.expose())?);
        changed.push("password");
    }

    if changed.is_empty() {
        return Ok(ApiResponse::success("No changes", model.into(), Some(Meta::empty())));
    }

    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await.map_err(email_conflict)?;

    audit::record(
        &state.orm,
        Some(updated.id),
        "profile_update",
        "users",
        serde_json::json!({ "fields": changed }),
    )
    .await;

    Ok(ApiResponse::success(
        "Profile updated successfully",
        updated.into(),
        Some(Meta::empty()),
    ))
}
