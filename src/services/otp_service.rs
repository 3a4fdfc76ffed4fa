//! One-time passcode lifecycle: issue, verify, revoke.
//!
//! At most one record exists per email. Codes are stored as argon2 hashes
//! and only ever leave the process through the mailer.

use chrono::{Duration, Utc};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    sea_query::OnConflict,
};
use uuid::Uuid;

use crate::{
    crypto::{generate_otp_code, hash_secret, verify_secret},
    entity::otps::{ActiveModel as OtpActive, Column as OtpCol, Entity as Otps, OtpPurpose},
    error::{AppError, AppResult},
    mailer::OutgoingEmail,
    models::OtpHandle,
    state::AppState,
};

/// Replaces any record for `email` with a fresh code and mails it.
///
/// The write is a single upsert on the unique email index, so overlapping
/// calls leave exactly one record behind.
pub async fn issue(
    state: &AppState,
    email: &str,
    purpose: OtpPurpose,
    ttl: Duration,
) -> AppResult<OtpHandle> {
    let code = generate_otp_code();
    let code_hash = hash_secret(&code)?;
    let now = Utc::now();
    let expires_at = now + ttl;

    Otps::insert(OtpActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        purpose: Set(purpose),
        code_hash: Set(code_hash.clone()),
        created_at: Set(now.into()),
        expires_at: Set(expires_at.into()),
    })
    .on_conflict(
        OnConflict::column(OtpCol::Email)
            .update_columns([
                OtpCol::Purpose,
                OtpCol::CodeHash,
                OtpCol::CreatedAt,
                OtpCol::ExpiresAt,
            ])
            .to_owned(),
    )
    .exec_without_returning(&state.orm)
    .await?;

    let message = OutgoingEmail::otp(
        email,
        purpose.subject(),
        purpose.message(),
        &code,
        ttl.num_minutes(),
    );
    if let Err(err) = state.mailer.send(&message).await {
        tracing::error!(error = ?err, email, ?purpose, "otp delivery failed");
        // only our own record; a concurrent issue may already have replaced it
        Otps::delete_many()
            .filter(OtpCol::Email.eq(email))
            .filter(OtpCol::CodeHash.eq(code_hash))
            .exec(&state.orm)
            .await?;
        return Err(AppError::Internal(err));
    }

    tracing::debug!(email, ?purpose, %expires_at, "otp issued");
    Ok(OtpHandle {
        email: email.to_string(),
        purpose,
        expires_at,
    })
}

/// Checks `code` against the live record for `email` and `purpose`.
///
/// An expired record is deleted on sight. A matching record is left in
/// place; callers revoke it once the guarded mutation has been written.
pub async fn verify<C: ConnectionTrait>(
    db: &C,
    email: &str,
    purpose: OtpPurpose,
    code: &str,
) -> AppResult<bool> {
    let record = Otps::find()
        .filter(OtpCol::Email.eq(email))
        .filter(OtpCol::Purpose.eq(purpose))
        .one(db)
        .await?;

    let Some(record) = record else {
        return Ok(false);
    };

    if record.expires_at.with_timezone(&Utc) <= Utc::now() {
        tracing::debug!(email, ?purpose, "otp expired");
        record.delete(db).await?;
        return Ok(false);
    }

    verify_secret(code.trim(), &record.code_hash)
}

pub async fn revoke<C: ConnectionTrait>(db: &C, email: &str) -> AppResult<()> {
    Otps::delete_many()
        .filter(OtpCol::Email.eq(email))
        .exec(db)
        .await?;
    Ok(())
}
