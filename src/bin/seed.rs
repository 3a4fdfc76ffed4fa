use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use uuid::Uuid;

use mehendi_api::{
    config::AppConfig,
    crypto::hash_secret,
    db::{create_orm_conn, run_migrations},
    entity::users::ActiveModel as UserActive,
    middleware::auth::{ROLE_ADMIN, ROLE_USER},
    services::auth_service::find_user_by_email,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url, 1).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "Studio Admin", "admin@example.com", "admin12345", ROLE_ADMIN).await?;
    let user_id = ensure_user(&orm, "Demo Customer", "user@example.com", "user12345", ROLE_USER).await?;

    tracing::info!(%admin_id, %user_id, "seed completed");
    orm.close().await?;
    Ok(())
}

/// Inserts a verified account unless the email already exists.
async fn ensure_user(
    orm: &DatabaseConnection,
    fullname: &str,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = find_user_by_email(orm, email).await? {
        tracing::info!(email, role = %existing.role, "user already present");
        return Ok(existing.id);
    }

    let password_hash = hash_secret(password)?;
    let now = Utc::now();
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        fullname: Set(fullname.to_string()),
        email: Set(email.to_string()),
        phone: Set("9000000000".to_string()),
        address: Set(None),
        password_hash: Set(password_hash),
        verified: Set(true),
        role: Set(role.to_string()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(orm)
    .await?;

    tracing::info!(email, role, "ensured user");
    Ok(user.id)
}
