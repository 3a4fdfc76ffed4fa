#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectOptions, Database};
use uuid::Uuid;

use mehendi_api::{
    config::AuthConfig,
    crypto::hash_secret,
    db::run_migrations,
    entity::users::ActiveModel as UserActive,
    mailer::MemoryMailer,
    middleware::auth::AuthUser,
    state::AppState,
};

pub const PASSWORD: &str = "henna-secret-1";

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "integration-test-secret".into(),
        token_ttl_hours: 1,
        otp_ttl_minutes: 60,
    }
}

/// Fresh in-memory database with migrations applied. A single pooled
/// connection keeps the in-memory schema alive for the whole test.
pub async fn setup_state() -> anyhow::Result<(AppState, MemoryMailer)> {
    connect("sqlite::memory:".to_string(), 1).await
}

/// Like [`setup_state`], but backed by a named shared-cache database so that
/// `connections` pooled connections see the same schema and run side by side.
pub async fn setup_shared_state(connections: u32) -> anyhow::Result<(AppState, MemoryMailer)> {
    let url = format!(
        "sqlite:file:mehendi-{}?mode=memory&cache=shared",
        Uuid::new_v4().simple()
    );
    connect(url, connections).await
}

async fn connect(url: String, connections: u32) -> anyhow::Result<(AppState, MemoryMailer)> {
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(connections)
        .min_connections(connections)
        .sqlx_logging(false);
    let orm = Database::connect(options).await?;
    run_migrations(&orm).await?;

    let mailer = MemoryMailer::new();
    let state = AppState::new(orm, Arc::new(mailer.clone()), auth_config());
    Ok((state, mailer))
}

pub async fn create_user(
    state: &AppState,
    email: &str,
    role: &str,
    verified: bool,
) -> anyhow::Result<AuthUser> {
    let now = Utc::now();
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        fullname: Set("Test User".into()),
        email: Set(email.to_string()),
        phone: Set("9876543210".into()),
        address: Set(None),
        password_hash: Set(hash_secret(PASSWORD)?),
        verified: Set(verified),
        role: Set(role.to_string()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
    })
}
