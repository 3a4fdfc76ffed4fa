use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{config::AuthConfig, mailer::Mailer};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub mailer: Arc<dyn Mailer>,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, mailer: Arc<dyn Mailer>, auth: AuthConfig) -> Self {
        Self { orm, mailer, auth }
    }
}
