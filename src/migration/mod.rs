use sea_orm_migration::prelude::*;

mod m20241001_000001_create_users;
mod m20241001_000002_create_otps;
mod m20241001_000003_create_cart_items;
mod m20241001_000004_create_appointments;
mod m20241001_000005_create_audit_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241001_000001_create_users::Migration),
            Box::new(m20241001_000002_create_otps::Migration),
            Box::new(m20241001_000003_create_cart_items::Migration),
            Box::new(m20241001_000004_create_appointments::Migration),
            Box::new(m20241001_000005_create_audit_logs::Migration),
        ]
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Fullname,
    Email,
    Phone,
    Address,
    PasswordHash,
    Verified,
    Role,
    CreatedAt,
    UpdatedAt,
}
