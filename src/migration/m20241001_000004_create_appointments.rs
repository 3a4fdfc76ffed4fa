use sea_orm_migration::prelude::*;

use super::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Appointments::Table)
            .if_not_exists()
            .col(ColumnDef::new(Appointments::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Appointments::UserId).uuid().not_null());

        for text_col in [
            Appointments::Firstname,
            Appointments::Lastname,
            Appointments::Email,
            Appointments::Phone,
            Appointments::Address1,
            Appointments::Address2,
            Appointments::City,
            Appointments::District,
            Appointments::Time,
            Appointments::Wedding,
            Appointments::TypeMehendi,
            Appointments::Design,
            Appointments::MehendiOn,
            Appointments::MehendiFor,
            Appointments::Artist,
        ] {
            table.col(ColumnDef::new(text_col).string().not_null());
        }

        table
            .col(
                ColumnDef::new(Appointments::AppointmentType)
                    .string_len(16)
                    .not_null()
                    .default("individual"),
            )
            .col(
                ColumnDef::new(Appointments::Status)
                    .string_len(16)
                    .not_null()
                    .default("PENDING"),
            )
            .col(
                ColumnDef::new(Appointments::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_appointments_user")
                    .from(Appointments::Table, Appointments::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );

        manager.create_table(table.to_owned()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Appointments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Appointments {
    Table,
    Id,
    UserId,
    Firstname,
    Lastname,
    Email,
    Phone,
    Address1,
    Address2,
    City,
    District,
    Time,
    Wedding,
    TypeMehendi,
    Design,
    MehendiOn,
    MehendiFor,
    Artist,
    AppointmentType,
    Status,
    CreatedAt,
}
