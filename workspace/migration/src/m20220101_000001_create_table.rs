use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create emittenti table
        manager
            .create_table(
                Table::create()
                    .table(Emittenti::Table)
                    .if_not_exists()
                    .col(pk_auto(Emittenti::Id))
                    .col(string_null(Emittenti::PrinterHost))
                    .col(integer_null(Emittenti::PrinterPort))
                    .to_owned(),
            )
            .await?;

        // Create utenti table
        manager
            .create_table(
                Table::create()
                    .table(Utenti::Table)
                    .if_not_exists()
                    .col(pk_auto(Utenti::Id))
                    .col(string(Utenti::Username).unique_key())
                    .col(string(Utenti::PasswordHash))
                    .col(string(Utenti::Salt).default(""))
                    .col(string_null(Utenti::Nome))
                    .col(string_null(Utenti::Cognome))
                    .col(string_null(Utenti::Email))
                    .col(string_null(Utenti::Telefono))
                    .col(string(Utenti::Ruolo).default("user"))
                    .col(integer_null(Utenti::EmittenteId))
                    .col(timestamp_with_time_zone(Utenti::CreatedAt))
                    .col(timestamp_with_time_zone(Utenti::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_utenti_emittente")
                            .from(Utenti::Table, Utenti::EmittenteId)
                            .to(Emittenti::Table, Emittenti::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Utenti::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Emittenti::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Define identifiers for all tables

#[derive(DeriveIden)]
enum Emittenti {
    Table,
    Id,
    PrinterHost,
    PrinterPort,
}

#[derive(DeriveIden)]
enum Utenti {
    Table,
    Id,
    Username,
    PasswordHash,
    Salt,
    Nome,
    Cognome,
    Email,
    Telefono,
    Ruolo,
    EmittenteId,
    CreatedAt,
    UpdatedAt,
}
