//! Create `session` table with FK to `user`.
//!
//! One row per issued cookie token; logout deletes the row and expiry makes
//! it unusable before cleanup.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Session::Table)
                    .if_not_exists()
                    .col(uuid(Session::Id).primary_key())
                    .col(string_len(Session::Token, 64).unique_key().not_null())
                    .col(uuid(Session::UserId).not_null())
                    .col(timestamp_with_time_zone(Session::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Session::ExpiresAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_user")
                            .from(Session::Table, Session::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Session::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Session { Table, Id, Token, UserId, CreatedAt, ExpiresAt }

#[derive(DeriveIden)]
enum User { Table, Id }
