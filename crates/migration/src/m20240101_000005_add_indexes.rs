use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Product: index on created_by for the ownership lookup path
        manager
            .create_index(
                Index::create()
                    .name("idx_product_created_by")
                    .table(Product::Table)
                    .col(Product::CreatedBy)
                    .to_owned(),
            )
            .await?;

        // Product: index on created_at for newest-first listing
        manager
            .create_index(
                Index::create()
                    .name("idx_product_created_at")
                    .table(Product::Table)
                    .col(Product::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Session: index on user_id for logout/cleanup by user
        manager
            .create_index(
                Index::create()
                    .name("idx_session_user")
                    .table(Session::Table)
                    .col(Session::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_product_created_by").table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_product_created_at").table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_session_user").table(Session::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Product { Table, CreatedBy, CreatedAt }

#[derive(DeriveIden)]
enum Session { Table, UserId }
