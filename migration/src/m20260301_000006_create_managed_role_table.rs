use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ManagedRole::Table)
                    .if_not_exists()
                    .col(string(ManagedRole::RoleId).primary_key())
                    .col(
                        timestamp_with_time_zone(ManagedRole::FirstSeenAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ManagedRole::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ManagedRole {
    Table,
    RoleId,
    FirstSeenAt,
}
