use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LinkedAccount::Table)
                    .if_not_exists()
                    .col(string(LinkedAccount::MemberId).primary_key())
                    .col(string(LinkedAccount::ExternalUuid))
                    .col(string(LinkedAccount::ExternalName))
                    .col(
                        timestamp_with_time_zone(LinkedAccount::LinkedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(LinkedAccount::LastSyncedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LinkedAccount::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum LinkedAccount {
    Table,
    MemberId,
    ExternalUuid,
    ExternalName,
    LinkedAt,
    LastSyncedAt,
}
