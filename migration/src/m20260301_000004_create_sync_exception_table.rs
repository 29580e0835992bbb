use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SyncException::Table)
                    .if_not_exists()
                    .col(pk_auto(SyncException::Id))
                    .col(string_uniq(SyncException::MemberId))
                    .col(string(SyncException::Reason))
                    .col(
                        timestamp_with_time_zone(SyncException::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SyncException::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SyncException {
    Table,
    Id,
    MemberId,
    Reason,
    CreatedAt,
}
