use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TownRole::Table)
                    .if_not_exists()
                    .col(pk_auto(TownRole::Id))
                    .col(string_uniq(TownRole::TownId))
                    .col(string(TownRole::TownName))
                    .col(string(TownRole::Nation))
                    .col(string(TownRole::RoleId))
                    .col(
                        timestamp_with_time_zone(TownRole::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TownRole::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TownRole {
    Table,
    Id,
    TownId,
    TownName,
    Nation,
    RoleId,
    CreatedAt,
}
