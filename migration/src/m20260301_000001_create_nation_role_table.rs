use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NationRole::Table)
                    .if_not_exists()
                    .col(pk_auto(NationRole::Id))
                    .col(string_uniq(NationRole::Nation))
                    .col(string(NationRole::DisplayName))
                    .col(string(NationRole::RoleId))
                    .col(string_null(NationRole::AlliedRoleId))
                    .col(
                        timestamp_with_time_zone(NationRole::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NationRole::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum NationRole {
    Table,
    Id,
    Nation,
    DisplayName,
    RoleId,
    AlliedRoleId,
    CreatedAt,
}
