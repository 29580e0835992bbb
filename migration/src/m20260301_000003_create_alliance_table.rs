use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alliance::Table)
                    .if_not_exists()
                    .col(pk_auto(Alliance::Id))
                    .col(string(Alliance::Nation))
                    .col(string(Alliance::AlliedNation))
                    .col(
                        timestamp_with_time_zone(Alliance::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // An edge may only be listed once per direction
        manager
            .create_index(
                Index::create()
                    .name("idx_alliance_unique")
                    .table(Alliance::Table)
                    .col(Alliance::Nation)
                    .col(Alliance::AlliedNation)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_alliance_unique")
                    .table(Alliance::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Alliance::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Alliance {
    Table,
    Id,
    Nation,
    AlliedNation,
    CreatedAt,
}
