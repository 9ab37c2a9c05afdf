//! Migration to create the state_crop_map reference table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StateCropMap::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StateCropMap::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StateCropMap::State).string_len(100).not_null())
                    .col(ColumnDef::new(StateCropMap::StateKey).string_len(100).not_null())
                    .col(ColumnDef::new(StateCropMap::Crop).string_len(100).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_state_crop_map_state_key")
                    .table(StateCropMap::Table)
                    .col(StateCropMap::StateKey)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StateCropMap::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum StateCropMap {
    Table,
    Id,
    State,
    StateKey,
    Crop,
}
