use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_unloadings_table::Migration),
            Box::new(m20260101_000002_create_unloading_stages_table::Migration),
        ]
    }
}

mod m20260101_000001_create_unloadings_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000001_create_unloadings_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Unloadings::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Unloadings::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Unloadings::FreightId)
                                .uuid()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Unloadings::LoadDate).date().not_null())
                        .col(ColumnDef::new(Unloadings::UnloadDate).date().not_null())
                        .col(
                            ColumnDef::new(Unloadings::TotalVolume)
                                .decimal_len(14, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Unloadings::DischargedVolume)
                                .decimal_len(14, 4)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Unloadings::SystemStockBefore).decimal_len(14, 4).null())
                        .col(ColumnDef::new(Unloadings::SystemStockAfter).decimal_len(14, 4).null())
                        .col(ColumnDef::new(Unloadings::GaugeStockBefore).decimal_len(14, 4).null())
                        .col(ColumnDef::new(Unloadings::GaugeStockAfter).decimal_len(14, 4).null())
                        .col(
                            ColumnDef::new(Unloadings::RefuelDuringUnload)
                                .decimal_len(14, 4)
                                .null(),
                        )
                        .col(ColumnDef::new(Unloadings::Temperature).decimal_len(8, 4).null())
                        .col(ColumnDef::new(Unloadings::Density).decimal_len(8, 4).null())
                        .col(ColumnDef::new(Unloadings::SystemDifference).decimal_len(14, 4).null())
                        .col(ColumnDef::new(Unloadings::GaugeDifference).decimal_len(14, 4).null())
                        .col(
                            ColumnDef::new(Unloadings::Status)
                                .string()
                                .not_null()
                                .default("pending"),
                        )
                        .col(ColumnDef::new(Unloadings::Notes).text().null())
                        .col(
                            ColumnDef::new(Unloadings::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Unloadings::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_unloadings_unload_date")
                        .table(Unloadings::Table)
                        .col(Unloadings::UnloadDate)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_unloadings_status")
                        .table(Unloadings::Table)
                        .col(Unloadings::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Unloadings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Unloadings {
        Table,
        Id,
        FreightId,
        LoadDate,
        UnloadDate,
        TotalVolume,
        DischargedVolume,
        SystemStockBefore,
        SystemStockAfter,
        GaugeStockBefore,
        GaugeStockAfter,
        RefuelDuringUnload,
        Temperature,
        Density,
        SystemDifference,
        GaugeDifference,
        Status,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20260101_000002_create_unloading_stages_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000002_create_unloading_stages_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(UnloadingStages::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(UnloadingStages::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(UnloadingStages::UnloadingId).uuid().not_null())
                        .col(ColumnDef::new(UnloadingStages::StageDate).date().not_null())
                        .col(
                            ColumnDef::new(UnloadingStages::StageVolume)
                                .decimal_len(14, 4)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(UnloadingStages::SystemStockBefore)
                                .decimal_len(14, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(UnloadingStages::SystemStockAfter)
                                .decimal_len(14, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(UnloadingStages::GaugeStockBefore)
                                .decimal_len(14, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(UnloadingStages::GaugeStockAfter)
                                .decimal_len(14, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(UnloadingStages::RefuelDuringStage)
                                .decimal_len(14, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(UnloadingStages::SystemDifference)
                                .decimal_len(14, 4)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(UnloadingStages::GaugeDifference)
                                .decimal_len(14, 4)
                                .null(),
                        )
                        .col(ColumnDef::new(UnloadingStages::Notes).text().null())
                        .col(
                            ColumnDef::new(UnloadingStages::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_unloading_stages_unloading_id")
                                .from(UnloadingStages::Table, UnloadingStages::UnloadingId)
                                .to(Unloadings::Table, Unloadings::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_unloading_stages_unloading_id")
                        .table(UnloadingStages::Table)
                        .col(UnloadingStages::UnloadingId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(UnloadingStages::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum UnloadingStages {
        Table,
        Id,
        UnloadingId,
        StageDate,
        StageVolume,
        SystemStockBefore,
        SystemStockAfter,
        GaugeStockBefore,
        GaugeStockAfter,
        RefuelDuringStage,
        SystemDifference,
        GaugeDifference,
        Notes,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Unloadings {
        Table,
        Id,
    }
}
