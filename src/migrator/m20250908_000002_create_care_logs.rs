use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CareLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CareLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CareLogs::PlantId).integer().not_null())
                    .col(ColumnDef::new(CareLogs::CreatedBy).integer().not_null())
                    .col(ColumnDef::new(CareLogs::LogType).string().not_null())
                    .col(ColumnDef::new(CareLogs::Date).date_time().not_null())
                    .col(ColumnDef::new(CareLogs::Quantity).double().null())
                    .col(ColumnDef::new(CareLogs::FertilizerName).string().null())
                    .col(ColumnDef::new(CareLogs::PotSize).string().null())
                    .col(ColumnDef::new(CareLogs::SoilType).string().null())
                    .col(ColumnDef::new(CareLogs::Issue).string().null())
                    .col(ColumnDef::new(CareLogs::Description).text().null())
                    .col(ColumnDef::new(CareLogs::Treatment).text().null())
                    .col(ColumnDef::new(CareLogs::PhotoUrl).string().null())
                    .col(ColumnDef::new(CareLogs::Notes).text().null())
                    .col(ColumnDef::new(CareLogs::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(CareLogs::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-care_log-plant_id")
                            .from(CareLogs::Table, CareLogs::PlantId)
                            .to(Plants::Table, Plants::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-care_log-created_by")
                            .from(CareLogs::Table, CareLogs::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Listings are always per plant or per creator, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx-care_log-plant-date")
                    .table(CareLogs::Table)
                    .col(CareLogs::PlantId)
                    .col(CareLogs::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CareLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CareLogs {
    Table,
    Id,
    PlantId,
    CreatedBy,
    LogType,
    Date,
    Quantity,
    FertilizerName,
    PotSize,
    SoilType,
    Issue,
    Description,
    Treatment,
    PhotoUrl,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Plants {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
