use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create Users Table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Create Rooms Table
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rooms::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rooms::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Rooms::Name).string().not_null())
                    .col(ColumnDef::new(Rooms::LightCondition).string().null())
                    .col(ColumnDef::new(Rooms::Description).text().null())
                    .col(ColumnDef::new(Rooms::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Rooms::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-room-owner_id")
                            .from(Rooms::Table, Rooms::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Room names are unique per owner
        manager
            .create_index(
                Index::create()
                    .name("idx-room-owner-name")
                    .table(Rooms::Table)
                    .col(Rooms::OwnerId)
                    .col(Rooms::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create Plants Table
        manager
            .create_table(
                Table::create()
                    .table(Plants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Plants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Plants::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Plants::RoomId).integer().not_null())
                    .col(ColumnDef::new(Plants::Name).string().not_null())
                    .col(ColumnDef::new(Plants::PlantType).string().null())
                    .col(ColumnDef::new(Plants::LightCondition).string().null())
                    .col(ColumnDef::new(Plants::WateringFrequency).string().null())
                    .col(ColumnDef::new(Plants::LastWatered).date_time().null())
                    .col(ColumnDef::new(Plants::NextWatering).date_time().null())
                    .col(ColumnDef::new(Plants::PotSize).string().null())
                    .col(ColumnDef::new(Plants::SoilType).string().null())
                    .col(
                        ColumnDef::new(Plants::Health)
                            .string()
                            .not_null()
                            .default("Good"),
                    )
                    .col(ColumnDef::new(Plants::AcquiredDate).date_time().null())
                    .col(ColumnDef::new(Plants::Notes).text().null())
                    .col(ColumnDef::new(Plants::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Plants::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plant-owner_id")
                            .from(Plants::Table, Plants::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plant-room_id")
                            .from(Plants::Table, Plants::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Plants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Rooms {
    Table,
    Id,
    OwnerId,
    Name,
    LightCondition,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Plants {
    Table,
    Id,
    OwnerId,
    RoomId,
    Name,
    PlantType,
    LightCondition,
    WateringFrequency,
    LastWatered,
    NextWatering,
    PotSize,
    SoilType,
    Health,
    AcquiredDate,
    Notes,
    CreatedAt,
    UpdatedAt,
}
