use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ConfigEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConfigEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ConfigEntries::Kind).string().not_null())
                    .col(ColumnDef::new(ConfigEntries::Slug).string().not_null())
                    .col(ColumnDef::new(ConfigEntries::Label).string().not_null())
                    .col(
                        ColumnDef::new(ConfigEntries::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConfigEntries::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-config_entry-kind-slug")
                    .table(ConfigEntries::Table)
                    .col(ConfigEntries::Kind)
                    .col(ConfigEntries::Slug)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ConfigEntries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ConfigEntries {
    Table,
    Id,
    Kind,
    Slug,
    Label,
    CreatedAt,
    UpdatedAt,
}
