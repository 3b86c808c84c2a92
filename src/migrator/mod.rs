use sea_orm_migration::prelude::*;

mod m20250901_000001_create_table;
mod m20250908_000002_create_care_logs;
mod m20250915_000003_create_config_entries;
mod m20250922_000004_add_user_role;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_table::Migration),
            Box::new(m20250908_000002_create_care_logs::Migration),
            Box::new(m20250915_000003_create_config_entries::Migration),
            Box::new(m20250922_000004_add_user_role::Migration),
        ]
    }
}
