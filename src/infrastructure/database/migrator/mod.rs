//! Database migrations module
//!
//! The state-crop map can live in its own database, so it has its own
//! migrator with a separate history table. Both migrators may also run
//! against the same connection.

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users;
mod m20250101_000002_create_admins;
mod m20250101_000003_create_state_crop_map;

/// Users and admins
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users::Migration),
            Box::new(m20250101_000002_create_admins::Migration),
        ]
    }
}

/// State → crop reference table
pub struct MapMigrator;

#[async_trait::async_trait]
impl MigratorTrait for MapMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000003_create_state_crop_map::Migration)]
    }

    fn migration_table_name() -> DynIden {
        Alias::new("seaql_map_migrations").into_iden()
    }
}
