pub mod entities;
pub mod migrator;
pub mod repositories;

use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use migrator::{MapMigrator, Migrator};

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./smart-farm.db?mode=rwc")
    pub url: String,
}

/// Initialize database connection
pub async fn init_database(
    config: &DatabaseConfig,
) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", config.url);
    let db = Database::connect(&config.url).await?;
    info!("Database connected successfully");
    Ok(db)
}

/// Connections used by the server: the main store (users, admins) and the
/// state-crop map store, which may be the same database.
#[derive(Clone)]
pub struct Databases {
    pub main: DatabaseConnection,
    pub map: DatabaseConnection,
    map_is_separate: bool,
}

impl Databases {
    /// Connect to the main database and, when `map` is given, to a separate
    /// crop-map database.
    pub async fn connect(
        main: &DatabaseConfig,
        map: Option<&DatabaseConfig>,
    ) -> Result<Self, sea_orm::DbErr> {
        let main_db = init_database(main).await?;
        match map {
            Some(map_cfg) if map_cfg.url != main.url => {
                let map_db = init_database(map_cfg).await?;
                Ok(Self::split(main_db, map_db))
            }
            _ => Ok(Self::shared(main_db)),
        }
    }

    /// Use one connection for everything.
    pub fn shared(db: DatabaseConnection) -> Self {
        Self {
            main: db.clone(),
            map: db,
            map_is_separate: false,
        }
    }

    /// Keep the crop map in its own database.
    pub fn split(main: DatabaseConnection, map: DatabaseConnection) -> Self {
        Self {
            main,
            map,
            map_is_separate: true,
        }
    }

    pub fn map_is_separate(&self) -> bool {
        self.map_is_separate
    }

    pub async fn migrate(&self) -> Result<(), sea_orm::DbErr> {
        Migrator::up(&self.main, None).await?;
        MapMigrator::up(&self.map, None).await?;
        Ok(())
    }

    pub async fn close(self) -> Result<(), sea_orm::DbErr> {
        if self.map_is_separate {
            self.map.close().await?;
        }
        self.main.close().await
    }
}
