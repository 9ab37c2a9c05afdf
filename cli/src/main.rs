//! Smart Farm backend CLI
//!
//! ```sh
//! # Run with default config (~/.config/smart-farm/config.toml)
//! smart-farm
//!
//! # Custom config path, port override
//! smart-farm --config /etc/smart-farm/config.toml --port 8080
//!
//! # Validate config without starting
//! smart-farm --check
//!
//! # Maintenance
//! smart-farm create-admin --email ops@farm.in --password s3cret
//! smart-farm import-crops state_crops.json --replace
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use smart_farm::application::{AdminService, CropMapService};
use smart_farm::domain::StateCrop;
use smart_farm::infrastructure::database::repositories::{AdminRepository, StateCropRepository};
use smart_farm::server::{init_tracing, ServerHandle, ServerOptions};
use smart_farm::{AppConfig, DatabaseConfig, Databases};

/// Smart Farm backend: accounts, crop reference data and ML proxy.
#[derive(Parser, Debug)]
#[command(
    name = "smart-farm",
    version,
    about = "REST backend for the Smart Farm app",
    long_about = "Smart Farm backend: user accounts, admin management, \
                  state/crop lookup and a proxy to the ML inference service.\n\n\
                  Default config: ~/.config/smart-farm/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "SMART_FARM_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin.
    #[arg(long)]
    no_admin: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an admin account.
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Load state/crop records from a JSON array of {"State", "Crop"} objects.
    ImportCrops {
        file: PathBuf,
        /// Delete existing records first.
        #[arg(long)]
        replace: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(smart_farm::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    let env_overrides = config.apply_env();

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config);

    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(ref e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }
    if !env_overrides.is_empty() {
        info!("Environment overrides: {}", env_overrides.join(", "));
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        if let Some(e) = load_error {
            return Err(e.into());
        }
        config.validate()?;
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.address());
        println!("   Database    : {}", config.database.url);
        if let Some(ref map_url) = config.database.map_url {
            println!("   Crop map DB : {}", map_url);
        }
        println!("   ML service  : {}", config.ml_service.base_url);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    match cli.command {
        Some(Command::CreateAdmin { email, password }) => {
            create_admin(&config, &email, &password, !cli.no_migrate).await
        }
        Some(Command::ImportCrops { file, replace }) => {
            import_crops(&config, &file, replace, !cli.no_migrate).await
        }
        None => serve(config, !cli.no_migrate, !cli.no_admin).await,
    }
}

async fn serve(
    config: AppConfig,
    auto_migrate: bool,
    create_default_admin: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate,
        create_default_admin,
    })
    .await?;

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}

async fn open_databases(
    config: &AppConfig,
    migrate: bool,
) -> Result<Databases, Box<dyn std::error::Error>> {
    let main = DatabaseConfig {
        url: config.database.url.clone(),
    };
    let map = config
        .database
        .map_url
        .clone()
        .map(|url| DatabaseConfig { url });

    let databases = Databases::connect(&main, map.as_ref()).await?;
    if migrate {
        databases.migrate().await?;
    }
    Ok(databases)
}

async fn create_admin(
    config: &AppConfig,
    email: &str,
    password: &str,
    migrate: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let databases = open_databases(config, migrate).await?;
    let service = AdminService::new(Arc::new(AdminRepository::new(databases.main.clone())));

    let result = service.create_admin(email, password).await;
    databases.close().await?;

    let admin = result?;
    println!("✅ Admin created: {} ({})", admin.email, admin.id);
    Ok(())
}

async fn import_crops(
    config: &AppConfig,
    file: &Path,
    replace: bool,
    migrate: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(file)
        .map_err(|e| format!("cannot read {}: {}", file.display(), e))?;
    let records: Vec<StateCrop> = serde_json::from_str(&raw).map_err(|e| {
        format!("{} is not a JSON array of {{State, Crop}}: {}", file.display(), e)
    })?;
    info!("Read {} records from {}", records.len(), file.display());

    let databases = open_databases(config, migrate).await?;
    let service = CropMapService::new(Arc::new(StateCropRepository::new(databases.map.clone())));

    let result = service.import(records, replace).await;
    databases.close().await?;

    let summary = result?;
    println!(
        "✅ Imported {} records ({} skipped, {} removed)",
        summary.inserted, summary.skipped, summary.removed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Per-test scratch paths under the system temp dir, removed on drop.
    struct Scratch(Vec<PathBuf>);

    impl Scratch {
        fn new() -> Self {
            Self(Vec::new())
        }

        fn path(&mut self, name: &str) -> PathBuf {
            let path = std::env::temp_dir()
                .join(format!("smart-farm-cli-{}-{name}", std::process::id()));
            let _ = std::fs::remove_file(&path);
            self.0.push(path.clone());
            path
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            for path in &self.0 {
                let _ = std::fs::remove_file(path);
            }
        }
    }

    fn config_for(db: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.database.url = format!("sqlite://{}?mode=rwc", db.display());
        config
    }

    async fn crops(config: &AppConfig, state: &str) -> Vec<String> {
        let databases = open_databases(config, false).await.unwrap();
        let service =
            CropMapService::new(Arc::new(StateCropRepository::new(databases.map.clone())));
        let crops = service.crops_for_state(state).await.unwrap();
        databases.close().await.unwrap();
        crops
    }

    #[test]
    fn parses_import_subcommand() {
        let cli = Cli::try_parse_from(["smart-farm", "import-crops", "map.json", "--replace"])
            .unwrap();
        match cli.command {
            Some(Command::ImportCrops { file, replace }) => {
                assert_eq!(file, PathBuf::from("map.json"));
                assert!(replace);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[tokio::test]
    async fn import_crops_loads_and_replaces_records() {
        let mut scratch = Scratch::new();
        let db = scratch.path("import.db");
        let first = scratch.path("first.json");
        let second = scratch.path("second.json");
        std::fs::write(
            &first,
            r#"[{"State": "Punjab", "Crop": "Wheat"}, {"State": "Punjab", "Crop": "Rice"}]"#,
        )
        .unwrap();
        std::fs::write(&second, r#"[{"State": "Goa", "Crop": "Cashew"}]"#).unwrap();
        let config = config_for(&db);

        import_crops(&config, &first, false, true).await.unwrap();
        assert_eq!(crops(&config, "PUNJAB").await, vec!["Wheat", "Rice"]);

        import_crops(&config, &second, true, true).await.unwrap();
        assert!(crops(&config, "punjab").await.is_empty());
        assert_eq!(crops(&config, "goa").await, vec!["Cashew"]);
    }

    #[tokio::test]
    async fn import_crops_rejects_bad_input_before_touching_the_database() {
        let mut scratch = Scratch::new();
        let db = scratch.path("reject.db");
        let bad = scratch.path("bad.json");
        std::fs::write(&bad, r#"{"State": "Punjab"}"#).unwrap();
        let config = config_for(&db);

        let err = import_crops(&config, &bad, true, true).await.unwrap_err();
        assert!(err.to_string().contains("is not a JSON array"), "{err}");

        let missing = scratch.path("missing.json");
        let err = import_crops(&config, &missing, false, true).await.unwrap_err();
        assert!(err.to_string().starts_with("cannot read"), "{err}");

        assert!(!db.exists());
    }
}
