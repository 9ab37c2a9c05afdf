//! Smart Farm backend with no flags: reads the configuration file and
//! environment, then serves until SIGINT/SIGTERM.
//!
//! The `smart-farm` CLI in the `cli` member exposes the same server with
//! overrides plus admin and crop-map maintenance commands.

use tracing::{error, info};

use smart_farm::server::{init_tracing, ServerHandle, ServerOptions};
use smart_farm::{default_config_path, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = default_config_path();

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    let overrides = config.apply_env();

    init_tracing(&config);

    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }
    if !overrides.is_empty() {
        info!("Environment overrides: {}", overrides.join(", "));
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        ..Default::default()
    })
    .await?;

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
