//! Server runtime
//!
//! [`ServerHandle`] owns the whole lifecycle: metrics recorder, database
//! connections and migrations, default admin, REST API and graceful
//! shutdown. Both binaries start the backend through it.

use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{error, info, warn};

use crate::application::AdminService;
use crate::config::AppConfig;
use crate::infrastructure::database::repositories::AdminRepository;
use crate::infrastructure::{DatabaseConfig, Databases, HttpPredictionGateway};
use crate::interfaces::http::{create_api_router, AppState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the backend.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Create the configured admin if the admin store is empty (default: true).
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running backend.
///
/// ```rust,no_run
/// use smart_farm::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Address actually bound (differs from the config when port 0 is used).
    pub local_addr: std::net::SocketAddr,

    databases: Databases,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;

        info!("Starting Smart Farm backend...");

        let prometheus_handle = prometheus_handle()?;

        // ── Databases ──────────────────────────────────────────
        let main_cfg = DatabaseConfig {
            url: app_cfg.database.url.clone(),
        };
        let map_cfg = app_cfg
            .database
            .map_url
            .clone()
            .map(|url| DatabaseConfig { url });
        let databases = Databases::connect(&main_cfg, map_cfg.as_ref()).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            databases.migrate().await?;
            info!("Migrations completed");
        }

        if opts.create_default_admin {
            create_default_admin(&databases, &app_cfg).await;
        }

        // ── ML gateway ─────────────────────────────────────────
        let gateway = HttpPredictionGateway::new(
            &app_cfg.ml_service.base_url,
            app_cfg.ml_service.timeout(),
        )?;
        info!(
            base_url = %app_cfg.ml_service.base_url,
            timeout_secs = ?app_cfg.ml_service.timeout_secs,
            "ML service configured"
        );

        // ── REST API server ────────────────────────────────────
        let state = AppState::new(&databases, Arc::new(gateway));
        let api_router = create_api_router(state, Some(prometheus_handle));

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);

        let listener = tokio::net::TcpListener::bind(app_cfg.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown.signal();
        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Backend started.");

        Ok(Self {
            local_addr,
            databases,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Wait for the server to drain after shutdown has been triggered, then
    /// close the database connections.
    pub async fn wait(self) {
        info!("⏳ Waiting for server tasks to complete...");

        let Self {
            databases,
            shutdown,
            api_task,
            ..
        } = self;

        let drained = shutdown
            .run_cleanup(|| async move {
                match api_task.await {
                    Ok(()) => info!("REST API server stopped"),
                    Err(e) => error!("REST API server task panicked: {}", e),
                }
            })
            .await;
        if !drained {
            warn!("Closing databases with requests still in flight");
        }

        if let Err(e) = databases.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("✅ Database connections closed");
        }

        info!("👋 Smart Farm backend shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        self.shutdown.signal().trigger();
        self.wait().await;
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// The global recorder can be installed once per process; later starts
/// reuse the first handle.
fn prometheus_handle() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = PROM_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("📊 Prometheus metrics recorder installed");
    Ok(PROM_HANDLE.get_or_init(|| handle).clone())
}

/// Create the configured admin when no admin exists yet.
async fn create_default_admin(databases: &Databases, app_cfg: &AppConfig) {
    let service = AdminService::new(Arc::new(AdminRepository::new(databases.main.clone())));

    match service
        .ensure_default_admin(&app_cfg.admin.email, &app_cfg.admin.password)
        .await
    {
        Ok(true) => {
            info!("Default admin created: {}", app_cfg.admin.email);
            info!("⚠️  Please change the admin password immediately!");
        }
        Ok(false) => {}
        Err(e) => error!("Failed to create admin user: {}", e),
    }
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
