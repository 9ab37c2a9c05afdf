//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AdminService, CropMapService, PredictionService, UserService};
use crate::domain::PredictionGateway;
use crate::infrastructure::database::repositories::{
    AdminRepository, StateCropRepository, UserRepository,
};
use crate::infrastructure::Databases;
use crate::interfaces::http::common::MessageResponse;
use crate::interfaces::http::modules::{
    admin, crop_map, health, metrics, predictions, request_id, users,
};

/// Everything the handlers need. Axum extracts each module's own state
/// via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<UserRepository>>,
    pub admin_service: Arc<AdminService<AdminRepository>>,
    pub crop_map_service: Arc<CropMapService<StateCropRepository>>,
    pub prediction_service: PredictionService,
    pub health: health::HealthState,
}

impl AppState {
    pub fn new(databases: &Databases, gateway: Arc<dyn PredictionGateway>) -> Self {
        Self {
            user_service: Arc::new(UserService::new(Arc::new(UserRepository::new(
                databases.main.clone(),
            )))),
            admin_service: Arc::new(AdminService::new(Arc::new(AdminRepository::new(
                databases.main.clone(),
            )))),
            crop_map_service: Arc::new(CropMapService::new(Arc::new(
                StateCropRepository::new(databases.map.clone()),
            ))),
            prediction_service: PredictionService::new(gateway),
            health: health::HealthState::new(databases.clone()),
        }
    }
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<AppState> for users::UserHandlerState {
    fn from_ref(s: &AppState) -> Self {
        users::UserHandlerState {
            user_service: Arc::clone(&s.user_service),
        }
    }
}

impl FromRef<AppState> for admin::AdminHandlerState {
    fn from_ref(s: &AppState) -> Self {
        admin::AdminHandlerState {
            admin_service: Arc::clone(&s.admin_service),
            user_service: Arc::clone(&s.user_service),
        }
    }
}

impl FromRef<AppState> for crop_map::CropMapHandlerState {
    fn from_ref(s: &AppState) -> Self {
        crop_map::CropMapHandlerState {
            crop_map_service: Arc::clone(&s.crop_map_service),
        }
    }
}

impl FromRef<AppState> for predictions::PredictionHandlerState {
    fn from_ref(s: &AppState) -> Self {
        predictions::PredictionHandlerState {
            prediction_service: s.prediction_service.clone(),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        s.health.clone()
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::root,
        health::health_check,
        // Users
        users::register,
        users::login,
        // Admin
        admin::admin_login,
        admin::list_users,
        admin::update_user_status,
        // Crop map
        crop_map::get_crops_by_state,
        // ML
        predictions::predict_yield,
        predictions::recommend,
        predictions::predict_price,
        predictions::pest_risk,
    ),
    components(
        schemas(
            MessageResponse,
            health::HealthResponse,
            health::ServiceStatus,
            health::DatabaseHealth,
            health::StoreHealth,
            users::UserDto,
            users::RegisterRequest,
            users::LoginRequest,
            users::LoginResponse,
            admin::AdminLoginRequest,
            admin::UpdateStatusRequest,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Users", description = "Farmer registration and login"),
        (name = "Admin", description = "Admin login and user account management"),
        (name = "Crop Map", description = "Crops grown per Indian state"),
        (name = "ML", description = "Pass-through to the ML inference service"),
    ),
    info(
        title = "Smart Farm Backend API",
        version = "1.0.0",
        description = "Accounts, crop reference data and ML prediction proxy for the Smart Farm app"
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `/metrics` is only mounted when a Prometheus handle is supplied.
pub fn create_api_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let user_routes = Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login));

    let admin_routes = Router::new()
        .route("/login", post(admin::admin_login))
        .route("/users", get(admin::list_users))
        .route("/user/status/{id}", put(admin::update_user_status));

    let ml_routes = Router::new()
        .route("/predict-yield", post(predictions::predict_yield))
        .route("/recommend", post(predictions::recommend))
        .route("/predict-price", post(predictions::predict_price))
        .route("/pest-risk", post(predictions::pest_risk));

    let mut router = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/map/crops/{state}", get(crop_map::get_crops_by_state))
        .nest("/user", user_routes)
        .nest("/admin", admin_routes)
        .nest("/ml", ml_routes)
        .with_state(state);

    if let Some(handle) = metrics_handle {
        let metrics_routes = Router::new()
            .route("/metrics", get(metrics::prometheus_metrics))
            .with_state(metrics::MetricsState { handle });
        router = router.merge(metrics_routes);
    }

    router
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

// ── Tests ──────────────────────────────────────────────────────
