//! `GET /` and `GET /health`

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::infrastructure::Databases;

#[derive(Clone)]
pub struct HealthState {
    databases: Databases,
    started_at: Arc<Instant>,
}

impl HealthState {
    /// Uptime is counted from this call.
    pub fn new(databases: Databases) -> Self {
        Self {
            databases,
            started_at: Arc::new(Instant::now()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Ok,
    Degraded,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: DatabaseHealth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DatabaseHealth {
    pub main: StoreHealth,
    /// Only reported when the crop map lives in its own database.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<StoreHealth>,
}

impl DatabaseHealth {
    fn all_reachable(&self) -> bool {
        self.main.reachable && self.map.as_ref().map_or(true, |m| m.reachable)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreHealth {
    pub reachable: bool,
    /// Round trip of the ping; absent when it failed.
    pub latency_ms: Option<u64>,
}

async fn ping(store: &'static str, db: &DatabaseConnection) -> StoreHealth {
    let started = Instant::now();
    match db.ping().await {
        Ok(()) => StoreHealth {
            reachable: true,
            latency_ms: Some(started.elapsed().as_millis() as u64),
        },
        Err(e) => {
            warn!(store, error = %e, "Database ping failed");
            StoreHealth {
                reachable: false,
                latency_ms: None,
            }
        }
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, description = "Server is up", body = String))
)]
pub async fn root() -> &'static str {
    "Backend running"
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Every database answers", body = HealthResponse),
        (status = 503, description = "A database is unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(
    State(state): State<HealthState>,
) -> (StatusCode, Json<HealthResponse>) {
    let dbs = &state.databases;
    let database = DatabaseHealth {
        main: ping("main", &dbs.main).await,
        map: if dbs.map_is_separate() {
            Some(ping("map", &dbs.map).await)
        } else {
            None
        },
    };

    let (code, status) = if database.all_reachable() {
        (StatusCode::OK, ServiceStatus::Ok)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, ServiceStatus::Degraded)
    };

    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        database,
    };
    (code, Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::repositories::test_support::memory_db;

    async fn check(state: &HealthState) -> (StatusCode, HealthResponse) {
        let (code, Json(body)) = health_check(State(state.clone())).await;
        (code, body)
    }

    #[tokio::test]
    async fn shared_database_up_is_ok_without_map_entry() {
        let state = HealthState::new(Databases::shared(memory_db().await));

        let (code, body) = check(&state).await;

        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.status, ServiceStatus::Ok);
        assert!(body.database.main.reachable);
        assert!(body.database.main.latency_ms.is_some());
        assert!(body.database.map.is_none());

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert!(json["database"].get("map").is_none());
    }

    #[tokio::test]
    async fn closed_database_is_degraded_503() {
        let db = memory_db().await;
        let state = HealthState::new(Databases::shared(db.clone()));
        db.close().await.unwrap();

        let (code, body) = check(&state).await;

        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, ServiceStatus::Degraded);
        assert!(!body.database.main.reachable);
        assert!(body.database.main.latency_ms.is_none());
        assert_eq!(serde_json::to_value(&body).unwrap()["status"], "degraded");
    }

    #[tokio::test]
    async fn unreachable_separate_map_database_degrades() {
        let map = memory_db().await;
        let state = HealthState::new(Databases::split(memory_db().await, map.clone()));

        let (code, body) = check(&state).await;
        assert_eq!(code, StatusCode::OK);
        assert!(body.database.map.as_ref().is_some_and(|m| m.reachable));

        map.close().await.unwrap();

        let (code, body) = check(&state).await;
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.database.main.reachable);
        assert!(body.database.map.as_ref().is_some_and(|m| !m.reachable));
    }
}
