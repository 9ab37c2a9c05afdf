use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client};
use tracing::{debug, warn};

use crate::domain::{DomainError, DomainResult, PredictionGateway, PredictionKind};

/// Forwards prediction payloads to the ML service over HTTP.
///
/// No retries. A timeout applies only when one is configured.
pub struct HttpPredictionGateway {
    client: Client,
    base_url: String,
}

impl HttpPredictionGateway {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, kind: PredictionKind) -> String {
        format!("{}{}", self.base_url, kind.upstream_path())
    }
}

#[async_trait]
impl PredictionGateway for HttpPredictionGateway {
    async fn forward(&self, kind: PredictionKind, payload: Bytes) -> DomainResult<Bytes> {
        let url = self.endpoint(kind);
        debug!(route = kind.as_str(), %url, bytes = payload.len(), "Forwarding to ML service");

        let upstream = |reason: String| {
            warn!(route = kind.as_str(), %url, "ML service call failed: {}", reason);
            DomainError::Upstream(kind.failure_message().to_string())
        };

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(upstream(format!("status {}: {}", status, body)));
        }

        response.bytes().await.map_err(|e| upstream(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Router;

    /// Stub ML service: echoes `/predict`, answers `/predict-price` with a
    /// fixed body and fails `/pest-risk`.
    async fn spawn_stub() -> String {
        let app = Router::new()
            .route("/predict", post(|body: Bytes| async move { body }))
            .route(
                "/predict-price",
                post(|| async { r#"{"predicted_price": 2150.5, "unit": "₹ per ton"}"# }),
            )
            .route(
                "/pest-risk",
                post(|| async { (StatusCode::UNPROCESSABLE_ENTITY, r#"{"detail":"bad"}"#) }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn forwards_body_byte_for_byte() {
        let base = spawn_stub().await;
        let gateway = HttpPredictionGateway::new(&base, None).unwrap();
        // Key order, spacing and number formatting must survive untouched.
        let payload = Bytes::from_static(
            br#"{"state":"Punjab",  "crop":"Wheat","area":12.50,"soil_type":"alluvial"}"#,
        );

        let relayed = gateway
            .forward(PredictionKind::Yield, payload.clone())
            .await
            .unwrap();

        assert_eq!(relayed, payload);
    }

    #[tokio::test]
    async fn relays_response_verbatim() {
        let base = spawn_stub().await;
        let gateway = HttpPredictionGateway::new(&base, None).unwrap();

        let relayed = gateway
            .forward(PredictionKind::Price, Bytes::from_static(b"{}"))
            .await
            .unwrap();

        assert_eq!(
            relayed,
            Bytes::from_static(r#"{"predicted_price": 2150.5, "unit": "₹ per ton"}"#.as_bytes())
        );
    }

    #[tokio::test]
    async fn non_success_status_is_flattened() {
        let base = spawn_stub().await;
        let gateway = HttpPredictionGateway::new(&base, None).unwrap();

        let err = gateway
            .forward(PredictionKind::PestRisk, Bytes::from_static(b"{}"))
            .await
            .unwrap_err();

        assert!(
            matches!(err, DomainError::Upstream(ref m) if m == "Pest risk prediction failed"),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn connection_refused_is_flattened() {
        // Bind then drop to obtain a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gateway = HttpPredictionGateway::new(&format!("http://{}/", addr), None).unwrap();
        let err = gateway
            .forward(PredictionKind::Recommendation, Bytes::from_static(b"{}"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Upstream(ref m) if m == "Recommendation failed"));
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let gateway = HttpPredictionGateway::new("http://127.0.0.1:8000/", None).unwrap();
        assert_eq!(
            gateway.endpoint(PredictionKind::PestRisk),
            "http://127.0.0.1:8000/pest-risk"
        );
    }
}
