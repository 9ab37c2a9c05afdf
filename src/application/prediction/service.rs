use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use metrics::{counter, histogram};
use serde::de::IgnoredAny;

use crate::domain::{DomainError, DomainResult, PredictionGateway, PredictionKind};

/// Relays prediction requests to the ML service.
///
/// The request body must be JSON; it is otherwise forwarded untouched, and
/// the upstream answer is returned untouched.
#[derive(Clone)]
pub struct PredictionService {
    gateway: Arc<dyn PredictionGateway>,
}

impl PredictionService {
    pub fn new(gateway: Arc<dyn PredictionGateway>) -> Self {
        Self { gateway }
    }

    pub async fn predict(&self, kind: PredictionKind, payload: Bytes) -> DomainResult<Bytes> {
        if serde_json::from_slice::<IgnoredAny>(&payload).is_err() {
            return Err(DomainError::Validation(
                "Request body must be valid JSON".into(),
            ));
        }

        let start = Instant::now();
        let result = self.gateway.forward(kind, payload).await;

        let outcome = if result.is_ok() { "ok" } else { "error" };
        counter!("ml_proxy_requests_total", "route" => kind.as_str(), "outcome" => outcome)
            .increment(1);
        histogram!("ml_proxy_duration_seconds", "route" => kind.as_str())
            .record(start.elapsed().as_secs_f64());

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records what it was sent; echoes or fails.
    #[derive(Default)]
    struct FakeGateway {
        fail: bool,
        seen: Mutex<Vec<(PredictionKind, Bytes)>>,
    }

    #[async_trait]
    impl PredictionGateway for FakeGateway {
        async fn forward(&self, kind: PredictionKind, payload: Bytes) -> DomainResult<Bytes> {
            self.seen.lock().unwrap().push((kind, payload.clone()));
            if self.fail {
                Err(DomainError::Upstream(kind.failure_message().into()))
            } else {
                Ok(payload)
            }
        }
    }

    #[tokio::test]
    async fn forwards_payload_bytes_unchanged() {
        let gateway = Arc::new(FakeGateway::default());
        let svc = PredictionService::new(gateway.clone());
        let body = Bytes::from_static(b"{ \"N\": 90,  \"P\": 42 }");

        let out = svc.predict(PredictionKind::Recommendation, body.clone()).await.unwrap();

        assert_eq!(out, body);
        let seen = gateway.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], (PredictionKind::Recommendation, body));
    }

    #[tokio::test]
    async fn non_json_body_never_reaches_upstream() {
        let gateway = Arc::new(FakeGateway::default());
        let svc = PredictionService::new(gateway.clone());

        let err = svc
            .predict(PredictionKind::Yield, Bytes::from_static(b"not json"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert!(gateway.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_is_passed_through() {
        let svc = PredictionService::new(Arc::new(FakeGateway {
            fail: true,
            ..Default::default()
        }));

        let err = svc
            .predict(PredictionKind::PestRisk, Bytes::from_static(b"{}"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Upstream(ref m) if m == "Pest risk prediction failed"));
    }

    fn sample<'a>(rendered: &'a str, prefix: &str, labels: &[&str]) -> Option<&'a str> {
        rendered
            .lines()
            .find(|l| l.starts_with(prefix) && labels.iter().all(|lbl| l.contains(lbl)))
            .and_then(|l| l.rsplit(' ').next())
    }

    #[tokio::test]
    async fn records_outcome_counter_and_duration_per_route() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let _guard = metrics::set_default_local_recorder(&recorder);

        let ok = PredictionService::new(Arc::new(FakeGateway::default()));
        let failing = PredictionService::new(Arc::new(FakeGateway {
            fail: true,
            ..Default::default()
        }));
        let body = Bytes::from_static(b"{\"crop\": \"rice\"}");

        ok.predict(PredictionKind::Price, body.clone()).await.unwrap();
        ok.predict(PredictionKind::Price, body.clone()).await.unwrap();
        failing.predict(PredictionKind::Price, body).await.unwrap_err();
        // Rejected before forwarding, so not counted.
        ok.predict(PredictionKind::Price, Bytes::from_static(b"nope"))
            .await
            .unwrap_err();

        let rendered = handle.render();
        let counter = "ml_proxy_requests_total{";
        assert_eq!(
            sample(&rendered, counter, &[r#"route="price""#, r#"outcome="ok""#]),
            Some("2"),
            "{rendered}"
        );
        assert_eq!(
            sample(&rendered, counter, &[r#"route="price""#, r#"outcome="error""#]),
            Some("1"),
            "{rendered}"
        );
        assert_eq!(
            sample(&rendered, "ml_proxy_duration_seconds_count{", &[r#"route="price""#]),
            Some("3"),
            "{rendered}"
        );
        assert!(!rendered.contains(r#"route="yield""#));
    }
}
