use async_trait::async_trait;
use bytes::Bytes;

use super::PredictionKind;
use crate::domain::DomainResult;

/// Outbound port to the ML service.
///
/// Implementations forward `payload` untouched and hand back the upstream
/// body untouched. Any failure is a `DomainError::Upstream`.
#[async_trait]
pub trait PredictionGateway: Send + Sync {
    async fn forward(&self, kind: PredictionKind, payload: Bytes) -> DomainResult<Bytes>;
}
