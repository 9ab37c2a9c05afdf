//! ML proxy handlers
//!
//! Bodies are taken and returned as raw bytes so the payload reaches the ML
//! service, and its answer reaches the client, exactly as sent.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use crate::application::PredictionService;
use crate::domain::PredictionKind;
use crate::interfaces::http::common::{ApiError, MessageResponse};

#[derive(Clone)]
pub struct PredictionHandlerState {
    pub prediction_service: PredictionService,
}

async fn relay(state: &PredictionHandlerState, kind: PredictionKind, body: Bytes) -> Response {
    match state.prediction_service.predict(kind, body).await {
        Ok(answer) => ([(header::CONTENT_TYPE, "application/json")], answer).into_response(),
        Err(e) => ApiError::from_domain(e, kind.failure_message()).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/ml/predict-yield",
    tag = "ML",
    request_body(content = Object, description = "Forwarded unchanged to the ML service"),
    responses(
        (status = 200, description = "ML service response, relayed unchanged", body = Object),
        (status = 400, description = "Body is not JSON", body = MessageResponse),
        (status = 502, description = "Prediction failed", body = MessageResponse)
    )
)]
pub async fn predict_yield(State(state): State<PredictionHandlerState>, body: Bytes) -> Response {
    relay(&state, PredictionKind::Yield, body).await
}

#[utoipa::path(
    post,
    path = "/ml/recommend",
    tag = "ML",
    request_body(content = Object, description = "Forwarded unchanged to the ML service"),
    responses(
        (status = 200, description = "ML service response, relayed unchanged", body = Object),
        (status = 400, description = "Body is not JSON", body = MessageResponse),
        (status = 502, description = "Recommendation failed", body = MessageResponse)
    )
)]
pub async fn recommend(State(state): State<PredictionHandlerState>, body: Bytes) -> Response {
    relay(&state, PredictionKind::Recommendation, body).await
}

#[utoipa::path(
    post,
    path = "/ml/predict-price",
    tag = "ML",
    request_body(content = Object, description = "Forwarded unchanged to the ML service"),
    responses(
        (status = 200, description = "ML service response, relayed unchanged", body = Object),
        (status = 400, description = "Body is not JSON", body = MessageResponse),
        (status = 502, description = "Price prediction failed", body = MessageResponse)
    )
)]
pub async fn predict_price(State(state): State<PredictionHandlerState>, body: Bytes) -> Response {
    relay(&state, PredictionKind::Price, body).await
}

#[utoipa::path(
    post,
    path = "/ml/pest-risk",
    tag = "ML",
    request_body(content = Object, description = "Forwarded unchanged to the ML service"),
    responses(
        (status = 200, description = "ML service response, relayed unchanged", body = Object),
        (status = 400, description = "Body is not JSON", body = MessageResponse),
        (status = 502, description = "Pest risk prediction failed", body = MessageResponse)
    )
)]
pub async fn pest_risk(State(state): State<PredictionHandlerState>, body: Bytes) -> Response {
    relay(&state, PredictionKind::PestRisk, body).await
}
