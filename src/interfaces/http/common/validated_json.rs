//! JSON bodies checked with `validator` before a handler sees them

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiError;

/// `Json<T>` that also runs `T::validate()`.
///
/// Both failures are answered through [`ApiError`]: a body that is not JSON
/// or does not fit `T` gets 400, a body that fails a validation rule gets
/// 422 listing every `field: message`.
pub struct ValidatedJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, validation_message(&errors))
    }
}

/// `field: message` pairs, sorted and `; `-joined. Rules without a custom
/// message fall back to their code.
fn validation_message(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{field}: {msg}"),
                None => format!("{field}: {}", e.code),
            })
        })
        .collect();

    if parts.is_empty() {
        return "Validation failed".to_string();
    }
    parts.sort();
    parts.join("; ")
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::Service;

    #[derive(Debug, Deserialize, Validate)]
    struct SoilReading {
        #[validate(length(min = 1, message = "state is required"))]
        state: String,
        #[validate(range(min = 0.0, max = 14.0))]
        ph: f64,
    }

    async fn accept(ValidatedJson(reading): ValidatedJson<SoilReading>) -> String {
        reading.state
    }

    async fn post_body(body: &'static str) -> (StatusCode, String) {
        let mut svc = Router::new().route("/soil", post(accept)).into_service();
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/soil")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();

        let resp = svc.call(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn message(body: &str) -> String {
        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        json["message"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn valid_body_reaches_handler() {
        let (status, body) = post_body(r#"{"state": "Punjab", "ph": 6.5}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Punjab");
    }

    #[tokio::test]
    async fn unparseable_or_ill_typed_bodies_are_400() {
        for body in ["not json", r#"{"state": "Kerala"}"#, r#"{"state": 1, "ph": 7}"#] {
            let (status, resp) = post_body(body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert!(message(&resp).starts_with("Invalid request body: "), "{resp}");
        }
    }

    #[tokio::test]
    async fn rule_violations_are_422_with_every_field() {
        let (status, resp) = post_body(r#"{"state": "", "ph": 6.5}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(message(&resp), "state: state is required");

        let (status, resp) = post_body(r#"{"state": "", "ph": 20}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(message(&resp), "ph: range; state: state is required");
    }
}
