//! Registration and login handlers
//!
//! Delegates to `UserService` from the application/identity layer.

use std::sync::Arc;

use axum::{extract::State, Json};

use super::dto::{LoginRequest, LoginResponse, RegisterRequest, UserDto};
use crate::application::identity::UserService;
use crate::infrastructure::database::repositories::UserRepository;
use crate::interfaces::http::common::{ApiError, MessageResponse, ValidatedJson};

/// Concrete over `UserRepository` so it can be an axum state.
#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService<UserRepository>>,
}

#[utoipa::path(
    post,
    path = "/user/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = MessageResponse),
        (status = 400, description = "Malformed body", body = MessageResponse),
        (status = 409, description = "Email already registered", body = MessageResponse),
        (status = 422, description = "Validation error", body = MessageResponse)
    )
)]
pub async fn register(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .user_service
        .register(&request.username, &request.email, &request.password)
        .await
        .map_err(|e| ApiError::from_domain(e, "Registration failed"))?;

    Ok(Json(MessageResponse::new("User registered successfully")))
}

#[utoipa::path(
    post,
    path = "/user/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = MessageResponse),
        (status = 403, description = "Account is inactive", body = MessageResponse)
    )
)]
pub async fn login(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .user_service
        .login(&request.username, &request.password)
        .await
        .map_err(|e| ApiError::from_domain(e, "Login failed"))?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: UserDto::from(user),
    }))
}
