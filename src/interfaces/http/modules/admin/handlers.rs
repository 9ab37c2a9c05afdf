//! Admin API handlers
//!
//! Admin login plus listing and (de)activating user accounts.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{AdminLoginRequest, ListUsersParams, UpdateStatusRequest};
use crate::application::identity::{AdminService, UserService};
use crate::domain::{GetUserDto, UserStatus};
use crate::infrastructure::database::repositories::{AdminRepository, UserRepository};
use crate::interfaces::http::common::{ApiError, MessageResponse, ValidatedJson};
use crate::interfaces::http::modules::users::UserDto;

#[derive(Clone)]
pub struct AdminHandlerState {
    pub admin_service: Arc<AdminService<AdminRepository>>,
    pub user_service: Arc<UserService<UserRepository>>,
}

#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "Admin",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Admin login successful", body = MessageResponse),
        (status = 401, description = "Invalid admin credentials", body = MessageResponse)
    )
)]
pub async fn admin_login(
    State(state): State<AdminHandlerState>,
    ValidatedJson(request): ValidatedJson<AdminLoginRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .admin_service
        .login(&request.email, &request.password)
        .await
        .map_err(|e| ApiError::from_domain(e, "Admin login failed"))?;

    Ok(Json(MessageResponse::new("Admin login successful")))
}

#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "Admin",
    params(ListUsersParams),
    responses(
        (status = 200, description = "All users, oldest first", body = Vec<UserDto>),
        (status = 400, description = "Unknown status filter", body = MessageResponse)
    )
)]
pub async fn list_users(
    State(state): State<AdminHandlerState>,
    Query(params): Query<ListUsersParams>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let status = match params.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<UserStatus>().map_err(ApiError::bad_request)?),
    };

    let dto = GetUserDto {
        search: params.search.filter(|s| !s.trim().is_empty()),
        status,
    };

    let users = state
        .user_service
        .list_users(dto)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to fetch users"))?;

    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

#[utoipa::path(
    put,
    path = "/admin/user/status/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "User status updated", body = MessageResponse),
        (status = 400, description = "Status is not Active or Inactive", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse)
    )
)]
pub async fn update_user_status(
    State(state): State<AdminHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .user_service
        .set_status(&id, request.status)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to update user status"))?;

    Ok(Json(MessageResponse::new("User status updated")))
}
