//! User API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{ApiResponse, CreateUserRequest, Donation, User};
use crate::services::UserService;

/// POST /api/users - Create a user
pub async fn create_user(
    State(user_service): State<Arc<UserService>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    let user = user_service.create_user(request).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

/// GET /api/users/:id - Get a user
pub async fn get_user(
    State(user_service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = user_service.get_user(id).await?;

    Ok(Json(ApiResponse::ok(user)))
}

/// GET /api/users/:id/donations - A user's donation records
pub async fn get_user_donations(
    State(user_service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Donation>>>, ApiError> {
    let donations = user_service.donation_records(id).await?;

    Ok(Json(ApiResponse::ok(donations)))
}
