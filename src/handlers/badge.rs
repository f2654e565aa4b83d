//! Badge API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{ApiResponse, Badge};
use crate::services::BadgeService;

/// POST /api/badges/check - Re-evaluate badge thresholds for every user
pub async fn check_all_badges(
    State(badge_service): State<Arc<BadgeService>>,
) -> Result<Json<ApiResponse<usize>>, ApiError> {
    let awarded = badge_service.check_all().await?;

    Ok(Json(ApiResponse::ok(awarded)))
}

/// POST /api/badges/check/:user_id - Re-evaluate thresholds for one user
pub async fn check_user_badges(
    State(badge_service): State<Arc<BadgeService>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Badge>>>, ApiError> {
    let awarded = badge_service.check_user(user_id).await?;

    Ok(Json(ApiResponse::ok(awarded)))
}

/// GET /api/users/:id/badges - Badges held by a user
pub async fn get_user_badges(
    State(badge_service): State<Arc<BadgeService>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Badge>>>, ApiError> {
    let badges = badge_service.user_badges(user_id).await?;

    Ok(Json(ApiResponse::ok(badges)))
}
