//! Sub-campaign API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{
    ApiResponse, CreateSubCampaignRequest, LeaderboardEntry, LeaderboardQuery, SubCampaign,
    SubCampaignDetail,
};
use crate::services::sub_campaigns::MergeResult;
use crate::services::{LeaderboardService, SubCampaignService};

/// POST /api/sub-campaigns - Create a sub-campaign
pub async fn create_sub_campaign(
    State(sub_campaign_service): State<Arc<SubCampaignService>>,
    Json(request): Json<CreateSubCampaignRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SubCampaign>>), ApiError> {
    let sub_campaign = sub_campaign_service.create_sub_campaign(request).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(sub_campaign))))
}

/// GET /api/sub-campaigns - List sub-campaigns
pub async fn list_sub_campaigns(
    State(sub_campaign_service): State<Arc<SubCampaignService>>,
) -> Result<Json<ApiResponse<Vec<SubCampaign>>>, ApiError> {
    let sub_campaigns = sub_campaign_service.list_sub_campaigns().await?;

    Ok(Json(ApiResponse::ok(sub_campaigns)))
}

/// GET /api/sub-campaigns/:id - Sub-campaign detail with donations
pub async fn get_sub_campaign(
    State(sub_campaign_service): State<Arc<SubCampaignService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SubCampaignDetail>>, ApiError> {
    let detail = sub_campaign_service.get_sub_campaign_detail(id).await?;

    Ok(Json(ApiResponse::ok(detail)))
}

/// GET /api/sub-campaigns/:id/leaderboard - Top donors for a sub-campaign
pub async fn get_sub_campaign_leaderboard(
    State(leaderboard_service): State<Arc<LeaderboardService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<ApiResponse<Vec<LeaderboardEntry>>>, ApiError> {
    let leaderboard = leaderboard_service
        .sub_campaign_leaderboard(id, query.limit)
        .await?;

    Ok(Json(ApiResponse::ok(leaderboard)))
}

/// POST /api/sub-campaigns/:id/approve - Approve a sub-campaign
pub async fn approve_sub_campaign(
    State(sub_campaign_service): State<Arc<SubCampaignService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SubCampaign>>, ApiError> {
    let sub_campaign = sub_campaign_service.approve(id).await?;

    Ok(Json(ApiResponse::ok(sub_campaign)))
}

/// POST /api/sub-campaigns/:id/merge-donations - Fold totals into the parent
pub async fn merge_sub_campaign_donations(
    State(sub_campaign_service): State<Arc<SubCampaignService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MergeResult>>, ApiError> {
    let result = sub_campaign_service.merge_donations(id).await?;

    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/influencers/:id/sub-campaigns - An influencer's sub-campaigns
pub async fn list_influencer_sub_campaigns(
    State(sub_campaign_service): State<Arc<SubCampaignService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<SubCampaign>>>, ApiError> {
    let sub_campaigns = sub_campaign_service.list_by_influencer(id).await?;

    Ok(Json(ApiResponse::ok(sub_campaigns)))
}
